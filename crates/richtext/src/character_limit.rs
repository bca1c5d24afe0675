// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Budget-aware truncation of a content sequence.

use crate::content::{slice_chars, Content, ContentNode};

/// Result of [`apply_character_limit`].
#[derive(Clone, Debug, PartialEq)]
pub struct CharacterLimit {
    /// The sequence cut down to the budget.
    pub content: Content,
    /// Text characters in the returned sequence. Inline nodes consume
    /// budget but contribute nothing here.
    pub new_length: usize,
}

/// Trim `content` to at most `limit` offset units.
///
/// Walks the sequence accumulating a budget count: text runs cost one
/// unit per character, inline nodes cost one unit flat. The first node
/// that would overflow the budget is truncated to the remaining units if
/// it is text (and dropped entirely when nothing remains), or dropped
/// whole if it is an inline node; everything after it is dropped. No
/// ellipsis, no snapping to word boundaries — this protects storage and
/// display budgets, not typography.
///
/// `None` means no limit: the sequence is returned unchanged.
pub fn apply_character_limit(
    content: &Content,
    limit: Option<usize>,
) -> CharacterLimit {
    let mut char_count = 0;
    let mut new_length = 0;
    let mut limited = Vec::with_capacity(content.nodes().len());

    for node in content.nodes() {
        let node_len = node.unit_len();
        let will_exceed = limit.is_some_and(|l| char_count + node_len > l);

        if !will_exceed {
            limited.push(node.clone());
            char_count += node_len;
            if let ContentNode::Text { .. } = node {
                new_length += node_len;
            }
        } else if let ContentNode::Text { text, marks } = node {
            // `will_exceed` implies a limit, and the budget never
            // overruns it, so the subtraction cannot underflow.
            let remaining = limit.unwrap_or(0) - char_count;
            if remaining > 0 {
                limited.push(ContentNode::Text {
                    text: slice_chars(text, 0, remaining).to_owned(),
                    marks: marks.clone(),
                });
                new_length += remaining;
            }
            break;
        } else {
            break;
        }
    }

    CharacterLimit {
        content: Content::from(limited),
        new_length,
    }
}
