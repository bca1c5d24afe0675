// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! The content sequence: a flat ordered list of text runs and atomic
//! inline nodes, addressed by global offsets.
//!
//! Offsets are Unicode scalar values. A text run spans as many offset
//! units as it has characters; an atomic inline node spans exactly one
//! and is never addressable mid-node.

use serde::{Deserialize, Serialize};

use crate::mark::{are_marks_equal, Attrs, Mark};

/// One node of a content sequence.
///
/// Equality compares mark lists as sets under the canonical order (see
/// [`are_marks_equal`]), so two runs that differ only in mark insertion
/// order are equal.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ContentNode {
    /// A run of text carrying a set of marks.
    Text {
        text: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        marks: Vec<Mark>,
    },
    /// An atomic inline image. Never split, never marked; occupies one
    /// offset unit.
    Image {
        #[serde(default, skip_serializing_if = "Attrs::is_empty")]
        attrs: Attrs,
    },
}

impl PartialEq for ContentNode {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Self::Text { text, marks },
                Self::Text {
                    text: other_text,
                    marks: other_marks,
                },
            ) => text == other_text && are_marks_equal(marks, other_marks),
            (
                Self::Image { attrs },
                Self::Image { attrs: other_attrs },
            ) => attrs == other_attrs,
            _ => false,
        }
    }
}

impl ContentNode {
    /// An unmarked text run.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text {
            text: text.into(),
            marks: Vec::new(),
        }
    }

    /// A text run carrying `marks`.
    pub fn text_with_marks(text: impl Into<String>, marks: Vec<Mark>) -> Self {
        Self::Text {
            text: text.into(),
            marks,
        }
    }

    /// An inline image node.
    pub fn image(attrs: Attrs) -> Self {
        Self::Image { attrs }
    }

    /// Width of this node in global offset units.
    pub fn unit_len(&self) -> usize {
        match self {
            Self::Text { text, .. } => text.chars().count(),
            Self::Image { .. } => 1,
        }
    }
}

/// An ordered sequence of content nodes.
///
/// Serializes as a bare JSON array of its nodes. All transformations
/// produce new sequences; nothing mutates shared state.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Content {
    nodes: Vec<ContentNode>,
}

impl Content {
    /// An empty sequence (no nodes at all).
    ///
    /// This is the transient builder form; an explicitly empty *document*
    /// is a single empty text run, see [`Content::from_plain_text`].
    pub fn new() -> Self {
        Self::default()
    }

    /// A sequence holding `text` as one unmarked run. An empty string is
    /// the canonical empty-document form.
    pub fn from_plain_text(text: impl Into<String>) -> Self {
        Self {
            nodes: vec![ContentNode::text(text)],
        }
    }

    pub fn nodes(&self) -> &[ContentNode] {
        &self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// True for the canonical empty-document form: a single text run with
    /// no characters.
    pub fn is_empty_document(&self) -> bool {
        matches!(
            self.nodes.as_slice(),
            [ContentNode::Text { text, .. }] if text.is_empty()
        )
    }

    /// Total length in global offset units: characters of every text run
    /// plus one per inline node.
    pub fn unit_len(&self) -> usize {
        self.nodes.iter().map(ContentNode::unit_len).sum()
    }

    /// Total text characters. Inline nodes contribute nothing.
    pub fn char_len(&self) -> usize {
        self.nodes
            .iter()
            .map(|node| match node {
                ContentNode::Text { text, .. } => text.chars().count(),
                ContentNode::Image { .. } => 0,
            })
            .sum()
    }

    /// The node covering global offset `offset`, with the offset of its
    /// own first unit. `None` past the end of the sequence; a node's end
    /// boundary belongs to the next node.
    pub fn node_covering(
        &self,
        offset: usize,
    ) -> Option<(usize, &ContentNode)> {
        let mut start = 0;
        for node in &self.nodes {
            let end = start + node.unit_len();
            if offset < end {
                return Some((start, node));
            }
            start = end;
        }
        None
    }

    /// The normalization pass: merge adjacent text runs whose mark sets
    /// are equal, concatenating their text.
    ///
    /// Range edits split runs without re-merging them; this restores the
    /// canonical form. The HTML parser runs it on every parse.
    pub fn merged(&self) -> Content {
        let mut merged: Vec<ContentNode> = Vec::with_capacity(self.nodes.len());
        for node in &self.nodes {
            let mut absorbed = false;
            if let ContentNode::Text { text, marks } = node {
                if let Some(ContentNode::Text {
                    text: last_text,
                    marks: last_marks,
                }) = merged.last_mut()
                {
                    if are_marks_equal(marks, last_marks) {
                        last_text.push_str(text);
                        absorbed = true;
                    }
                }
            }
            if !absorbed {
                merged.push(node.clone());
            }
        }
        Content { nodes: merged }
    }

    /// Panic if the sequence violates its invariants: no two adjacent
    /// text runs with equal mark sets, no duplicate mark kinds on a run,
    /// and never both a link and a mention on the same run.
    pub fn explicitly_assert_invariants(&self) {
        self.do_assert_invariants();
    }

    #[cfg(feature = "assert-invariants")]
    pub(crate) fn assert_invariants(&self) {
        self.do_assert_invariants();
    }

    #[cfg(not(feature = "assert-invariants"))]
    pub(crate) fn assert_invariants(&self) {}

    fn do_assert_invariants(&self) {
        use crate::mark::MarkKind;

        for pair in self.nodes.windows(2) {
            if let [ContentNode::Text { marks: a, .. }, ContentNode::Text { marks: b, .. }] =
                pair
            {
                assert!(
                    !are_marks_equal(a, b),
                    "adjacent text runs with equal marks: {pair:?}"
                );
            }
        }
        for node in &self.nodes {
            if let ContentNode::Text { marks, .. } = node {
                for (i, mark) in marks.iter().enumerate() {
                    assert!(
                        !marks[i + 1..].iter().any(|m| m.kind == mark.kind),
                        "duplicate {} mark on one run",
                        mark.kind
                    );
                }
                let exclusive = marks
                    .iter()
                    .filter(|m| {
                        m.kind == MarkKind::Link || m.kind == MarkKind::Mention
                    })
                    .count();
                assert!(
                    exclusive <= 1,
                    "run carries both a link and a mention: {marks:?}"
                );
            }
        }
    }
}

impl From<Vec<ContentNode>> for Content {
    fn from(nodes: Vec<ContentNode>) -> Self {
        Self { nodes }
    }
}

impl FromIterator<ContentNode> for Content {
    fn from_iter<I: IntoIterator<Item = ContentNode>>(iter: I) -> Self {
        Self {
            nodes: iter.into_iter().collect(),
        }
    }
}

/// Slice `text` by character positions `[start, end)`. Out-of-range
/// positions clamp to the end of the string.
pub(crate) fn slice_chars(text: &str, start: usize, end: usize) -> &str {
    if start >= end {
        return "";
    }
    &text[byte_offset(text, start)..byte_offset(text, end)]
}

fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}
