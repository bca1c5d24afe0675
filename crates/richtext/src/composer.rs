// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Range edits over a content sequence: applying marks and splicing
//! content into half-open `[start, end)` global offset ranges.
//!
//! Both operations are pure; the composer hands back a new sequence and
//! leaves its own untouched. Malformed requests (unsupported kinds,
//! zero-width toggles, out-of-range offsets) are well-defined no-ops
//! rather than errors.

use strum::IntoEnumIterator;

use crate::content::{slice_chars, Content, ContentNode};
use crate::mark::{attr_string, Attrs, Mark, MarkKind};

/// An editing surface over one content sequence.
///
/// Carries the sequence plus the set of marks this surface supports;
/// a title field might support only bold and italic while a body field
/// supports everything.
pub struct Composer {
    content: Content,
    supported_marks: Vec<MarkKind>,
}

impl Composer {
    pub fn new(content: Content, supported_marks: Vec<MarkKind>) -> Self {
        Self {
            content,
            supported_marks,
        }
    }

    /// A composer supporting every mark kind.
    pub fn with_all_marks(content: Content) -> Self {
        Self::new(content, MarkKind::iter().collect())
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    /// Apply or toggle a mark across `[start, end)`.
    ///
    /// Text runs overlapping the range split into up to three parts:
    /// untouched prefix, transformed middle, untouched suffix. For `link`
    /// and `mention` the middle's existing link/mention mark is removed
    /// and the new one added only when its key attribute (`url` /
    /// `entryId`) is non-empty, so applying with empty attributes removes
    /// a link. Every other kind toggles: present → removed, absent →
    /// added.
    ///
    /// Unsupported kinds and zero-width non-link selections return the
    /// content unchanged. Adjacent runs left equal by a toggle are not
    /// re-merged here; see [`Content::merged`].
    pub fn apply_mark(
        &self,
        kind: MarkKind,
        attrs: &Attrs,
        start: usize,
        end: usize,
    ) -> Content {
        if !self.supported_marks.contains(&kind) {
            return self.content.clone();
        }
        if start == end
            && kind != MarkKind::Link
            && kind != MarkKind::Mention
        {
            // Nothing to toggle under a caret. Link and mention stay
            // permissive here; with an empty range the walk below is a
            // no-op anyway.
            return self.content.clone();
        }

        let mut new_nodes = Vec::with_capacity(self.content.nodes().len());
        let mut offset = 0;

        for node in self.content.nodes() {
            match node {
                ContentNode::Text { text, marks } => {
                    let node_start = offset;
                    let node_end = offset + text.chars().count();
                    let overlap_start = node_start.max(start);
                    let overlap_end = node_end.min(end);

                    if overlap_start < overlap_end {
                        if overlap_start > node_start {
                            new_nodes.push(ContentNode::Text {
                                text: slice_chars(
                                    text,
                                    0,
                                    overlap_start - node_start,
                                )
                                .to_owned(),
                                marks: marks.clone(),
                            });
                        }
                        new_nodes.push(ContentNode::Text {
                            text: slice_chars(
                                text,
                                overlap_start - node_start,
                                overlap_end - node_start,
                            )
                            .to_owned(),
                            marks: transform_marks(marks, kind, attrs),
                        });
                        if overlap_end < node_end {
                            new_nodes.push(ContentNode::Text {
                                text: slice_chars(
                                    text,
                                    overlap_end - node_start,
                                    node_end - node_start,
                                )
                                .to_owned(),
                                marks: marks.clone(),
                            });
                        }
                    } else {
                        new_nodes.push(node.clone());
                    }
                    offset = node_end;
                }
                ContentNode::Image { .. } => {
                    // Atomic nodes are never marked; they keep their one
                    // unit of width in the offset space.
                    new_nodes.push(node.clone());
                    offset += 1;
                }
            }
        }

        Content::from(new_nodes)
    }

    /// Replace `[start, end)` with `to_insert`.
    ///
    /// Text overlapping the range is removed; the surviving prefix and
    /// suffix keep their marks as separate runs. The new nodes land at
    /// the first point the walk reaches `start`. A `start` equal to a
    /// node boundary inserts between nodes without splitting; a `start`
    /// strictly inside a text run splits it. If the walk never reaches
    /// `start` (at or past the end of the sequence) the new nodes are
    /// appended, so the operation is total for any offsets.
    ///
    /// Inline nodes pass through untouched even inside the range: their
    /// lifecycle belongs to the block layer, not to text replacement.
    pub fn insert_content(
        &self,
        to_insert: &Content,
        start: usize,
        end: usize,
    ) -> Content {
        let mut new_nodes = Vec::with_capacity(
            self.content.nodes().len() + to_insert.nodes().len(),
        );
        let mut offset = 0;
        let mut inserted = false;

        for node in self.content.nodes() {
            match node {
                ContentNode::Text { text, marks } => {
                    let len = text.chars().count();
                    let node_start = offset;
                    let node_end = offset + len;
                    let before_end =
                        start.clamp(node_start, node_end) - node_start;
                    let after_start =
                        end.clamp(node_start, node_end) - node_start;

                    if before_end > 0 {
                        new_nodes.push(ContentNode::Text {
                            text: slice_chars(text, 0, before_end).to_owned(),
                            marks: marks.clone(),
                        });
                    }
                    if !inserted && start >= node_start && start <= node_end {
                        new_nodes.extend(to_insert.nodes().iter().cloned());
                        inserted = true;
                    }
                    if after_start < len {
                        new_nodes.push(ContentNode::Text {
                            text: slice_chars(text, after_start, len)
                                .to_owned(),
                            marks: marks.clone(),
                        });
                    }
                    offset = node_end;
                }
                ContentNode::Image { .. } => {
                    if !inserted && start == offset {
                        new_nodes.extend(to_insert.nodes().iter().cloned());
                        inserted = true;
                    }
                    new_nodes.push(node.clone());
                    offset += 1;
                }
            }
        }

        if !inserted {
            new_nodes.extend(to_insert.nodes().iter().cloned());
        }

        Content::from(new_nodes)
    }
}

/// Marks for the overlapped middle of a split run.
fn transform_marks(marks: &[Mark], kind: MarkKind, attrs: &Attrs) -> Vec<Mark> {
    let mut updated = marks.to_vec();
    if kind == MarkKind::Link || kind == MarkKind::Mention {
        // Link and mention are mutually exclusive and replace rather
        // than toggle.
        updated
            .retain(|m| m.kind != MarkKind::Link && m.kind != MarkKind::Mention);
        let key = if kind == MarkKind::Link { "url" } else { "entryId" };
        if !attr_string(attrs, key).is_empty() {
            updated.push(Mark {
                kind,
                attrs: attrs.clone(),
            });
        }
    } else if let Some(existing) =
        updated.iter().position(|m| m.kind == kind)
    {
        updated.remove(existing);
    } else {
        updated.push(Mark::new(kind));
    }
    updated
}
