// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Inline rich-text content model for tree-structured documents.
//!
//! Rich text is a flat ordered sequence of nodes: text runs carrying a
//! set of marks (bold, italic, underline, code, link, mention) plus
//! atomic inline nodes such as images. The model is persistent — every
//! edit returns a new [`Content`] value — and addresses positions as
//! global offsets where a text run spans one unit per character and an
//! inline node spans exactly one.
//!
//! - [`Composer`] applies marks to ranges and splices content into them.
//! - [`content_to_html`] / [`html_to_content`] serialize to and from the
//!   HTML stored in a block's attributes.
//! - [`apply_character_limit`] trims a sequence to a budget without
//!   breaking marks or splitting atomic nodes.
//! - [`blocks`] holds the JSON shapes of the block tree in which content
//!   sequences are leaves.

pub mod blocks;
mod character_limit;
mod composer;
mod content;
mod html;
mod mark;

pub use character_limit::{apply_character_limit, CharacterLimit};
pub use composer::Composer;
pub use content::{Content, ContentNode};
pub use html::{
    content_to_html, html_to_content, html_to_content_or_plain,
    HtmlParseError,
};
pub use mark::{are_marks_equal, attr_string, Attrs, Mark, MarkKind};
