// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! The HTML codec: serializing a content sequence to an HTML string and
//! parsing one back.
//!
//! Only the fixed inline vocabulary round-trips: `strong`/`b`, `em`/`i`,
//! `u`, `code`, `a` (links and entry mentions), `br`, `img`. Anything
//! else parses as a plain container. Round-tripping is lossy in exactly
//! one place: mention runs come back carrying the mentioned entry's
//! title as their text, because mentions always display the live title.

mod parse_error;
mod parser;
mod serialize;

pub use parse_error::HtmlParseError;
pub use parser::{html_to_content, html_to_content_or_plain};
pub use serialize::content_to_html;
