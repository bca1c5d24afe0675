// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use std::fmt;

/// The HTML input could not be assembled into a document tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HtmlParseError {
    pub parse_errors: Vec<String>,
}

impl fmt::Display for HtmlParseError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "Failed to parse HTML: {}",
            self.parse_errors.join("; ")
        )
    }
}

impl std::error::Error for HtmlParseError {}
