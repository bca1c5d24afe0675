// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

static SLUG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("slug regex is valid")
});

/// A reference from a run of text to another entry.
///
/// All three fields are required: the id is the stable key, the slug is
/// the path segment of the entry's permalink, and the title is what the
/// mention displays in place of the run's literal text.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Mention {
    entry_id: String,
    entry_slug: String,
    entry_title: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MentionError {
    EmptyId,
    EmptySlug,
    EmptyTitle,
}

impl fmt::Display for MentionError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(formatter, "Mention entry id is empty"),
            Self::EmptySlug => {
                write!(formatter, "Mention entry slug is empty")
            }
            Self::EmptyTitle => {
                write!(formatter, "Mention entry title is empty")
            }
        }
    }
}

impl std::error::Error for MentionError {}

impl Mention {
    /// Build a mention, rejecting empty fields.
    ///
    /// Slug shape is not enforced here: stored content may carry slugs
    /// minted under older rules, and a mention to such an entry must
    /// still resolve. Use [`is_valid_slug`] when minting new slugs.
    pub fn new(
        entry_id: impl Into<String>,
        entry_slug: impl Into<String>,
        entry_title: impl Into<String>,
    ) -> Result<Self, MentionError> {
        let entry_id = entry_id.into();
        let entry_slug = entry_slug.into();
        let entry_title = entry_title.into();
        if entry_id.is_empty() {
            return Err(MentionError::EmptyId);
        }
        if entry_slug.is_empty() {
            return Err(MentionError::EmptySlug);
        }
        if entry_title.is_empty() {
            return Err(MentionError::EmptyTitle);
        }
        Ok(Self {
            entry_id,
            entry_slug,
            entry_title,
        })
    }

    pub fn entry_id(&self) -> &str {
        &self.entry_id
    }

    pub fn entry_slug(&self) -> &str {
        &self.entry_slug
    }

    pub fn entry_title(&self) -> &str {
        &self.entry_title
    }

    /// Site-relative permalink of the mentioned entry.
    pub fn permalink(&self) -> String {
        format!("/{}", self.entry_slug)
    }
}

/// True if `slug` is well formed: lowercase alphanumeric segments
/// separated by single hyphens, no leading or trailing hyphen.
pub fn is_valid_slug(slug: &str) -> bool {
    SLUG.is_match(slug)
}

/// Derive a slug from an entry title.
///
/// Lowercases, keeps alphanumeric runs, joins them with hyphens. Returns
/// an empty string when the title contains no alphanumeric characters at
/// all; callers must treat that as "no slug available".
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    let segments: Vec<&str> = lowered
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|s| !s.is_empty())
        .collect();
    segments.join("-")
}
