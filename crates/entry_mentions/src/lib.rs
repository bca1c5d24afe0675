// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Utilities for entry mentions.
//!
//! A mention ties a run of text to another entry in the document tree and
//! always displays that entry's live title. This crate owns the mention
//! value type and the slug rules shared by the content model and any
//! authoring surface that mints mentions.

mod mention;

pub use mention::{is_valid_slug, slugify, Mention, MentionError};
