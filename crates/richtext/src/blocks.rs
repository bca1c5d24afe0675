// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Boundary shapes of the block tree.
//!
//! Documents are trees of typed blocks; content sequences are their
//! leaves (a paragraph's text, a callout's body, a dialogue line). The
//! storage and HTTP layers live elsewhere and exchange these shapes as
//! JSON; this module only defines the format. Ids are caller-supplied
//! opaque strings, minted by the storage layer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::content::Content;
use crate::mark::Attrs;

/// Named child slots of a container block.
pub type Slots = BTreeMap<String, Vec<BlockNode>>;

/// Common envelope of every block: id, typed attributes, child slots.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Block<A> {
    pub id: String,
    pub attrs: A,
    #[serde(default, skip_serializing_if = "Slots::is_empty")]
    pub slots: Slots,
    #[serde(
        rename = "isTemplated",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub is_templated: Option<bool>,
}

impl<A> Block<A> {
    pub fn new(id: impl Into<String>, attrs: A) -> Self {
        Self {
            id: id.into(),
            attrs,
            slots: Slots::new(),
            is_templated: None,
        }
    }
}

/// One node of the block tree, tagged by its `type`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BlockNode {
    Section(Block<SectionAttrs>),
    Paragraph(Block<ParagraphAttrs>),
    Callout(Block<CalloutAttrs>),
    Image(Block<ImageAttrs>),
    Script(Block<ScriptAttrs>),
    Scene(Block<SceneAttrs>),
    Dialogue(Block<DialogueAttrs>),
}

impl BlockNode {
    pub fn id(&self) -> &str {
        match self {
            Self::Section(b) => &b.id,
            Self::Paragraph(b) => &b.id,
            Self::Callout(b) => &b.id,
            Self::Image(b) => &b.id,
            Self::Script(b) => &b.id,
            Self::Scene(b) => &b.id,
            Self::Dialogue(b) => &b.id,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SectionAttrs {
    pub title: String,
    #[serde(
        rename = "mainArticleSlug",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub main_article_slug: Option<String>,
    #[serde(flatten)]
    pub extra: Attrs,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Alignment {
    Left,
    Center,
    Right,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ParagraphAttrs {
    /// The paragraph's inline content.
    #[serde(default, skip_serializing_if = "Content::is_empty")]
    pub text: Content,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,
    #[serde(
        rename = "lineHeight",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub line_height: Option<String>,
    #[serde(
        rename = "indentLevel",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub indent_level: Option<u32>,
    #[serde(flatten)]
    pub extra: Attrs,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CalloutVariant {
    Note,
    Tip,
    Warning,
    Danger,
    CommentaryInternal,
    CommentaryExternal,
    Ideation,
    CreatorInternal,
    CreatorExternal,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalloutAttrs {
    pub variant: CalloutVariant,
    /// The callout's inline content.
    pub text: Content,
    #[serde(flatten)]
    pub extra: Attrs,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImageAttrs {
    pub url: String,
    #[serde(rename = "fileName")]
    pub file_name: String,
    #[serde(
        rename = "altText",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub alt_text: Option<String>,
    #[serde(flatten)]
    pub extra: Attrs,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScriptAttrs {
    /// Characters appearing in this script, by name.
    pub characters: Vec<String>,
    #[serde(flatten)]
    pub extra: Attrs,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeOfDay {
    Morning,
    Noon,
    Afternoon,
    Evening,
    Night,
    Other,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Setting {
    Interior,
    Exterior,
    Other,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Transition {
    CutToScene,
    CutBackToScene,
    FadeToScene,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneAttrs {
    pub location: String,
    #[serde(rename = "timeOfDay")]
    pub time_of_day: TimeOfDay,
    pub setting: Setting,
    pub transition: Transition,
    pub description: String,
    #[serde(flatten)]
    pub extra: Attrs,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DialogueAttrs {
    /// Speaking character's name.
    pub character: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parenthetical: Option<String>,
    /// The spoken line's inline content.
    pub line: Content,
    #[serde(flatten)]
    pub extra: Attrs,
}
