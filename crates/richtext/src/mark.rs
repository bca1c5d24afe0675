// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Marks: the style and semantic annotations carried by text runs.
//!
//! Two mark lists are compared as sets under the canonical kind order, so
//! insertion order never affects run mergeability or serialized output.

use entry_mentions::Mention;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum_macros::{Display, EnumIter, EnumString};

/// Attribute map attached to a mark or an inline node.
///
/// Kept as raw JSON so attribute data written by older versions of the
/// editor round-trips untouched.
pub type Attrs = Map<String, Value>;

/// The kinds of mark a text run can carry.
///
/// Declaration order is the canonical total order used for sorting mark
/// lists and for HTML tag nesting. The two list kinds are part of the
/// stored data format but have no inline tag of their own; they sort
/// after the inline kinds.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum MarkKind {
    Mention,
    Link,
    Bold,
    Italic,
    Underline,
    Code,
    BulletList,
    OrderedList,
}

impl MarkKind {
    /// Position of this kind in the canonical order.
    pub fn order(self) -> usize {
        self as usize
    }
}

/// A single mark: a kind plus optional attributes.
///
/// Only `link` and `mention` carry attributes; for every other kind the
/// map stays empty. A missing attribute map and an empty one compare
/// equal because the map defaults to empty on deserialization.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Mark {
    #[serde(rename = "type")]
    pub kind: MarkKind,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub attrs: Attrs,
}

impl Mark {
    /// An attribute-less mark of the given kind.
    pub fn new(kind: MarkKind) -> Self {
        Self {
            kind,
            attrs: Map::new(),
        }
    }

    /// A link mark pointing at `url`.
    pub fn link(url: impl Into<String>) -> Self {
        let mut attrs = Map::new();
        attrs.insert("url".into(), Value::String(url.into()));
        Self {
            kind: MarkKind::Link,
            attrs,
        }
    }

    /// A mention mark referencing `mention`'s entry.
    pub fn mention(mention: &Mention) -> Self {
        let mut attrs = Map::new();
        attrs.insert(
            "entryId".into(),
            Value::String(mention.entry_id().into()),
        );
        attrs.insert(
            "entrySlug".into(),
            Value::String(mention.entry_slug().into()),
        );
        attrs.insert(
            "entryTitle".into(),
            Value::String(mention.entry_title().into()),
        );
        Self {
            kind: MarkKind::Mention,
            attrs,
        }
    }

    /// Read one of this mark's attributes as a string.
    pub fn attr_str(&self, key: &str) -> String {
        attr_string(&self.attrs, key)
    }

    /// The `url` attribute of a link mark, empty for anything else.
    pub fn url(&self) -> String {
        self.attr_str("url")
    }

    /// Interpret a mention mark's attributes as a [`Mention`].
    ///
    /// Returns `None` for non-mention marks and for mention marks whose
    /// entry attributes are incomplete.
    pub fn as_mention(&self) -> Option<Mention> {
        if self.kind != MarkKind::Mention {
            return None;
        }
        Mention::new(
            self.attr_str("entryId"),
            self.attr_str("entrySlug"),
            self.attr_str("entryTitle"),
        )
        .ok()
    }
}

/// Read an attribute as a string, coercing scalars and treating anything
/// else as absent. Stored content predating attribute validation may hold
/// numbers or nulls where strings belong.
pub fn attr_string(attrs: &Attrs, key: &str) -> String {
    match attrs.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Set equality over two mark lists.
///
/// Both sides are sorted by the canonical kind order before positional
/// comparison, so `[bold, italic]` equals `[italic, bold]`. Attribute
/// maps compare by value.
pub fn are_marks_equal(a: &[Mark], b: &[Mark]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut left = a.to_vec();
    let mut right = b.to_vec();
    left.sort_by_key(|m| m.kind.order());
    right.sort_by_key(|m| m.kind.order());
    left == right
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mention() -> Mention {
        Mention::new("01H5", "frost-giants", "Frost Giants")
            .expect("mention should build")
    }

    // ===================================================================
    // Canonical order
    // ===================================================================

    #[test]
    fn canonical_order_is_mention_first() {
        assert!(MarkKind::Mention.order() < MarkKind::Link.order());
        assert!(MarkKind::Link.order() < MarkKind::Bold.order());
        assert!(MarkKind::Bold.order() < MarkKind::Italic.order());
        assert!(MarkKind::Italic.order() < MarkKind::Underline.order());
        assert!(MarkKind::Underline.order() < MarkKind::Code.order());
        assert!(MarkKind::Code.order() < MarkKind::BulletList.order());
    }

    #[test]
    fn kind_names_are_camel_case() {
        assert_eq!(MarkKind::Bold.to_string(), "bold");
        assert_eq!(MarkKind::BulletList.to_string(), "bulletList");
    }

    // ===================================================================
    // Mark-set equality
    // ===================================================================

    #[test]
    fn equal_lists_are_equal() {
        let marks = vec![Mark::new(MarkKind::Bold), Mark::link("https://a")];
        assert!(are_marks_equal(&marks, &marks));
    }

    #[test]
    fn order_does_not_matter() {
        let ab = vec![Mark::new(MarkKind::Bold), Mark::new(MarkKind::Italic)];
        let ba = vec![Mark::new(MarkKind::Italic), Mark::new(MarkKind::Bold)];
        assert!(are_marks_equal(&ab, &ba));
    }

    #[test]
    fn different_lengths_are_unequal() {
        let one = vec![Mark::new(MarkKind::Bold)];
        assert!(!are_marks_equal(&one, &[]));
    }

    #[test]
    fn attrs_participate_in_equality() {
        let a = vec![Mark::link("https://a")];
        let b = vec![Mark::link("https://b")];
        assert!(!are_marks_equal(&a, &b));
    }

    #[test]
    fn empty_lists_are_equal() {
        assert!(are_marks_equal(&[], &[]));
    }

    // ===================================================================
    // Attribute coercion
    // ===================================================================

    #[test]
    fn numeric_attr_coerces_to_string() {
        let mut attrs = Attrs::new();
        attrs.insert("url".into(), Value::from(42));
        assert_eq!(attr_string(&attrs, "url"), "42");
    }

    #[test]
    fn null_and_missing_attrs_coerce_to_empty() {
        let mut attrs = Attrs::new();
        attrs.insert("url".into(), Value::Null);
        assert_eq!(attr_string(&attrs, "url"), "");
        assert_eq!(attr_string(&attrs, "absent"), "");
    }

    // ===================================================================
    // Mention bridging
    // ===================================================================

    #[test]
    fn mention_mark_round_trips_through_attrs() {
        let mark = Mark::mention(&mention());
        assert_eq!(mark.as_mention(), Some(mention()));
    }

    #[test]
    fn incomplete_mention_mark_is_not_a_mention() {
        let mut mark = Mark::mention(&mention());
        mark.attrs.remove("entrySlug");
        assert_eq!(mark.as_mention(), None);
    }

    #[test]
    fn link_mark_is_not_a_mention() {
        assert_eq!(Mark::link("https://a").as_mention(), None);
    }

    // ===================================================================
    // JSON shape
    // ===================================================================

    #[test]
    fn mark_serializes_with_type_tag() {
        let json = serde_json::to_value(Mark::new(MarkKind::Bold))
            .expect("mark serializes");
        assert_eq!(json, serde_json::json!({ "type": "bold" }));
    }

    #[test]
    fn link_mark_serializes_attrs() {
        let json = serde_json::to_value(Mark::link("https://a"))
            .expect("mark serializes");
        assert_eq!(
            json,
            serde_json::json!({ "type": "link", "attrs": { "url": "https://a" } })
        );
    }

    #[test]
    fn mark_without_attrs_deserializes() {
        let mark: Mark = serde_json::from_str(r#"{ "type": "italic" }"#)
            .expect("mark deserializes");
        assert_eq!(mark, Mark::new(MarkKind::Italic));
    }
}
