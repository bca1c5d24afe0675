// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Convert a [`RawDom`] into a content sequence.
//!
//! The walk descends from the document accumulating the union of
//! ancestor marks and emits one text run per text leaf, a `"\n"` run per
//! `<br>`, and one inline node per `<img>` with a source. Unrecognized
//! tags contribute no marks and act as plain containers, so arbitrary
//! stored markup degrades instead of failing.

use entry_mentions::Mention;
use serde_json::Value;

use super::rawdom::{RawDom, RawElement, RawHandle, RawNode};
use crate::content::{Content, ContentNode};
use crate::mark::{Attrs, Mark, MarkKind};

pub(crate) fn raw_dom_to_content(dom: &RawDom) -> Content {
    let mut nodes = Vec::new();
    for child in &dom.document().children {
        collect_node(dom, child, &[], &mut nodes);
    }
    if nodes.is_empty() {
        // The document always keeps one text anchor for the caret.
        return Content::from_plain_text("");
    }
    let content = Content::from(nodes).merged();
    content.assert_invariants();
    content
}

fn collect_node(
    dom: &RawDom,
    handle: &RawHandle,
    inherited: &[Mark],
    out: &mut Vec<ContentNode>,
) {
    match dom.get_node(handle) {
        RawNode::Text(text) => {
            if !text.content.is_empty() {
                out.push(ContentNode::Text {
                    text: text.content.clone(),
                    marks: inherited.to_vec(),
                });
            }
        }
        RawNode::Element(element) => {
            collect_element(dom, element, inherited, out)
        }
        RawNode::Document(_) => {
            panic!("Found a document inside a document!")
        }
    }
}

fn collect_element(
    dom: &RawDom,
    element: &RawElement,
    inherited: &[Mark],
    out: &mut Vec<ContentNode>,
) {
    match element.tag() {
        "br" => out.push(ContentNode::Text {
            text: "\n".into(),
            marks: inherited.to_vec(),
        }),
        "img" => {
            // An image without a source is not worth an offset unit.
            if let Some(src) =
                element.get_attr("src").filter(|src| !src.is_empty())
            {
                let mut attrs = Attrs::new();
                attrs.insert("src".into(), Value::String(src.to_owned()));
                attrs.insert(
                    "alt".into(),
                    Value::String(
                        element.get_attr("alt").unwrap_or("").to_owned(),
                    ),
                );
                out.push(ContentNode::Image { attrs });
            }
        }
        _ => {
            let mut marks = inherited.to_vec();
            if let Some(mark) = element_mark(element) {
                // Union semantics: a tag repeated inside itself adds
                // nothing new.
                if !marks.iter().any(|m| m.kind == mark.kind) {
                    marks.push(mark);
                }
            }
            for child in &element.children {
                collect_node(dom, child, &marks, out);
            }
        }
    }
}

/// The mark contributed by an element, if any.
fn element_mark(element: &RawElement) -> Option<Mark> {
    match element.tag() {
        "strong" | "b" => Some(Mark::new(MarkKind::Bold)),
        "em" | "i" => Some(Mark::new(MarkKind::Italic)),
        "u" => Some(Mark::new(MarkKind::Underline)),
        "code" => Some(Mark::new(MarkKind::Code)),
        "a" => {
            // An anchor with complete entry data is a mention; the
            // mention wins over a plain link when both could apply.
            let mention = Mention::new(
                element.get_attr("data-entry-id").unwrap_or(""),
                element.get_attr("data-entry-slug").unwrap_or(""),
                element.get_attr("data-entry-title").unwrap_or(""),
            );
            if let Ok(mention) = mention {
                Some(Mark::mention(&mention))
            } else {
                element
                    .get_attr("href")
                    .filter(|href| !href.is_empty())
                    .map(Mark::link)
            }
        }
        _ => None,
    }
}
