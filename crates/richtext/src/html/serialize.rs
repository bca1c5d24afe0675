// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Content sequence → HTML string.
//!
//! Each text run is escaped and wrapped in the tags of its marks, sorted
//! by the canonical mark order: opening tags in order, closing tags in
//! reverse. Two runs with the same mark set therefore always serialize
//! identically, whatever order the marks were applied in.

use std::fmt::Write as _;

use crate::content::{Content, ContentNode};
use crate::mark::{attr_string, Attrs, Mark, MarkKind};

/// Serialize a content sequence to an HTML string. Empty content yields
/// an empty string.
pub fn content_to_html(content: &Content) -> String {
    let mut html = String::new();
    for node in content.nodes() {
        match node {
            ContentNode::Text { text, marks } => {
                emit_text(&mut html, text, marks);
            }
            ContentNode::Image { attrs } => emit_image(&mut html, attrs),
        }
    }
    html
}

fn emit_text(html: &mut String, text: &str, marks: &[Mark]) {
    let mut sorted: Vec<&Mark> = marks.iter().collect();
    sorted.sort_by_key(|m| m.kind.order());

    let mut rendered = html_escape::encode_text(text).into_owned();
    let mut open = String::new();
    let mut close = String::new();

    for mark in sorted {
        match mark.kind {
            MarkKind::Bold => wrap(&mut open, &mut close, "strong"),
            MarkKind::Italic => wrap(&mut open, &mut close, "em"),
            MarkKind::Underline => wrap(&mut open, &mut close, "u"),
            MarkKind::Code => wrap(&mut open, &mut close, "code"),
            MarkKind::Link => {
                let url = mark.url();
                // A link with no target renders as plain text.
                if !url.is_empty() {
                    let _ = write!(
                        open,
                        "<a href=\"{}\" target=\"_blank\" \
                         rel=\"noopener noreferrer\" class=\"content-link\">",
                        attr(&encode_uri(&url)),
                    );
                    close = format!("</a>{close}");
                }
            }
            MarkKind::Mention => {
                // A mention with incomplete entry attributes renders as
                // plain text; a complete one displays the entry's title
                // in place of the run's literal text.
                if let Some(mention) = mark.as_mention() {
                    rendered =
                        html_escape::encode_text(mention.entry_title())
                            .into_owned();
                    let _ = write!(
                        open,
                        "<a href=\"{}\" class=\"content-mention\" \
                         data-entry-id=\"{}\" data-entry-slug=\"{}\" \
                         data-entry-title=\"{}\">",
                        attr(&encode_uri(&mention.permalink())),
                        attr(mention.entry_id()),
                        attr(mention.entry_slug()),
                        attr(mention.entry_title()),
                    );
                    close = format!("</a>{close}");
                }
            }
            // List membership is block-level state with no inline tag.
            MarkKind::BulletList | MarkKind::OrderedList => {}
        }
    }

    html.push_str(&open);
    html.push_str(&rendered);
    html.push_str(&close);
}

fn emit_image(html: &mut String, attrs: &Attrs) {
    let src = attr_string(attrs, "src");
    if src.is_empty() {
        return;
    }
    let alt = attr_string(attrs, "alt");
    let _ = write!(html, "<img src=\"{}\" alt=\"{}\" />", attr(&src), attr(&alt));
}

fn wrap(open: &mut String, close: &mut String, tag: &str) {
    let _ = write!(open, "<{tag}>");
    *close = format!("</{tag}>{close}");
}

fn attr(value: &str) -> String {
    html_escape::encode_double_quoted_attribute(value).into_owned()
}

/// Percent-encode the characters `encodeURI` escapes: everything outside
/// the RFC 2396 unreserved and reserved sets plus `#`, as UTF-8 bytes.
pub(crate) fn encode_uri(input: &str) -> String {
    const KEEP: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ\
                        abcdefghijklmnopqrstuvwxyz\
                        0123456789;,/?:@&=+$-_.!~*'()#";
    let mut out = String::with_capacity(input.len());
    let mut buf = [0u8; 4];
    for ch in input.chars() {
        if KEEP.contains(ch) {
            out.push(ch);
        } else {
            for byte in ch.encode_utf8(&mut buf).as_bytes() {
                let _ = write!(out, "%{byte:02X}");
            }
        }
    }
    out
}
