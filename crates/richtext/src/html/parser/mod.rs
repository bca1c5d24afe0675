// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

mod convert;
mod rawdom;
mod rawdom_creator;

use crate::content::Content;
use crate::html::parse_error::HtmlParseError;
use rawdom_creator::RawDomCreator;

/// Parse an HTML string into a content sequence.
///
/// Empty input, and input that parses to nothing, both yield a single
/// empty text run rather than an empty sequence. The result is always
/// normalized: adjacent text runs with equal mark sets are merged.
pub fn html_to_content(html: &str) -> Result<Content, HtmlParseError> {
    if html.is_empty() {
        return Ok(Content::from_plain_text(""));
    }
    let dom = RawDomCreator::parse(html)?;
    Ok(convert::raw_dom_to_content(&dom))
}

/// Like [`html_to_content`], but on a parse failure the raw input
/// becomes a single unmarked text run instead of an error. Use this at
/// boundaries where stored data of unknown provenance must always
/// produce something renderable.
pub fn html_to_content_or_plain(html: &str) -> Content {
    match html_to_content(html) {
        Ok(content) => content,
        Err(_err) => {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                parse_errors = ?_err.parse_errors,
                "treating unparseable html as plain text"
            );
            Content::from_plain_text(html)
        }
    }
}

#[cfg(test)]
mod tests {
    use speculoos::{assert_that, AssertionFailure, Spec};

    use super::*;
    use crate::content::ContentNode;
    use crate::html::serialize::content_to_html;
    use crate::mark::{Attrs, Mark, MarkKind};
    use entry_mentions::Mention;

    trait Roundtrips<T> {
        fn roundtrips(&self);
    }

    impl<T> Roundtrips<T> for Spec<'_, T>
    where
        T: AsRef<str>,
    {
        fn roundtrips(&self) {
            let subject = self.subject.as_ref();
            let content = html_to_content(subject).unwrap();

            // After parsing all our invariants should be satisfied
            content.explicitly_assert_invariants();

            let output = content_to_html(&content);
            if output != subject {
                AssertionFailure::from_spec(self)
                    .with_expected(String::from(subject))
                    .with_actual(output)
                    .fail();
            }
        }
    }

    fn parse(html: &str) -> Content {
        html_to_content(html).expect("html should parse")
    }

    // ===================================================================
    // Round trips over the canonical vocabulary
    // ===================================================================

    #[test]
    fn parse_plain_text() {
        assert_that!("some text").roundtrips();
    }

    #[test]
    fn parse_simple_tag() {
        assert_that!("<strong>sdfds</strong>").roundtrips();
    }

    #[test]
    fn parse_tag_with_surrounding_text() {
        assert_that!("before <strong>within</strong> after").roundtrips();
        assert_that!("before<strong>within</strong>after").roundtrips();
    }

    #[test]
    fn parse_nested_tags() {
        assert_that!("<strong><em>ZZ</em></strong>").roundtrips();
        assert_that!("X<strong>Y<em>ZZ</em>0</strong>1").roundtrips();
    }

    #[test]
    fn parse_escaped_text() {
        assert_that!("a &amp; b &lt;tag&gt;").roundtrips();
    }

    #[test]
    fn parse_image() {
        assert_that!(r#"<img src="/img/map.png" alt="A map" />"#)
            .roundtrips();
    }

    // ===================================================================
    // Tag → mark mapping
    // ===================================================================

    #[test]
    fn bold_tags_both_map_to_bold() {
        for html in ["<strong>x</strong>", "<b>x</b>"] {
            assert_eq!(
                parse(html).nodes(),
                &[ContentNode::text_with_marks(
                    "x",
                    vec![Mark::new(MarkKind::Bold)]
                )],
                "for input: {html}"
            );
        }
    }

    #[test]
    fn italic_tags_both_map_to_italic() {
        for html in ["<em>x</em>", "<i>x</i>"] {
            assert_eq!(
                parse(html).nodes(),
                &[ContentNode::text_with_marks(
                    "x",
                    vec![Mark::new(MarkKind::Italic)]
                )],
                "for input: {html}"
            );
        }
    }

    #[test]
    fn nested_tags_accumulate_marks() {
        let content = parse("<u><code>x</code></u>");
        assert_eq!(
            content.nodes(),
            &[ContentNode::text_with_marks(
                "x",
                vec![Mark::new(MarkKind::Underline), Mark::new(MarkKind::Code)]
            )]
        );
    }

    #[test]
    fn repeated_tag_adds_one_mark() {
        let content = parse("<b><b>x</b></b>");
        assert_eq!(
            content.nodes(),
            &[ContentNode::text_with_marks(
                "x",
                vec![Mark::new(MarkKind::Bold)]
            )]
        );
    }

    #[test]
    fn anchor_with_href_is_a_link() {
        let content = parse(r#"<a href="https://example.com">x</a>"#);
        assert_eq!(
            content.nodes(),
            &[ContentNode::text_with_marks(
                "x",
                vec![Mark::link("https://example.com")]
            )]
        );
    }

    #[test]
    fn anchor_with_entry_data_is_a_mention() {
        let html = concat!(
            r#"<a href="/frost-giants" data-entry-id="01H5" "#,
            r#"data-entry-slug="frost-giants" "#,
            r#"data-entry-title="Frost Giants">Frost Giants</a>"#,
        );
        let content = parse(html);
        let mention = Mention::new("01H5", "frost-giants", "Frost Giants")
            .expect("mention should build");
        assert_eq!(
            content.nodes(),
            &[ContentNode::text_with_marks(
                "Frost Giants",
                vec![Mark::mention(&mention)]
            )]
        );
    }

    #[test]
    fn anchor_with_partial_entry_data_falls_back_to_link() {
        let content =
            parse(r#"<a href="/x" data-entry-id="01H5">x</a>"#);
        assert_eq!(
            content.nodes(),
            &[ContentNode::text_with_marks("x", vec![Mark::link("/x")])]
        );
    }

    #[test]
    fn anchor_without_href_contributes_no_mark() {
        let content = parse("<a>x</a>");
        assert_eq!(content, Content::from_plain_text("x"));
    }

    // ===================================================================
    // Breaks, images, containers
    // ===================================================================

    #[test]
    fn br_becomes_a_newline_run() {
        let content = parse("a<br />b");
        assert_eq!(content, Content::from_plain_text("a\nb"));
    }

    #[test]
    fn br_inside_formatting_keeps_the_marks() {
        let content = parse("<b>a<br />b</b>");
        assert_eq!(
            content.nodes(),
            &[ContentNode::text_with_marks(
                "a\nb",
                vec![Mark::new(MarkKind::Bold)]
            )]
        );
    }

    #[test]
    fn img_without_src_is_skipped() {
        let content = parse(r#"a<img alt="x" />b"#);
        assert_eq!(content, Content::from_plain_text("ab"));
    }

    #[test]
    fn unknown_tags_are_plain_containers() {
        let content = parse("<p>a <span>b</span></p>");
        assert_eq!(content, Content::from_plain_text("a b"));
    }

    // ===================================================================
    // Empty and degenerate input
    // ===================================================================

    #[test]
    fn empty_input_yields_the_empty_document() {
        let content = parse("");
        assert_eq!(content, Content::from_plain_text(""));
    }

    #[test]
    fn input_with_no_content_yields_the_empty_document() {
        let content = parse("<p></p>");
        assert_eq!(content, Content::from_plain_text(""));
    }

    // ===================================================================
    // Normalization
    // ===================================================================

    #[test]
    fn adjacent_runs_with_equal_marks_merge() {
        let content = parse("<strong>foo</strong><strong>bar</strong>");
        assert_eq!(
            content.nodes(),
            &[ContentNode::text_with_marks(
                "foobar",
                vec![Mark::new(MarkKind::Bold)]
            )]
        );
    }

    #[test]
    fn adjacent_runs_with_different_marks_stay_apart() {
        let content = parse("<strong>foo</strong><em>bar</em>");
        assert_eq!(content.nodes().len(), 2);
    }

    #[test]
    fn split_plain_text_around_a_container_merges() {
        let content = parse("a<span>b</span>c");
        assert_eq!(content, Content::from_plain_text("abc"));
    }

    // ===================================================================
    // Fallback parsing
    // ===================================================================

    #[test]
    fn or_plain_passes_good_input_through() {
        let content = html_to_content_or_plain("<em>x</em>");
        assert_eq!(
            content.nodes(),
            &[ContentNode::text_with_marks(
                "x",
                vec![Mark::new(MarkKind::Italic)]
            )]
        );
    }

    // ===================================================================
    // Mention round trip is lossy by design
    // ===================================================================

    #[test]
    fn mention_round_trip_rewrites_text_to_entry_title() {
        let mention = Mention::new("01H5", "frost-giants", "Frost Giants")
            .expect("mention should build");
        let content = Content::from(vec![ContentNode::text_with_marks(
            "old title",
            vec![Mark::mention(&mention)],
        )]);
        let reparsed = parse(&content_to_html(&content));
        assert_eq!(
            reparsed.nodes(),
            &[ContentNode::text_with_marks(
                "Frost Giants",
                vec![Mark::mention(&mention)]
            )]
        );
    }

    #[test]
    fn image_attrs_survive_the_round_trip() {
        let mut attrs = Attrs::new();
        attrs.insert("src".into(), "/img/map.png".into());
        attrs.insert("alt".into(), "A map".into());
        let content = Content::from(vec![ContentNode::image(attrs)]);
        let reparsed = parse(&content_to_html(&content));
        assert_eq!(reparsed, content);
    }
}
