//! Property-based tests for the rendering pipeline.
//!
//! These check the guarantees that hold for every input rather than for a
//! handful of hand-picked posts.

use jblog_markdown::{MarkdownRenderer, render};
use proptest::prelude::*;

const P_OPEN: &str = "<p class='mb-4 leading-relaxed'>";

/// Text with no markdown-significant characters and at least one visible one.
fn plain_text() -> impl Strategy<Value = String> {
    " {0,3}[A-Za-z0-9,;:?!][A-Za-z0-9 ,;:?!]{0,60}"
}

/// Editor image block whose caption carries a unique marker for `index`.
fn image_block(index: usize, caption: &str) -> String {
    format!(
        r#"<div class="image-block"><div class="image-container"><img src="/uploads/{index}.png" alt="a_{index}" /></div><p class="image-caption">B{index}-{caption}</p></div>"#
    )
}

proptest! {
    #[test]
    fn plain_text_becomes_one_paragraph(text in plain_text()) {
        prop_assert_eq!(render(&text), format!("{P_OPEN}{text}</p>"));
    }

    #[test]
    fn render_is_total(text in any::<String>()) {
        let _ = render(&text);
        let _ = MarkdownRenderer::new().with_code_protection(false).render(&text);
    }

    #[test]
    fn render_is_total_on_markdown_soup(text in "[#*_`>\\-!\\[\\]()0-9a-z \n]{0,80}") {
        let _ = render(&text);
    }

    #[test]
    fn image_blocks_keep_count_and_order(
        parts in prop::collection::vec(("[a-z]{0,6}", "[0-9a-z *_#`>\n-]{0,8}"), 0..16),
    ) {
        let input: String = parts
            .iter()
            .enumerate()
            .map(|(i, (caption, sep))| format!("{}{sep}", image_block(i, caption)))
            .collect();

        let html = render(&input);

        prop_assert_eq!(
            html.matches(r#"<div class="image-block my-8 flex flex-col items-center">"#).count(),
            parts.len()
        );
        let mut last = 0;
        for (i, (caption, _)) in parts.iter().enumerate() {
            let marker = format!(">B{i}-{caption}</p>");
            prop_assert_eq!(html.matches(&marker).count(), 1, "block {} in {}", i, html);
            let pos = html.find(&marker).unwrap_or_default();
            prop_assert!(pos >= last, "block {} out of order in {}", i, html);
            last = pos;
        }
    }
}
