//! Pipeline driver.

use std::borrow::Cow;

use crate::image_block;
use crate::rules;
use crate::stash::{CODE_BLOCK_PREFIX, IMAGE_BLOCK_PREFIX, INLINE_CODE_PREFIX, Stash};

/// A single rendering pass.
type Pass = fn(&str) -> String;

/// Rendering passes in application order.
const PASSES: [(&str, Pass); 11] = [
    ("headers", rules::headers),
    ("bold", rules::bold),
    ("italic", rules::italic),
    ("fenced_code", rules::fenced_code),
    ("inline_code", rules::inline_code),
    ("links", rules::links),
    ("images", rules::images),
    ("lists", rules::lists),
    ("blockquotes", rules::blockquotes),
    ("horizontal_rules", rules::horizontal_rules),
    ("paragraphs", rules::paragraphs),
];

/// Renderer options.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RenderOptions {
    /// Shield code spans from every other rule.
    ///
    /// When enabled (the default), fenced and inline code are lifted out with
    /// the image blocks and rendered back at the end, so `*`, `_`, `-` and
    /// `[..](..)` inside code stay literal. When disabled, code is wrapped in
    /// place and later rules (links, images, lists, paragraphs) still see its
    /// content.
    pub protect_code: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { protect_code: true }
    }
}

/// Markdown to HTML renderer.
///
/// Stateless apart from its options; a single instance can be shared across
/// threads.
///
/// # Example
///
/// ```
/// use jblog_markdown::MarkdownRenderer;
///
/// let renderer = MarkdownRenderer::new().with_code_protection(false);
/// let html = renderer.render("Hello *world*");
/// assert_eq!(html, "<p class='mb-4 leading-relaxed'>Hello <em class='italic'>world</em></p>");
/// ```
#[derive(Clone, Debug, Default)]
pub struct MarkdownRenderer {
    options: RenderOptions,
}

impl MarkdownRenderer {
    /// Create a renderer with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a renderer with the given options.
    #[must_use]
    pub fn with_options(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Enable or disable code protection.
    #[must_use]
    pub fn with_code_protection(mut self, enabled: bool) -> Self {
        self.options.protect_code = enabled;
        self
    }

    /// Get the renderer options.
    #[must_use]
    pub fn options(&self) -> RenderOptions {
        self.options
    }

    /// Render markdown content to HTML.
    ///
    /// Never fails: malformed constructs are left as literal text.
    pub fn render(&self, content: &str) -> String {
        if content.is_empty() {
            return String::new();
        }

        let mut image_blocks = Stash::new(IMAGE_BLOCK_PREFIX);
        let mut code_blocks = Stash::new(CODE_BLOCK_PREFIX);
        let mut code_spans = Stash::new(INLINE_CODE_PREFIX);

        let mut text = image_block::extract(content, &mut image_blocks);
        if self.options.protect_code {
            text = rules::stash_fenced_code(&text, &mut code_blocks);
            text = rules::stash_inline_code(&text, &mut code_spans);
        }

        for (_name, pass) in PASSES {
            text = pass(&text);
        }

        let text = code_blocks.restore(&text, |code| Cow::Owned(rules::pre_block(code)));
        let text = code_spans.restore(&text, |code| Cow::Owned(rules::code_span(code)));
        let html = image_blocks.restore(&text, image_block::augment);

        tracing::debug!(
            input_len = content.len(),
            output_len = html.len(),
            image_blocks = image_blocks.len(),
            code_blocks = code_blocks.len(),
            code_spans = code_spans.len(),
            "Rendered markdown"
        );

        html
    }
}

/// Render markdown content to HTML with default options.
///
/// Shorthand for `MarkdownRenderer::new().render(content)`.
pub fn render(content: &str) -> String {
    MarkdownRenderer::new().render(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_pass_order() {
        let names: Vec<_> = PASSES.iter().map(|(name, _)| *name).collect();
        assert_eq!(
            names,
            vec![
                "headers",
                "bold",
                "italic",
                "fenced_code",
                "inline_code",
                "links",
                "images",
                "lists",
                "blockquotes",
                "horizontal_rules",
                "paragraphs",
            ]
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(render(""), "");
    }

    #[test]
    fn test_whitespace_only_input() {
        assert_eq!(render("\n\n  \n"), "");
    }

    #[test]
    fn test_default_options_protect_code() {
        assert!(MarkdownRenderer::new().options().protect_code);
        assert!(!MarkdownRenderer::new().with_code_protection(false).options().protect_code);
    }

    #[test]
    fn test_protected_code_block_skips_emphasis() {
        assert_eq!(
            render("```\ncode *here*\n```"),
            "<pre class='bg-gray-100 rounded-lg p-4 my-4 overflow-x-auto'><code>\ncode *here*\n</code></pre>"
        );
    }

    #[test]
    fn test_unprotected_code_block_gets_emphasis() {
        let html = MarkdownRenderer::new()
            .with_code_protection(false)
            .render("```\ncode *here*\n```");
        assert!(html.contains("code <em class='italic'>here</em>"), "{html}");
    }

    #[test]
    fn test_protected_code_block_keeps_list_lines() {
        let html = render("```\n- not a list\n1. nor this\n\n> or this\n```");
        assert!(html.contains("\n- not a list\n1. nor this\n\n> or this\n"), "{html}");
        assert!(!html.contains("<li"), "{html}");
        assert!(!html.contains("<p "), "{html}");
    }

    #[test]
    fn test_protected_inline_code_in_paragraph() {
        assert_eq!(
            render("run `a_b_c` now"),
            "<p class='mb-4 leading-relaxed'>run <code class='bg-gray-100 rounded px-1 py-0.5 font-mono text-sm'>a_b_c</code> now</p>"
        );
    }

    #[test]
    fn test_text_before_code_block() {
        let html = render("intro\n```\nx\n```");
        assert_eq!(
            html,
            "<p class='mb-4 leading-relaxed'>intro<br><pre class='bg-gray-100 rounded-lg p-4 my-4 overflow-x-auto'><code>\nx\n</code></pre></p>"
        );
    }
}
