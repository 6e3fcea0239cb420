//! Individual rendering rules.
//!
//! Each rule is a pure `&str -> String` transformation over the whole text.
//! [`MarkdownRenderer`](crate::MarkdownRenderer) applies them in the order
//! they appear in this module; the rules are public so they can be exercised
//! one at a time.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::stash::{CODE_BLOCK_PREFIX, IMAGE_BLOCK_PREFIX, Stash};
use crate::util::{escape_attr, is_allowed_image_url};

const H1_CLASS: &str = "text-3xl font-bold mt-8 mb-4";
const H2_CLASS: &str = "text-2xl font-bold mt-6 mb-3";
const H3_CLASS: &str = "text-xl font-semibold mt-4 mb-2";
const PRE_CLASS: &str = "bg-gray-100 rounded-lg p-4 my-4 overflow-x-auto";
const CODE_CLASS: &str = "bg-gray-100 rounded px-1 py-0.5 font-mono text-sm";
const LINK_CLASS: &str = "text-blue-600 underline hover:text-blue-800";
const IMG_CLASS: &str = "my-4 h-auto max-w-full rounded-lg";
const UL_ITEM_CLASS: &str = "ml-4 list-disc";
const OL_ITEM_CLASS: &str = "ml-4 list-decimal";
const LIST_CLASS: &str = "my-4 space-y-1";
const QUOTE_CLASS: &str = "border-l-4 border-gray-300 pl-4 my-4 italic text-gray-600";
const HR_CLASS: &str = "my-8 border-gray-300";
const P_CLASS: &str = "mb-4 leading-relaxed";

static H3_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^### (.*)$").unwrap());
static H2_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^## (.*)$").unwrap());
static H1_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^# (.*)$").unwrap());

static BOLD_STAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());
static BOLD_UNDERSCORE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"__(.+?)__").unwrap());

/// Emphasis stays on one line and may not open with whitespace, so a `* item`
/// list marker is never taken for an opening `*`.
static ITALIC_STAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*([^*\s][^*\n]*?)\*").unwrap());
static ITALIC_UNDERSCORE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_([^_\s][^_\n]*?)_").unwrap());

static FENCED_CODE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)```(.*?)```").unwrap());
static INLINE_CODE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`([^`\n]+)`").unwrap());

/// Link syntax, with an optional leading `!` so images can be skipped.
static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(!?)\[([^\]\n]+)\]\(([^)\n]+)\)").unwrap());
static IMAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[([^\]\n]*)\]\(([^)\n]*)\)").unwrap());
/// `url` or `url "title"`; the url holds no whitespace or quotes.
static IMAGE_SPEC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^([^\s"']+)(?:\s+"([^"]*)")?$"#).unwrap());
static TRAILING_TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\s+"[^"]*"\s*$"#).unwrap());

static UL_ITEM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^[*-] (.*)$").unwrap());
static OL_ITEM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^\d+\. (.*)$").unwrap());
static UL_RUN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?m)(?:^<li class='{UL_ITEM_CLASS}'>.*</li>(?:\n|$))+"
    ))
    .unwrap()
});
static OL_RUN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?m)(?:^<li class='{OL_ITEM_CLASS}'>.*</li>(?:\n|$))+"
    ))
    .unwrap()
});

static BLOCKQUOTE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^> (.*)$").unwrap());
static HR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^---$").unwrap());

/// Convert `#`, `##` and `###` lines to headings.
///
/// The most specific marker is matched first so `###` never becomes `<h1>`.
pub fn headers(text: &str) -> String {
    let text = H3_RE.replace_all(text, format!("<h3 class='{H3_CLASS}'>${{1}}</h3>"));
    let text = H2_RE.replace_all(&text, format!("<h2 class='{H2_CLASS}'>${{1}}</h2>"));
    H1_RE
        .replace_all(&text, format!("<h1 class='{H1_CLASS}'>${{1}}</h1>"))
        .into_owned()
}

/// Convert `**text**` and `__text__` to `<strong>`.
pub fn bold(text: &str) -> String {
    let text = BOLD_STAR_RE.replace_all(text, "<strong class='font-bold'>${1}</strong>");
    BOLD_UNDERSCORE_RE
        .replace_all(&text, "<strong class='font-bold'>${1}</strong>")
        .into_owned()
}

/// Convert `*text*` and `_text_` to `<em>`. Runs after [`bold`].
pub fn italic(text: &str) -> String {
    let text = ITALIC_STAR_RE.replace_all(text, "<em class='italic'>${1}</em>");
    ITALIC_UNDERSCORE_RE
        .replace_all(&text, "<em class='italic'>${1}</em>")
        .into_owned()
}

/// Wrap triple-backtick spans in `<pre><code>`.
///
/// The content is emitted as-is; an info string after the opening fence stays
/// part of the content.
pub fn fenced_code(text: &str) -> String {
    FENCED_CODE_RE
        .replace_all(text, |caps: &Captures| pre_block(&caps[1]))
        .into_owned()
}

/// Wrap single-backtick spans in `<code>`.
pub fn inline_code(text: &str) -> String {
    INLINE_CODE_RE
        .replace_all(text, |caps: &Captures| code_span(&caps[1]))
        .into_owned()
}

/// Convert `[label](url)` to an anchor that opens in a new tab.
///
/// `![alt](url)` is left for [`images`].
pub fn links(text: &str) -> String {
    LINK_RE
        .replace_all(text, |caps: &Captures| {
            if &caps[1] == "!" {
                return caps[0].to_owned();
            }
            format!(
                "<a href='{}' target='_blank' rel='noopener noreferrer' class='{LINK_CLASS}'>{}</a>",
                escape_attr(caps[3].trim()),
                &caps[2]
            )
        })
        .into_owned()
}

/// Convert `![alt](url)` and `![alt](url "title")` to lazy-loaded images.
///
/// URLs that are neither `http(s)://` nor site-relative leave the original
/// markdown in place.
pub fn images(text: &str) -> String {
    IMAGE_RE
        .replace_all(text, |caps: &Captures| {
            let alt = &caps[1];
            let (url, title) = parse_image_spec(&caps[2]);

            if !is_allowed_image_url(&url) {
                tracing::warn!(url = %url, "Skipping image with disallowed URL");
                return caps[0].to_owned();
            }

            let title_attr = title
                .map(|t| format!(" title='{}'", escape_attr(&t)))
                .unwrap_or_default();
            format!(
                "<img src='{}' alt='{}'{title_attr} loading='lazy' class='{IMG_CLASS}' />",
                escape_attr(&url),
                escape_attr(alt)
            )
        })
        .into_owned()
}

/// Split an image target into url and optional title.
fn parse_image_spec(spec: &str) -> (String, Option<String>) {
    let spec = spec.trim();
    if let Some(caps) = IMAGE_SPEC_RE.captures(spec) {
        let title = caps.get(2).map(|m| m.as_str().to_owned());
        return (caps[1].to_owned(), title);
    }

    let url = TRAILING_TITLE_RE.replace(spec, "");
    let url = url.trim().trim_matches(['"', '\'']).trim();
    (url.to_owned(), None)
}

/// Convert `* x` / `- x` and `1. x` lines to list items and group them.
///
/// Unordered and ordered items carry different classes, so each wrapping pass
/// only picks up its own items.
pub fn lists(text: &str) -> String {
    let text = UL_ITEM_RE.replace_all(text, format!("<li class='{UL_ITEM_CLASS}'>${{1}}</li>"));
    let text = OL_ITEM_RE.replace_all(&text, format!("<li class='{OL_ITEM_CLASS}'>${{1}}</li>"));
    let text = UL_RUN_RE.replace_all(&text, |caps: &Captures| wrap_run(&caps[0], "ul"));
    OL_RUN_RE
        .replace_all(&text, |caps: &Captures| wrap_run(&caps[0], "ol"))
        .into_owned()
}

fn wrap_run(run: &str, tag: &str) -> String {
    let items = run.trim_end_matches('\n');
    let tail = &run[items.len()..];
    format!("<{tag} class='{LIST_CLASS}'>\n{items}\n</{tag}>{tail}")
}

/// Convert `> x` lines to blockquotes.
pub fn blockquotes(text: &str) -> String {
    BLOCKQUOTE_RE
        .replace_all(text, format!("<blockquote class='{QUOTE_CLASS}'>${{1}}</blockquote>"))
        .into_owned()
}

/// Convert lines consisting of exactly `---` to `<hr>`.
pub fn horizontal_rules(text: &str) -> String {
    HR_RE
        .replace_all(text, format!("<hr class='{HR_CLASS}' />"))
        .into_owned()
}

/// Wrap loose text blocks in `<p>`.
///
/// Blocks are separated by blank lines. Whitespace-only blocks are dropped;
/// other blocks lose only the newlines at their edges, so leading and
/// trailing spaces survive. Blocks already starting with a tag, holding an
/// image block, or starting with a code block pass through; the rest get
/// `<br>` for single newlines.
pub fn paragraphs(text: &str) -> String {
    text.split("\n\n")
        .map(|block| block.trim_matches('\n'))
        .filter(|block| !block.trim().is_empty())
        .map(|block| {
            if block.starts_with('<')
                || block.contains(IMAGE_BLOCK_PREFIX)
                || block.starts_with(CODE_BLOCK_PREFIX)
            {
                block.to_owned()
            } else {
                format!("<p class='{P_CLASS}'>{}</p>", block.replace('\n', "<br>"))
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Move fenced code spans into `stash`, leaving placeholder tokens.
pub(crate) fn stash_fenced_code(text: &str, stash: &mut Stash) -> String {
    FENCED_CODE_RE
        .replace_all(text, |caps: &Captures| stash.push(&caps[1]))
        .into_owned()
}

/// Move inline code spans into `stash`, leaving placeholder tokens.
pub(crate) fn stash_inline_code(text: &str, stash: &mut Stash) -> String {
    INLINE_CODE_RE
        .replace_all(text, |caps: &Captures| stash.push(&caps[1]))
        .into_owned()
}

/// HTML for a fenced code block.
pub(crate) fn pre_block(content: &str) -> String {
    format!("<pre class='{PRE_CLASS}'><code>{content}</code></pre>")
}

/// HTML for an inline code span.
pub(crate) fn code_span(content: &str) -> String {
    format!("<code class='{CODE_CLASS}'>{content}</code>")
}
