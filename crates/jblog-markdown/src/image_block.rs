//! Editor image blocks.
//!
//! The post editor embeds images as pre-rendered HTML:
//!
//! ```text
//! <div class="image-block"><div class="image-container"><img src="/a.png" alt="A" /></div><p class="image-caption">Caption</p></div>
//! ```
//!
//! These fragments are lifted out of the text before any markdown rule runs
//! and put back with extra presentational classes once rendering is done.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

use crate::stash::Stash;

const BLOCK_OPEN: &str = r#"<div class="image-block">"#;
const DIV_CLOSE: &str = "</div>";

/// Class attributes extended on restore, applied in order.
const CLASS_AUGMENTS: [(&str, &str); 3] = [
    (
        r#"class="image-block""#,
        r#"class="image-block my-8 flex flex-col items-center""#,
    ),
    (
        r#"class="image-container""#,
        r#"class="image-container w-full overflow-hidden rounded-lg""#,
    ),
    (
        r#"class="image-caption""#,
        r#"class="image-caption mt-2 text-center text-sm text-gray-500 italic""#,
    ),
];

/// Bare editor `<img>` tag with only `src` and `alt`.
static BARE_IMG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<img src="([^"]*)" alt="([^"]*)"\s*/?>"#).unwrap());

/// Replace every image block in `text` with a placeholder token.
///
/// A block runs from `<div class="image-block">` to its matching `</div>`,
/// counting nested `<div>` elements. An unterminated block and anything after
/// it are left untouched.
pub(crate) fn extract(text: &str, stash: &mut Stash) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find(BLOCK_OPEN) {
        let Some(len) = block_len(&rest[start..]) else {
            break;
        };
        out.push_str(&rest[..start]);
        out.push_str(&stash.push(&rest[start..start + len]));
        rest = &rest[start + len..];
    }

    out.push_str(rest);
    out
}

/// Length of the block at the start of `block`, up to its matching `</div>`.
fn block_len(block: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut pos = 0;

    while let Some(offset) = block[pos..].find('<') {
        pos += offset;
        let rest = &block[pos..];
        if rest.starts_with(DIV_CLOSE) {
            depth = depth.saturating_sub(1);
            pos += DIV_CLOSE.len();
            if depth == 0 {
                return Some(pos);
            }
        } else {
            if is_div_open(rest) {
                depth += 1;
            }
            pos += 1;
        }
    }

    None
}

fn is_div_open(tag: &str) -> bool {
    tag.strip_prefix("<div")
        .and_then(|after| after.chars().next())
        .is_some_and(|c| c == '>' || c.is_ascii_whitespace())
}

/// Add presentational classes to a restored image block.
pub(crate) fn augment(block: &str) -> Cow<'_, str> {
    let mut html = block.to_owned();
    for (from, to) in CLASS_AUGMENTS {
        if html.contains(from) {
            html = html.replace(from, to);
        }
    }

    let html = BARE_IMG_RE
        .replace_all(
            &html,
            r#"<img src="${1}" alt="${2}" loading="lazy" class="h-auto max-w-full rounded-lg" />"#,
        )
        .into_owned();
    Cow::Owned(html)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stash::IMAGE_BLOCK_PREFIX;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extract_single_block() {
        let mut stash = Stash::new(IMAGE_BLOCK_PREFIX);
        let text = r#"before <div class="image-block"><img src="/a.png" alt="a" /></div> after"#;
        let out = extract(text, &mut stash);
        assert_eq!(out, "before JIMAGEBLOCKPLACEHOLDER0X after");
        assert_eq!(stash.len(), 1);
    }

    #[test]
    fn test_extract_nested_div() {
        let mut stash = Stash::new(IMAGE_BLOCK_PREFIX);
        let block = r#"<div class="image-block"><div class="image-container"><img src="/a.png" alt="a" /></div><p class="image-caption">c</p></div>"#;
        let out = extract(&format!("{block}\ntail"), &mut stash);
        assert_eq!(out, "JIMAGEBLOCKPLACEHOLDER0X\ntail");
        assert_eq!(
            stash.restore(&out, Cow::Borrowed),
            format!("{block}\ntail")
        );
    }

    #[test]
    fn test_extract_multiple_blocks_in_order() {
        let mut stash = Stash::new(IMAGE_BLOCK_PREFIX);
        let text = r#"<div class="image-block">1</div> and <div class="image-block">2</div>"#;
        let out = extract(text, &mut stash);
        assert_eq!(out, "JIMAGEBLOCKPLACEHOLDER0X and JIMAGEBLOCKPLACEHOLDER1X");
    }

    #[test]
    fn test_extract_unterminated_block_untouched() {
        let mut stash = Stash::new(IMAGE_BLOCK_PREFIX);
        let text = r#"<div class="image-block"><img src="/a.png" alt="a" />"#;
        assert_eq!(extract(text, &mut stash), text);
        assert_eq!(stash.len(), 0);
    }

    #[test]
    fn test_divider_tag_not_counted_as_div() {
        assert!(is_div_open("<div>"));
        assert!(is_div_open(r#"<div class="x">"#));
        assert!(!is_div_open("<divider>"));
    }

    #[test]
    fn test_augment_classes_and_img() {
        let block = r#"<div class="image-block"><div class="image-container"><img src="/a.png" alt="A" /></div><p class="image-caption">Cap</p></div>"#;
        assert_eq!(
            augment(block),
            r#"<div class="image-block my-8 flex flex-col items-center"><div class="image-container w-full overflow-hidden rounded-lg"><img src="/a.png" alt="A" loading="lazy" class="h-auto max-w-full rounded-lg" /></div><p class="image-caption mt-2 text-center text-sm text-gray-500 italic">Cap</p></div>"#
        );
    }

    #[test]
    fn test_augment_leaves_styled_img() {
        let block = r#"<div class="image-block"><img class="x" src="/a.png" /></div>"#;
        assert_eq!(
            augment(block),
            r#"<div class="image-block my-8 flex flex-col items-center"><img class="x" src="/a.png" /></div>"#
        );
    }
}
