//! Placeholder stash for fragments that must survive the rule pipeline.

use std::borrow::Cow;

/// Token prefix for editor image blocks.
pub(crate) const IMAGE_BLOCK_PREFIX: &str = "JIMAGEBLOCKPLACEHOLDER";

/// Token prefix for fenced code blocks.
pub(crate) const CODE_BLOCK_PREFIX: &str = "JCODEBLOCKPLACEHOLDER";

/// Token prefix for inline code spans.
pub(crate) const INLINE_CODE_PREFIX: &str = "JINLINECODEPLACEHOLDER";

/// Closes every token so an index is never extended by digits that follow it.
const TOKEN_END: char = 'X';

/// Ordered store of fragments swapped out for placeholder tokens.
///
/// Tokens have the form `{prefix}{index}X` with an uppercase ASCII prefix, so
/// none of the markdown rules can match inside them. Indexes are zero-based in
/// order of insertion.
#[derive(Debug)]
pub(crate) struct Stash {
    prefix: &'static str,
    items: Vec<String>,
}

impl Stash {
    /// Create an empty stash issuing tokens with the given prefix.
    pub(crate) fn new(prefix: &'static str) -> Self {
        Self {
            prefix,
            items: Vec::new(),
        }
    }

    /// Store a fragment and return the token that stands in for it.
    pub(crate) fn push(&mut self, fragment: impl Into<String>) -> String {
        let token = format!("{}{}{TOKEN_END}", self.prefix, self.items.len());
        self.items.push(fragment.into());
        token
    }

    /// Get the number of stored fragments.
    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    /// Replace every token in `text` with its fragment passed through `render`.
    ///
    /// Unterminated tokens and tokens whose index is out of range are left
    /// as-is.
    pub(crate) fn restore<'a, F>(&'a self, text: &str, render: F) -> String
    where
        F: Fn(&'a str) -> Cow<'a, str>,
    {
        if self.items.is_empty() {
            return text.to_owned();
        }

        let mut out = String::with_capacity(text.len());
        let mut rest = text;

        while let Some(start) = rest.find(self.prefix) {
            out.push_str(&rest[..start]);
            let after = &rest[start + self.prefix.len()..];

            match self.resolve(after) {
                Some((index, used)) => {
                    out.push_str(&render(&self.items[index]));
                    rest = &after[used..];
                }
                None => {
                    out.push_str(self.prefix);
                    rest = after;
                }
            }
        }

        out.push_str(rest);
        out
    }

    /// Parse `{index}X` at the start of `after`, returning the index and the
    /// number of bytes the token tail occupies.
    fn resolve(&self, after: &str) -> Option<(usize, usize)> {
        let digits = after.bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 || !after[digits..].starts_with(TOKEN_END) {
            return None;
        }
        let index: usize = after[..digits].parse().ok()?;
        (index < self.items.len()).then_some((index, digits + TOKEN_END.len_utf8()))
    }
}
