//! Lightweight markdown renderer for JBlog posts.
//!
//! This crate converts the restricted markdown dialect produced by the JBlog
//! editor into HTML ready for direct injection into a page.
//!
//! # Architecture
//!
//! Rendering is an ordered pipeline of pure string passes rather than a parser:
//! - Editor image blocks (`<div class="image-block">`) are swapped for
//!   placeholder tokens before any rule runs and restored at the end.
//! - Code spans are optionally stashed the same way so emphasis and list rules
//!   cannot reach inside them (see [`RenderOptions::protect_code`]).
//! - Every rule in [`rules`] is a standalone `&str -> String` function, applied
//!   in a fixed order by [`MarkdownRenderer`].
//!
//! The renderer only escapes quotes inside attribute values. Callers rendering
//! untrusted input are responsible for sandboxing the output.
//!
//! # Example
//!
//! ```
//! use jblog_markdown::render;
//!
//! let html = render("# Hello\n\n**Bold** text");
//! assert!(html.starts_with("<h1"));
//! assert!(html.contains("<strong class='font-bold'>Bold</strong>"));
//! ```

mod image_block;
mod renderer;
pub mod rules;
mod stash;
mod util;

pub use renderer::{MarkdownRenderer, RenderOptions, render};
pub use util::{escape_attr, is_allowed_image_url};
