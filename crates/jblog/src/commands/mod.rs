//! CLI command implementations.

pub(crate) mod fetch;
pub(crate) mod render;

pub(crate) use fetch::{FetchArgs, FetchError};
pub(crate) use render::RenderArgs;
