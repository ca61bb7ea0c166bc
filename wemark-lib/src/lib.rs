//! wemark: publish Markdown notes as inline-styled HTML articles.
//!
//! The WeChat article editor strips `<style>` blocks and honors little
//! beyond `style="..."` attributes, so publishing a themed note means baking
//! the theme's CSS into inline styles on every element. The core of this
//! crate is that transpiler: a CSS rule extractor with root-selector
//! remapping ([`style::rules`]), a selector matcher ([`style::css_matcher`]),
//! a property-level style merger ([`style::inline`]), and the structural
//! fixups the editor's quirks demand ([`style::fixups`]), all driven by
//! [`convert::convert`]. Markdown rendering ([`markdown`]) and theme loading
//! ([`themes`]) round out the publishing pipeline.

pub mod convert;
pub mod dom;
pub mod markdown;
pub mod parser;
pub mod style;
pub mod themes;

pub use convert::convert;
