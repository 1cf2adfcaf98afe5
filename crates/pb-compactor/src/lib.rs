//! Pluggable file content compactors.
//!
//! A [`CompactorChain`] runs registered [`Compactor`]s over file contents in
//! registration order. Built-in compactors:
//! 1. JSON minifier
//! 2. Whitespace cleanup
//! 3. Whole-line comment stripping

pub mod chain;
pub mod comments;
pub mod format;
pub mod json;
pub mod registry;
pub mod traits;

pub use chain::CompactorChain;
pub use comments::CommentCompactor;
pub use format::WhitespaceCompactor;
pub use json::JsonCompactor;
pub use registry::CompactorSpec;
pub use traits::{Compactor, ExtensionFilter, FnCompactor};
