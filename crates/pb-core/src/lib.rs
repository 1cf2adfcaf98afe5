//! Shared types for the packbox archive packaging pipeline.

pub mod error;
pub mod value;

pub use error::{PackError, Result};
pub use value::PlaceholderValue;
