//! vslc_core: Core utilities for the vslc compiler.
//!
//! Provides source ranges, identifier interning, and the string pool that
//! collects every string literal of a compilation unit.

pub mod index;
pub mod intern;
pub mod string_pool;
pub mod text;

// Re-export commonly used types
pub use index::next_index;
pub use intern::{InternedString, StringInterner};
pub use string_pool::{StringIndex, StringPool};
pub use text::TextRange;
