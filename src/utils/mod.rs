//! Utility functions

mod sanitize;

pub use sanitize::strip_unsafe_chars;
