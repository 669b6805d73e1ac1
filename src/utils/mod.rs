//! Pattern compilation helpers.
//!
//! This module provides:
//! - Regex compilation for static patterns
//! - CSS selector parsing for static selectors

mod compile;
mod selector;

pub use compile::compile_regex_unsafe;
pub use selector::parse_selector_unsafe;
