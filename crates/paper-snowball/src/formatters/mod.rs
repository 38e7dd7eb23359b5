//! Renderers for paper lists, reference trees and view states.
//!
//! Markdown is meant for terminals; JSON output is compact and omits empty
//! fields.

mod json;
mod markdown;

pub use self::json::*;
pub use markdown::*;
