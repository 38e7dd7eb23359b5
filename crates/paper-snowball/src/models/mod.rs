//! Data models for the search backend.
//!
//! Wire-side types (`RawPaper`, envelopes) are decoded leniently and turned
//! into the canonical `Paper` / `ReferenceNode` records by `crate::normalize`.

mod enums;
mod envelope;
mod inputs;
mod paper;
mod raw;

pub use enums::{Provider, ReferenceDepth, ResponseFormat};
pub use envelope::{
    ReferenceEnvelope, ReferenceHolder, ReferenceShape, SearchEnvelope, SuggestionEnvelope,
    SuggestionStatus,
};
pub use inputs::{ReferenceRequest, SearchRequest, SuggestQuery};
pub use paper::{Paper, ReferenceNode};
pub use raw::RawPaper;
