//! Fuzzing library for paper-snowball.
//!
//! Targets feed arbitrary bytes through response envelope decoding and
//! reference tree normalization, which must never panic.
//!
//! # Usage
//!
//! ```bash
//! cd crates/sentinel-fuzz
//! cargo +nightly fuzz run fuzz_search_envelope -- -max_total_time=60
//! ```

pub use paper_snowball::{models, normalize};
