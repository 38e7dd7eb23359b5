#![no_main]

use libfuzzer_sys::fuzz_target;
use paper_snowball::models::{ReferenceRequest, SearchRequest, SuggestionEnvelope};

fuzz_target!(|data: &[u8]| {
    // Request bodies and suggestion envelopes: Ok or Err, never a panic
    let _ = serde_json::from_slice::<SearchRequest>(data);
    let _ = serde_json::from_slice::<ReferenceRequest>(data);
    let _ = serde_json::from_slice::<SuggestionEnvelope>(data);
});
