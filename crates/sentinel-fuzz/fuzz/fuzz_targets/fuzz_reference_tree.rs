#![no_main]

use libfuzzer_sys::fuzz_target;
use paper_snowball::models::ReferenceDepth;
use paper_snowball::normalize::normalize_references;

fuzz_target!(|data: &[u8]| {
    let Ok(body) = serde_json::from_slice::<serde_json::Value>(data) else {
        return;
    };

    if let Ok(nodes) = normalize_references(body.clone(), ReferenceDepth::Direct) {
        assert!(nodes.iter().all(|n| n.references.is_none()));
    }
    if let Ok(nodes) = normalize_references(body, ReferenceDepth::Nested) {
        assert!(nodes.iter().all(|n| n.height() <= 2));
    }
});
