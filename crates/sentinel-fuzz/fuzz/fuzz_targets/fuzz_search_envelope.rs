#![no_main]

use libfuzzer_sys::fuzz_target;
use paper_snowball::models::Provider;
use paper_snowball::normalize::normalize_papers;

fuzz_target!(|data: &[u8]| {
    if let Ok(body) = serde_json::from_slice::<serde_json::Value>(data) {
        if let Ok(papers) = normalize_papers(body, Provider::ArxivPapers) {
            // Every surviving record has a title
            assert!(papers.iter().all(|p| !p.title.is_empty()));
        }
    }
});
