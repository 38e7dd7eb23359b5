//! Request bodies, validated from raw user input.

use serde::{Deserialize, Serialize};

use super::{Provider, ReferenceDepth};
use crate::config::defaults;
use crate::error::{RequestError, RequestResult};

/// Body of `POST /search_papers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Trimmed free-text query.
    pub query: String,

    /// Publication year filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,

    /// Provider to search.
    pub api: Provider,
}

impl SearchRequest {
    /// Validate user input.
    ///
    /// The query must be non-empty after trimming. A blank year means no
    /// filter; otherwise it must parse as an integer.
    pub fn parse(query: &str, year: Option<&str>, api: Provider) -> RequestResult<Self> {
        let query = query.trim();
        if query.is_empty() {
            return Err(RequestError::validation("query", "Please enter a search query"));
        }

        let year = match year.map(str::trim).filter(|y| !y.is_empty()) {
            Some(text) => Some(text.parse::<i32>().map_err(|_| {
                let message = format!("Year must be a whole number, got '{text}'");
                RequestError::validation("year", message)
            })?),
            None => None,
        };

        Ok(Self { query: query.to_string(), year, api })
    }
}

/// Body of `POST /download_references`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceRequest {
    /// Seed paper identifier.
    pub paper_id: String,

    /// Expansion depth.
    #[serde(default)]
    pub depth: ReferenceDepth,
}

impl ReferenceRequest {
    /// Validate user input; the paper id must be non-blank.
    pub fn parse(paper_id: &str, depth: ReferenceDepth) -> RequestResult<Self> {
        let paper_id = paper_id.trim();
        if paper_id.is_empty() {
            return Err(RequestError::validation("paper_id", "Paper ID is required"));
        }
        Ok(Self { paper_id: paper_id.to_string(), depth })
    }
}

/// Query parameters of `GET /suggest`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SuggestQuery {
    /// Partial query text.
    pub q: String,

    /// Provider to draw suggestions from.
    pub api: Provider,
}

impl SuggestQuery {
    /// Trimmed query, or `None` when it is too short to be worth asking about.
    #[must_use]
    pub fn new(input: &str, api: Provider) -> Option<Self> {
        let q = input.trim();
        (q.chars().count() >= defaults::MIN_SUGGESTION_QUERY_LEN)
            .then(|| Self { q: q.to_string(), api })
    }

    /// Query-string pairs in wire order.
    #[must_use]
    pub fn to_params(&self) -> [(&'static str, String); 2] {
        [("q", self.q.clone()), ("api", self.api.id().to_string())]
    }
}
