//! Response envelopes accepted from the backend.
//!
//! Each endpoint may wrap its records in one of a few shapes. Decoding is an
//! explicit union over those shapes; anything else is an invalid format.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use super::RawPaper;
use crate::error::{ClientError, ClientResult};

/// Envelope of `POST /search_papers`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SearchEnvelope {
    /// A bare array of paper objects.
    Bare(Vec<Value>),
    /// An object with a `papers` array.
    Wrapped {
        /// Paper objects.
        papers: Vec<Value>,
    },
}

impl SearchEnvelope {
    /// Decode a parsed response body.
    pub fn decode(body: Value) -> ClientResult<Self> {
        let kind = json_kind(&body);
        serde_json::from_value(body).map_err(|_| {
            ClientError::invalid_format(format!(
                "expected an array or an object with a 'papers' array, got {kind}"
            ))
        })
    }

    /// The raw elements, in response order.
    #[must_use]
    pub fn into_elements(self) -> Vec<Value> {
        match self {
            Self::Bare(papers) | Self::Wrapped { papers } => papers,
        }
    }
}

/// Envelope of `POST /download_references`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ReferenceEnvelope {
    /// A bare array of reference elements.
    Bare(Vec<Value>),
    /// `{ "references": [...] }`.
    Listed {
        /// Reference elements.
        references: Vec<Value>,
    },
    /// `{ "data": [...] }`, the graph API's paging shape.
    Paged {
        /// Reference elements.
        data: Vec<Value>,
    },
    /// `{ "paper": { "references": [...] } }`.
    Nested {
        /// Seed paper carrying the reference list.
        paper: ReferenceHolder,
    },
    /// A single `{ "paper": {...} }` or `{ "citedPaper": {...} }` object.
    Single {
        /// The one referenced paper.
        #[serde(alias = "citedPaper")]
        paper: Map<String, Value>,
    },
}

/// Object holding a reference list.
#[derive(Debug, Clone, Deserialize)]
pub struct ReferenceHolder {
    /// Reference elements.
    pub references: Vec<Value>,
}

impl ReferenceEnvelope {
    /// Decode a parsed response body.
    pub fn decode(body: Value) -> ClientResult<Self> {
        let kind = json_kind(&body);
        serde_json::from_value(body).map_err(|_| {
            ClientError::invalid_format(format!(
                "expected an array of references or a references object, got {kind}"
            ))
        })
    }

    /// The raw reference elements, in response order.
    #[must_use]
    pub fn into_elements(self) -> Vec<Value> {
        match self {
            Self::Bare(items)
            | Self::Listed { references: items }
            | Self::Paged { data: items }
            | Self::Nested { paper: ReferenceHolder { references: items } } => items,
            Self::Single { paper } => vec![Value::Object(paper)],
        }
    }
}

/// One element of a reference list.
#[derive(Debug, Clone)]
pub enum ReferenceShape {
    /// `{ "citedPaper": {...}, "references"?: [...] }`.
    Wrapped(RawPaper),
    /// A paper object directly.
    Bare(RawPaper),
}

impl ReferenceShape {
    /// Classify an element. Non-objects yield `None`.
    ///
    /// A wrapper's own `references` list takes precedence over one found on
    /// the cited paper.
    #[must_use]
    pub fn decode(element: Value) -> Option<Self> {
        let Value::Object(mut map) = element else {
            return None;
        };

        match map.remove("citedPaper") {
            Some(Value::Object(cited)) => {
                let mut paper = RawPaper::from_map(cited);
                if let Some(outer) = map.remove("references").filter(|v| !v.is_null()) {
                    paper.references = Some(outer);
                }
                Some(Self::Wrapped(paper))
            }
            _ => Some(Self::Bare(RawPaper::from_map(map))),
        }
    }

    /// The paper this element describes.
    #[must_use]
    pub fn into_raw(self) -> RawPaper {
        match self {
            Self::Wrapped(paper) | Self::Bare(paper) => paper,
        }
    }
}

/// Body of `GET /suggest`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SuggestionEnvelope {
    /// `"success"` or `"error"`; absent means success.
    #[serde(default)]
    pub status: SuggestionStatus,

    /// Suggested titles. `null` reads as none.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub suggestions: Vec<String>,

    /// Error detail when `status` is `"error"`.
    #[serde(default)]
    pub message: Option<String>,
}

/// Outcome flag of a suggestion response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionStatus {
    /// Suggestions are valid.
    #[default]
    Success,
    /// The backend failed; see `message`.
    Error,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
