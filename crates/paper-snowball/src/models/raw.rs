//! Provider-shaped paper objects as they arrive on the wire.
//!
//! Every field is optional and decoded leniently: a value of the wrong type
//! degrades to the field's default instead of failing the whole record.

use serde::Deserialize;
use serde_json::{Map, Value};

use super::{Paper, Provider};
use crate::config::defaults;

/// A paper-like object before canonicalization.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPaper {
    /// Semantic Scholar style identifier.
    #[serde(default, deserialize_with = "lenient::string")]
    pub paper_id: Option<String>,

    /// Generic identifier.
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: Option<String>,

    #[serde(default, deserialize_with = "lenient::string")]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "lenient::string")]
    pub url: Option<String>,

    #[serde(default, deserialize_with = "lenient::string")]
    pub r#abstract: Option<String>,

    /// Search-result excerpt, used when there is no abstract.
    #[serde(default, deserialize_with = "lenient::string")]
    pub snippet: Option<String>,

    #[serde(default, deserialize_with = "lenient::year")]
    pub year: Option<i32>,

    /// Names, from either plain strings or `{name}` objects.
    #[serde(default, deserialize_with = "lenient::authors")]
    pub authors: Vec<String>,

    #[serde(default, deserialize_with = "lenient::string")]
    pub venue: Option<String>,

    #[serde(default, deserialize_with = "lenient::count")]
    pub citation_count: u64,

    /// Nested reference list, kept undecoded until a level asks for it.
    #[serde(default)]
    pub references: Option<Value>,
}

impl RawPaper {
    /// Decode a JSON object. Non-object values yield `None`.
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self::from_map(map)),
            _ => None,
        }
    }

    /// Decode a JSON object map.
    #[must_use]
    pub fn from_map(map: Map<String, Value>) -> Self {
        // Field decoders accept any JSON value, so this only fails on non-objects.
        serde_json::from_value(Value::Object(map)).unwrap_or_default()
    }

    /// Preferred identifier: `paperId`, then `id`.
    #[must_use]
    pub fn identifier(&self) -> Option<&str> {
        self.paper_id.as_deref().or(self.id.as_deref())
    }

    /// Whether this record survives canonicalization.
    #[must_use]
    pub fn is_identifiable(&self) -> bool {
        self.identifier().is_some() || self.title.is_some()
    }

    /// Coerce into a canonical [`Paper`], dropping records with neither id nor title.
    #[must_use]
    pub fn into_paper(self, provider: Provider) -> Option<Paper> {
        if !self.is_identifiable() {
            return None;
        }

        let id = self.paper_id.or(self.id).unwrap_or_default();
        let url = match self.url {
            Some(url) => url,
            None if !id.is_empty() => provider.paper_url(&id),
            None => String::new(),
        };

        Some(Paper {
            title: self.title.unwrap_or_else(|| defaults::UNTITLED.to_string()),
            url,
            r#abstract: self.r#abstract.or(self.snippet).unwrap_or_default(),
            year: self.year,
            authors: self.authors,
            venue: self.venue,
            citation_count: self.citation_count,
            id,
        })
    }
}

/// Field decoders that never fail on well-formed JSON.
mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// Non-blank strings; numbers are stringified.
    pub fn string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(text(Value::deserialize(deserializer)?))
    }

    /// Positive integer years, from numbers or numeric strings.
    pub fn year<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let year = match Value::deserialize(deserializer)? {
            Value::Number(n) => integral(&n).and_then(|v| i32::try_from(v).ok()),
            Value::String(s) => s.trim().parse::<i32>().ok(),
            _ => None,
        };
        Ok(year.filter(|y| *y > 0))
    }

    /// Author names from an array of strings or `{name}` objects.
    pub fn authors<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let Value::Array(items) = Value::deserialize(deserializer)? else {
            return Ok(Vec::new());
        };

        Ok(items
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(mut obj) => obj.remove("name").and_then(text),
                other => text(other),
            })
            .collect())
    }

    /// Non-negative integer counts; anything else is 0.
    pub fn count<'de, D>(deserializer: D) -> Result<u64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let count = match Value::deserialize(deserializer)? {
            Value::Number(n) => integral(&n).and_then(|v| u64::try_from(v).ok()),
            _ => None,
        };
        Ok(count.unwrap_or(0))
    }

    fn text(value: Value) -> Option<String> {
        match value {
            Value::String(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn integral(n: &serde_json::Number) -> Option<i64> {
        n.as_i64().or_else(|| {
            n.as_f64().filter(|f| f.fract() == 0.0 && f.abs() < 1e15).map(|f| f as i64)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> RawPaper {
        RawPaper::from_value(value).unwrap()
    }

    #[test]
    fn test_missing_fields_default() {
        let paper = raw(json!({"paperId": "123", "title": "Attention Is All You Need"}))
            .into_paper(Provider::ArxivPapers)
            .unwrap();

        assert_eq!(paper.id, "123");
        assert_eq!(paper.citation_count, 0);
        assert!(paper.authors.is_empty());
        assert!(paper.year.is_none());
        assert!(paper.venue.is_none());
        assert_eq!(paper.url, "https://arxiv.org/abs/123");
    }

    #[test]
    fn test_paper_id_preferred_over_id() {
        let paper = raw(json!({"id": "generic", "paperId": "s2"}))
            .into_paper(Provider::SemanticScholar)
            .unwrap();
        assert_eq!(paper.id, "s2");
        assert_eq!(paper.title, "Untitled Paper");
    }

    #[test]
    fn test_unidentifiable_dropped() {
        assert!(raw(json!({"year": 2020, "authors": ["A"]})).into_paper(Provider::Doaj).is_none());
        assert!(raw(json!({"paperId": "", "title": "   "})).into_paper(Provider::Doaj).is_none());
    }

    #[test]
    fn test_title_only_record_kept_without_url() {
        let paper = raw(json!({"title": "Orphan"})).into_paper(Provider::Doaj).unwrap();
        assert!(paper.id.is_empty());
        assert!(paper.url.is_empty());
    }

    #[test]
    fn test_wrong_types_degrade() {
        let paper = raw(json!({
            "paperId": 42,
            "title": "Typed Badly",
            "year": "2019",
            "authors": "Not an array",
            "citationCount": -5,
            "venue": {"name": "Object venue"},
            "abstract": null,
            "snippet": "From snippet"
        }))
        .into_paper(Provider::SemanticScholar)
        .unwrap();

        assert_eq!(paper.id, "42");
        assert_eq!(paper.year, Some(2019));
        assert!(paper.authors.is_empty());
        assert_eq!(paper.citation_count, 0);
        assert!(paper.venue.is_none());
        assert_eq!(paper.r#abstract, "From snippet");
    }

    #[test]
    fn test_author_objects_and_strings() {
        let paper = raw(json!({
            "paperId": "p",
            "authors": [
                {"authorId": "1", "name": "Ada Lovelace"},
                "Alan Turing",
                {"authorId": "2"},
                7,
                null
            ]
        }))
        .into_paper(Provider::SemanticScholar)
        .unwrap();

        assert_eq!(paper.authors, vec!["Ada Lovelace", "Alan Turing", "7"]);
    }

    #[test]
    fn test_zero_year_is_none() {
        let paper = raw(json!({"paperId": "p", "year": 0})).into_paper(Provider::Doaj).unwrap();
        assert!(paper.year.is_none());
    }

    #[test]
    fn test_non_object_rejected() {
        assert!(RawPaper::from_value(json!("paper")).is_none());
        assert!(RawPaper::from_value(json!(null)).is_none());
        assert!(RawPaper::from_value(json!([1, 2])).is_none());
    }
}
