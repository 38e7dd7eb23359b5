//! Enumeration types for request and output parameters.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RequestError;

/// External database the backend searches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    /// Semantic Scholar graph API.
    #[default]
    SemanticScholar,
    /// arXiv preprint archive.
    ArxivPapers,
    /// Directory of Open Access Journals.
    Doaj,
}

impl Provider {
    /// All providers, in selector order.
    pub const ALL: [Self; 3] = [Self::SemanticScholar, Self::ArxivPapers, Self::Doaj];

    /// Wire identifier sent as `api`.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::SemanticScholar => "semantic_scholar",
            Self::ArxivPapers => "arxiv_papers",
            Self::Doaj => "doaj",
        }
    }

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::SemanticScholar => "Semantic Scholar",
            Self::ArxivPapers => "arXiv",
            Self::Doaj => "DOAJ",
        }
    }

    /// Landing page for a paper id from this provider.
    #[must_use]
    pub fn paper_url(self, id: &str) -> String {
        match self {
            Self::SemanticScholar => format!("https://www.semanticscholar.org/paper/{id}"),
            Self::ArxivPapers => format!("https://arxiv.org/abs/{id}"),
            Self::Doaj => format!("https://doaj.org/article/{id}"),
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Provider {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|p| p.id() == wanted).ok_or_else(|| {
            RequestError::validation(
                "api",
                format!("unknown provider '{s}' (expected semantic_scholar, arxiv_papers or doaj)"),
            )
        })
    }
}

/// How many levels of references to expand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ReferenceDepth {
    /// Direct references only.
    #[default]
    Direct,
    /// References plus the references of each reference.
    Nested,
}

impl ReferenceDepth {
    /// Number of tree levels this depth produces.
    #[must_use]
    pub const fn levels(self) -> usize {
        match self {
            Self::Direct => 1,
            Self::Nested => 2,
        }
    }
}

impl From<ReferenceDepth> for u8 {
    fn from(depth: ReferenceDepth) -> Self {
        match depth {
            ReferenceDepth::Direct => 1,
            ReferenceDepth::Nested => 2,
        }
    }
}

impl TryFrom<u8> for ReferenceDepth {
    type Error = RequestError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Direct),
            2 => Ok(Self::Nested),
            other => {
                Err(RequestError::validation("depth", format!("depth must be 1 or 2, got {other}")))
            }
        }
    }
}

impl FromStr for ReferenceDepth {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u8 = s
            .trim()
            .parse()
            .map_err(|_| {
                RequestError::validation("depth", format!("depth must be 1 or 2, got '{s}'"))
            })?;
        Self::try_from(value)
    }
}

impl std::fmt::Display for ReferenceDepth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", u8::from(*self))
    }
}

/// Output format for rendered results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    /// Human-readable Markdown format.
    #[default]
    Markdown,
    /// Machine-readable JSON format.
    Json,
}

impl ResponseFormat {
    /// Check if this is JSON format.
    #[must_use]
    pub const fn is_json(self) -> bool {
        matches!(self, Self::Json)
    }
}

impl FromStr for ResponseFormat {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "markdown" | "md" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            other => Err(RequestError::validation(
                "format",
                format!("unknown format '{other}' (expected markdown or json)"),
            )),
        }
    }
}
