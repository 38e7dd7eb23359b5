//! Canonical paper records and reference trees.

use serde::{Deserialize, Serialize};

use crate::config::defaults;

/// A paper in canonical form, regardless of the provider it came from.
///
/// Records are snapshots: they are built once from a response and replaced
/// wholesale on the next fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Paper {
    /// Provider identifier. May be empty when only a title was supplied.
    pub id: String,

    /// Paper title ("Untitled Paper" when the provider had none).
    pub title: String,

    /// Landing page URL.
    pub url: String,

    /// Abstract or snippet; empty when unavailable.
    pub r#abstract: String,

    /// Publication year.
    pub year: Option<i32>,

    /// Author names in order.
    pub authors: Vec<String>,

    /// Publication venue (journal or conference).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,

    /// Number of citations this paper has received.
    pub citation_count: u64,
}

impl Paper {
    /// Abstract text, or the placeholder when there is none.
    #[must_use]
    pub fn abstract_or_placeholder(&self) -> &str {
        if self.r#abstract.is_empty() { defaults::NO_ABSTRACT } else { &self.r#abstract }
    }

    /// Whether the provider supplied an identifier.
    #[must_use]
    pub fn has_id(&self) -> bool {
        !self.id.is_empty()
    }

    /// Get the first author's name if available.
    #[must_use]
    pub fn first_author(&self) -> Option<&str> {
        self.authors.first().map(String::as_str)
    }

    /// Get author names as a comma-separated string.
    #[must_use]
    pub fn author_names(&self) -> String {
        self.authors.join(", ")
    }
}

/// A cited paper, optionally with its own cited references.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceNode {
    /// The referenced paper.
    #[serde(flatten)]
    pub paper: Paper,

    /// Nested references, present only for expanded levels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub references: Option<Vec<ReferenceNode>>,
}

impl ReferenceNode {
    /// A node without nested references.
    #[must_use]
    pub const fn leaf(paper: Paper) -> Self {
        Self { paper, references: None }
    }

    /// Nested references, empty when none were expanded.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        self.references.as_deref().unwrap_or_default()
    }

    /// Whether this node carries an expanded reference list.
    #[must_use]
    pub const fn is_expanded(&self) -> bool {
        self.references.is_some()
    }

    /// Number of levels in the subtree rooted here (a leaf is 1).
    #[must_use]
    pub fn height(&self) -> usize {
        1 + self.children().iter().map(Self::height).max().unwrap_or(0)
    }

    /// Total number of nodes in the subtree rooted here.
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self.children().iter().map(Self::node_count).sum::<usize>()
    }
}
