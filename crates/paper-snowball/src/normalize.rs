//! Canonicalization of search results and reference trees.
//!
//! Recursion is driven by an explicit level counter capped at
//! [`defaults::MAX_REFERENCE_NESTING`], independent of what the payload
//! nests or what depth was requested.

use serde_json::Value;

use crate::config::defaults;
use crate::error::ClientResult;
use crate::models::{
    Paper, Provider, RawPaper, ReferenceDepth, ReferenceEnvelope, ReferenceNode, ReferenceShape,
    SearchEnvelope,
};

/// Provider whose ids reference payloads carry.
const REFERENCE_PROVIDER: Provider = Provider::SemanticScholar;

/// Normalize a search response body into canonical papers.
///
/// Accepts a bare array or `{papers: [...]}`; elements without id and title
/// are dropped.
pub fn normalize_papers(body: Value, provider: Provider) -> ClientResult<Vec<Paper>> {
    let elements = SearchEnvelope::decode(body)?.into_elements();
    let total = elements.len();

    let papers: Vec<Paper> =
        elements.into_iter().filter_map(|element| canonical_paper(element, provider)).collect();

    if papers.len() < total {
        tracing::warn!(
            dropped = total - papers.len(),
            kept = papers.len(),
            "Dropped unidentifiable search results"
        );
    }

    Ok(papers)
}

/// Coerce one raw element into a canonical paper.
#[must_use]
pub fn canonical_paper(element: Value, provider: Provider) -> Option<Paper> {
    RawPaper::from_value(element)?.into_paper(provider)
}

/// Normalize a reference response body into a reference tree.
///
/// With [`ReferenceDepth::Nested`], each node carries its own normalized
/// reference list if and only if the raw element supplied one.
pub fn normalize_references(
    body: Value,
    depth: ReferenceDepth,
) -> ClientResult<Vec<ReferenceNode>> {
    let elements = ReferenceEnvelope::decode(body)?.into_elements();
    let max_level = depth.levels().min(defaults::MAX_REFERENCE_NESTING);
    Ok(normalize_level(elements, 1, max_level))
}

fn normalize_level(elements: Vec<Value>, level: usize, max_level: usize) -> Vec<ReferenceNode> {
    let total = elements.len();
    let nodes: Vec<ReferenceNode> = elements
        .into_iter()
        .filter_map(|element| normalize_node(element, level, max_level))
        .collect();

    if nodes.len() < total {
        tracing::warn!(level, dropped = total - nodes.len(), "Dropped unidentifiable references");
    }

    nodes
}

fn normalize_node(element: Value, level: usize, max_level: usize) -> Option<ReferenceNode> {
    let mut raw = ReferenceShape::decode(element)?.into_raw();
    let nested = raw.references.take();
    let paper = raw.into_paper(REFERENCE_PROVIDER)?;

    let references = match nested {
        Some(Value::Array(items)) if level < max_level => {
            Some(normalize_level(items, level + 1, max_level))
        }
        _ => None,
    };

    Some(ReferenceNode { paper, references })
}
