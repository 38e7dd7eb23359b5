//! JSON output formatting.

use serde_json::{Value, json};

use crate::models::{Paper, ReferenceDepth, ReferenceNode};

/// Create a compact paper representation for JSON output.
///
/// Empty fields are left out.
#[must_use]
pub fn compact_paper(paper: &Paper) -> Value {
    let mut obj = json!({
        "id": paper.id,
        "title": paper.title,
        "citations": paper.citation_count,
    });

    if let Some(year) = paper.year {
        obj["year"] = json!(year);
    }

    if !paper.authors.is_empty() {
        obj["authors"] = json!(paper.authors);
    }

    if let Some(venue) = &paper.venue {
        obj["venue"] = json!(venue);
    }

    if !paper.url.is_empty() {
        obj["url"] = json!(paper.url);
    }

    if !paper.r#abstract.is_empty() {
        obj["abstract"] = json!(paper.r#abstract);
    }

    obj
}

/// Compact reference node, with nested references only when expanded.
#[must_use]
pub fn compact_reference(node: &ReferenceNode) -> Value {
    let mut obj = compact_paper(&node.paper);

    if let Some(children) = &node.references {
        obj["references"] = Value::Array(children.iter().map(compact_reference).collect());
    }

    obj
}

/// Search results envelope.
#[must_use]
pub fn papers_json(papers: &[Paper]) -> Value {
    json!({
        "count": papers.len(),
        "papers": papers.iter().map(compact_paper).collect::<Vec<_>>(),
    })
}

/// Reference tree envelope for a seed paper.
#[must_use]
pub fn references_json(paper_id: &str, depth: ReferenceDepth, nodes: &[ReferenceNode]) -> Value {
    json!({
        "paperId": paper_id,
        "depth": u8::from(depth),
        "count": nodes.len(),
        "references": nodes.iter().map(compact_reference).collect::<Vec<_>>(),
    })
}
