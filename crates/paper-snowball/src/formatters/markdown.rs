//! Markdown output formatting.

use std::borrow::Cow;

use crate::models::{Paper, ReferenceNode};
use crate::view::ViewState;

/// Abstracts longer than this many characters are truncated.
const ABSTRACT_PREVIEW_CHARS: usize = 300;

/// Format a list of papers as Markdown.
#[must_use]
pub fn format_papers_markdown(papers: &[Paper]) -> String {
    if papers.is_empty() {
        return "No papers found.".to_string();
    }

    let mut output = format!("# Papers ({} results)\n\n", papers.len());

    for (i, paper) in papers.iter().enumerate() {
        output.push_str(&format_paper_markdown(paper, i + 1));
        output.push_str("\n---\n\n");
    }

    output
}

/// Format a single paper as Markdown.
#[must_use]
pub fn format_paper_markdown(paper: &Paper, index: usize) -> String {
    let mut output = String::new();

    output.push_str(&format!("## {}. {}\n\n", index, paper.title));

    if !paper.authors.is_empty() {
        output.push_str(&format!("**Authors**: {}\n\n", paper.author_names()));
    }

    let mut meta = Vec::new();
    if let Some(year) = paper.year {
        meta.push(format!("**Year**: {year}"));
    }
    meta.push(format!("**Citations**: {}", paper.citation_count));
    if let Some(venue) = &paper.venue {
        meta.push(format!("**Venue**: {venue}"));
    }
    output.push_str(&format!("{}\n\n", meta.join(" | ")));

    if paper.has_id() {
        output.push_str(&format!("**ID**: `{}`\n\n", paper.id));
    }

    if !paper.url.is_empty() {
        output.push_str(&format!("**Link**: [View paper]({})\n\n", paper.url));
    }

    output.push_str(&format!("**Abstract**: {}\n", preview(paper.abstract_or_placeholder())));

    output
}

/// Format a reference tree, one indented bullet per node.
#[must_use]
pub fn format_references_markdown(paper_id: &str, nodes: &[ReferenceNode]) -> String {
    if nodes.is_empty() {
        return format!("No references found for `{paper_id}`.");
    }

    let mut output = format!("# References of `{}` ({} results)\n\n", paper_id, nodes.len());
    for node in nodes {
        push_reference(&mut output, node, 0);
    }

    output
}

fn push_reference(output: &mut String, node: &ReferenceNode, level: usize) {
    let paper = &node.paper;
    let indent = "  ".repeat(level);

    let title = if paper.url.is_empty() {
        paper.title.clone()
    } else {
        format!("[{}]({})", paper.title, paper.url)
    };
    output.push_str(&format!("{indent}- {title}"));

    if let Some(year) = paper.year {
        output.push_str(&format!(" ({year})"));
    }
    if let Some(first) = paper.first_author() {
        let more = if paper.authors.len() > 1 { " et al." } else { "" };
        output.push_str(&format!(" | {first}{more}"));
    }
    output.push_str(&format!(" | {} citations\n", paper.citation_count));

    for child in node.children() {
        push_reference(output, child, level + 1);
    }
}

/// Render a view: progress, empty and failure states get a fixed message,
/// ready items go through `render`.
pub fn format_view_markdown<T>(
    state: &ViewState<T>,
    noun: &str,
    render: impl FnOnce(&[T]) -> String,
) -> String {
    match state {
        ViewState::Idle => String::new(),
        ViewState::Loading => format!("Loading {noun}..."),
        ViewState::Empty => format!("No {noun} found."),
        ViewState::Failed(message) => format!("**Error**: {message}\n\nRetry to try again."),
        ViewState::Ready(items) => render(items),
    }
}

fn preview(text: &str) -> Cow<'_, str> {
    match text.char_indices().nth(ABSTRACT_PREVIEW_CHARS) {
        Some((cut, _)) => Cow::Owned(format!("{}...", &text[..cut])),
        None => Cow::Borrowed(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paper(id: &str, title: &str) -> Paper {
        Paper {
            id: id.to_string(),
            title: title.to_string(),
            url: format!("https://www.semanticscholar.org/paper/{id}"),
            authors: vec!["Ada Lovelace".to_string(), "Alan Turing".to_string()],
            year: Some(1950),
            ..Default::default()
        }
    }

    #[test]
    fn test_papers_markdown() {
        let output = format_papers_markdown(&[paper("p1", "Computing Machinery")]);
        assert!(output.contains("# Papers (1 results)"));
        assert!(output.contains("## 1. Computing Machinery"));
        assert!(output.contains("**Authors**: Ada Lovelace, Alan Turing"));
        assert!(output.contains("No abstract available."));
    }

    #[test]
    fn test_empty_papers() {
        assert_eq!(format_papers_markdown(&[]), "No papers found.");
    }

    #[test]
    fn test_reference_tree_indentation() {
        let nodes = vec![ReferenceNode {
            paper: paper("r1", "Parent"),
            references: Some(vec![ReferenceNode::leaf(paper("n1", "Child"))]),
        }];

        let output = format_references_markdown("seed", &nodes);
        assert!(output.contains("\n- [Parent]("));
        assert!(output.contains("\n  - [Child]("));
        assert!(output.contains("Ada Lovelace et al."));
    }

    #[test]
    fn test_abstract_preview_respects_char_boundaries() {
        let text = "é".repeat(ABSTRACT_PREVIEW_CHARS + 5);
        let cut = preview(&text);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), ABSTRACT_PREVIEW_CHARS + 3);
    }

    #[test]
    fn test_view_states() {
        let render = |items: &[u8]| format!("{} items", items.len());
        let loading = format_view_markdown(&ViewState::Loading, "papers", render);
        assert_eq!(loading, "Loading papers...");
        let empty = format_view_markdown(&ViewState::Empty, "papers", render);
        assert_eq!(empty, "No papers found.");
        let ready = format_view_markdown(&ViewState::Ready(vec![1, 2]), "papers", render);
        assert_eq!(ready, "2 items");

        let failed = format_view_markdown(&ViewState::Failed("boom".into()), "papers", render);
        assert!(failed.contains("boom"));
        assert!(failed.contains("Retry"));
    }
}
