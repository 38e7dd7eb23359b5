//! User-triggered operations: search, suggestions and reference download.
//!
//! Each operation validates its raw input before any network traffic, then
//! tags client failures with the operation they belong to so the caller can
//! render a message naming it.

use crate::client::ScholarClient;
use crate::error::{Operation, RequestError, RequestResult};
use crate::models::{
    Paper, Provider, ReferenceDepth, ReferenceNode, ReferenceRequest, SearchRequest, SuggestQuery,
};

/// Search papers for a free-text query, optionally restricted to a year.
///
/// # Errors
///
/// Returns a validation error for a blank query or non-numeric year (no
/// request is issued), or a client error tagged [`Operation::Search`].
pub async fn perform_search(
    client: &ScholarClient,
    query: &str,
    year: Option<&str>,
    api: Provider,
) -> RequestResult<Vec<Paper>> {
    let request = SearchRequest::parse(query, year, api)?;

    let papers = client
        .search_papers(&request)
        .await
        .map_err(|e| RequestError::client(Operation::Search, e))?;

    tracing::info!(query = %request.query, api = %api, count = papers.len(), "Search completed");
    Ok(papers)
}

/// Fetch title suggestions for partial input.
///
/// Input shorter than three characters after trimming yields no suggestions
/// without contacting the backend.
///
/// # Errors
///
/// Returns a client error tagged [`Operation::Suggestions`].
pub async fn fetch_suggestions(
    client: &ScholarClient,
    input: &str,
    api: Provider,
) -> RequestResult<Vec<String>> {
    let Some(query) = SuggestQuery::new(input, api) else {
        return Ok(Vec::new());
    };

    client.suggest(&query).await.map_err(|e| RequestError::client(Operation::Suggestions, e))
}

/// Download the reference tree of a paper.
///
/// # Errors
///
/// Returns a validation error for a blank paper id (no request is issued),
/// or a client error tagged [`Operation::References`].
pub async fn fetch_references(
    client: &ScholarClient,
    paper_id: &str,
    depth: ReferenceDepth,
) -> RequestResult<Vec<ReferenceNode>> {
    let request = ReferenceRequest::parse(paper_id, depth)?;

    let references = client
        .download_references(&request)
        .await
        .map_err(|e| RequestError::client(Operation::References, e))?;

    tracing::info!(
        paper_id = %request.paper_id,
        depth = %depth,
        count = references.len(),
        "References fetched"
    );
    Ok(references)
}
