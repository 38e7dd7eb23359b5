//! Search backend client.
//!
//! Provides async HTTP client with:
//! - Connection pooling via reqwest
//! - Request logging middleware
//! - Suggestion caching with a 10-minute TTL
//!
//! There is no automatic retry: every failure is terminal for its request and
//! retrying is left to the caller.

mod middleware;

pub use middleware::RequestLogMiddleware;

use moka::future::Cache;
use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use serde::Serialize;
use serde_json::Value;

use crate::config::{Config, api};
use crate::error::{ClientError, ClientResult};
use crate::models::{
    Paper, ReferenceNode, ReferenceRequest, SearchRequest, SuggestQuery, SuggestionEnvelope,
    SuggestionStatus,
};
use crate::normalize;

/// Client for the paper search/reference backend.
#[derive(Clone)]
pub struct ScholarClient {
    /// HTTP client with middleware.
    client: ClientWithMiddleware,

    /// Suggestion cache.
    suggestions: Cache<String, Vec<String>>,

    /// Client configuration.
    config: Config,
}

impl ScholarClient {
    /// Create a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(api::MAX_KEEPALIVE)
            .pool_idle_timeout(api::KEEPALIVE_EXPIRY)
            .gzip(true)
            .build()?;

        let client = ClientBuilder::new(client).with(RequestLogMiddleware).build();

        let suggestions = Cache::builder()
            .max_capacity(config.suggestion_cache_max_size)
            .time_to_live(config.suggestion_cache_ttl)
            .build();

        Ok(Self { client, suggestions, config })
    }

    /// Backend base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Search for papers and return them in canonical form.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure, non-success status, or a body that
    /// is neither an array nor `{papers: [...]}`.
    pub async fn search_papers(&self, request: &SearchRequest) -> ClientResult<Vec<Paper>> {
        tracing::debug!(
            query = %request.query,
            year = ?request.year,
            api = %request.api,
            "Searching papers"
        );

        let body = self.post("search_papers", request).await?;
        let papers = normalize::normalize_papers(body, request.api)?;

        tracing::debug!(count = papers.len(), "Search returned papers");
        Ok(papers)
    }

    /// Download the references of a paper as a canonical tree.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure, non-success status, or an
    /// unrecognized body shape.
    pub async fn download_references(
        &self,
        request: &ReferenceRequest,
    ) -> ClientResult<Vec<ReferenceNode>> {
        tracing::debug!(
            paper_id = %request.paper_id,
            depth = %request.depth,
            "Downloading references"
        );

        let body = self.post("download_references", request).await?;
        let references = normalize::normalize_references(body, request.depth)?;

        tracing::debug!(count = references.len(), "References normalized");
        Ok(references)
    }

    /// Fetch title suggestions for a partial query.
    ///
    /// Results are cached per (query, provider) when caching is enabled.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure, non-success status, or a body
    /// reporting `status: "error"`.
    pub async fn suggest(&self, query: &SuggestQuery) -> ClientResult<Vec<String>> {
        let cache_key = self.cache_key(query);
        if self.config.caches_suggestions() {
            if let Some(cached) = self.suggestions.get(&cache_key).await {
                tracing::debug!(q = %query.q, "Suggestion cache hit");
                return Ok(cached);
            }
        }

        let body = self.get("suggest", &query.to_params()).await?;
        let envelope: SuggestionEnvelope = serde_json::from_value(body)
            .map_err(|e| ClientError::invalid_format(e.to_string()))?;

        if envelope.status == SuggestionStatus::Error {
            return Err(ClientError::Remote(
                envelope.message.unwrap_or_else(|| "Failed to fetch suggestions".to_string()),
            ));
        }

        if self.config.caches_suggestions() {
            self.suggestions.insert(cache_key, envelope.suggestions.clone()).await;
        }

        Ok(envelope.suggestions)
    }

    /// Make a GET request.
    async fn get(&self, path: &str, params: &[(&str, String)]) -> ClientResult<Value> {
        let response = self
            .client
            .get(self.config.endpoint(path))
            .query(params)
            .send()
            .await
            .map_err(|e| ClientError::from_middleware(e, self.config.request_timeout))?;

        let response = self.handle_response(response).await?;
        self.read_json(response).await
    }

    /// Make a POST request with a JSON body.
    async fn post<B>(&self, path: &str, body: &B) -> ClientResult<Value>
    where
        B: Serialize + ?Sized,
    {
        let body_str = serde_json::to_string(body)?;

        let response = self
            .client
            .post(self.config.endpoint(path))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body_str)
            .send()
            .await
            .map_err(|e| ClientError::from_middleware(e, self.config.request_timeout))?;

        let response = self.handle_response(response).await?;
        self.read_json(response).await
    }

    /// Read a successful response body as JSON.
    async fn read_json(&self, response: reqwest::Response) -> ClientResult<Value> {
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ClientError::from_transport(e, self.config.request_timeout))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(ClientError::invalid_format("empty response from server"));
        }

        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Handle backend response status codes.
    async fn handle_response(
        &self,
        response: reqwest::Response,
    ) -> ClientResult<reqwest::Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = error_message(&text);

        match status.as_u16() {
            500..=599 => Err(ClientError::server(status.as_u16(), message)),
            _ => Err(ClientError::UnexpectedStatus { status: status.as_u16(), message }),
        }
    }

    /// Generate suggestion cache key.
    fn cache_key(&self, query: &SuggestQuery) -> String {
        use md5::{Digest, Md5};

        let mut hasher = Md5::new();
        hasher.update(self.config.base_url.as_bytes());
        hasher.update(b"|");
        hasher.update(query.api.id().as_bytes());
        hasher.update(b"|");
        hasher.update(query.q.to_lowercase().as_bytes());

        format!("{:x}", hasher.finalize())
    }
}

impl std::fmt::Debug for ScholarClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScholarClient")
            .field("base_url", &self.config.base_url)
            .field("cache_suggestions", &self.config.caches_suggestions())
            .finish()
    }
}

/// Extract a human-readable message from an error body.
///
/// Prefers a JSON `message`, `detail` or `error` string and falls back to
/// the raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            ["message", "detail", "error"]
                .iter()
                .find_map(|key| value.get(*key).and_then(Value::as_str).map(str::to_string))
        })
        .unwrap_or_else(|| body.trim().to_string())
}
