//! View state for search results and reference trees.
//!
//! Every view hands out monotonically increasing [`RequestTicket`]s. A
//! completion is applied only when it carries the latest ticket, and starting
//! a new request aborts whatever was still in flight for that view.

use std::future::Future;
use std::sync::Arc;

use futures::future::{AbortHandle, Abortable, abortable};
use tokio::sync::RwLock;

use crate::actions;
use crate::client::ScholarClient;
use crate::error::RequestResult;
use crate::models::{Paper, Provider, ReferenceDepth, ReferenceNode};

/// What a view currently shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ViewState<T> {
    /// Nothing requested yet, or the selection changed.
    #[default]
    Idle,
    /// A request is in flight.
    Loading,
    /// The latest request returned items.
    Ready(Vec<T>),
    /// The latest request succeeded with no items.
    Empty,
    /// The latest request failed; carries the user-facing message.
    Failed(String),
}

impl<T> ViewState<T> {
    /// State for a finished request.
    #[must_use]
    pub fn from_result(result: RequestResult<Vec<T>>) -> Self {
        match result {
            Ok(items) if items.is_empty() => Self::Empty,
            Ok(items) => Self::Ready(items),
            Err(e) => Self::Failed(e.to_user_message()),
        }
    }

    /// Items shown, empty unless ready.
    #[must_use]
    pub fn items(&self) -> &[T] {
        match self {
            Self::Ready(items) => items,
            _ => &[],
        }
    }

    /// Failure message, if the latest request failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    #[must_use]
    pub const fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// Identifies one request issued by a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u64);

impl RequestTicket {
    /// Sequence number within the issuing view.
    #[must_use]
    pub const fn sequence(self) -> u64 {
        self.0
    }
}

/// How a dispatched request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The result was applied to the view.
    Applied,
    /// The request finished but a newer one had been issued.
    Stale,
    /// The request was aborted before finishing.
    Aborted,
}

/// Request bookkeeping and state for one view.
#[derive(Debug)]
pub struct View<T> {
    state: ViewState<T>,
    issued: u64,
    in_flight: Option<AbortHandle>,
    retries: u32,
}

impl<T> Default for View<T> {
    fn default() -> Self {
        Self { state: ViewState::Idle, issued: 0, in_flight: None, retries: 0 }
    }
}

impl<T> View<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn state(&self) -> &ViewState<T> {
        &self.state
    }

    /// Start a request: abort the previous one, switch to loading and issue
    /// the next ticket.
    pub fn begin(&mut self, handle: AbortHandle) -> RequestTicket {
        if let Some(previous) = self.in_flight.replace(handle) {
            previous.abort();
        }
        self.issued += 1;
        self.state = ViewState::Loading;
        RequestTicket(self.issued)
    }

    /// Whether `ticket` is the latest one issued.
    #[must_use]
    pub const fn is_current(&self, ticket: RequestTicket) -> bool {
        ticket.0 == self.issued
    }

    /// Apply a finished request. Returns `false` and leaves the state alone
    /// when the ticket is stale.
    pub fn complete(&mut self, ticket: RequestTicket, result: RequestResult<Vec<T>>) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!(
                ticket = ticket.0,
                latest = self.issued,
                "Ignoring stale completion"
            );
            return false;
        }

        if let Err(e) = &result {
            tracing::error!(error = %e, ticket = ticket.0, "Request failed");
        }

        self.in_flight = None;
        self.state = ViewState::from_result(result);
        true
    }

    /// Drop back to idle, aborting and invalidating any in-flight request.
    pub fn reset(&mut self) {
        if let Some(previous) = self.in_flight.take() {
            previous.abort();
        }
        self.issued += 1;
        self.state = ViewState::Idle;
    }

    /// Count a user retry and return the new total.
    pub fn note_retry(&mut self) -> u32 {
        self.retries += 1;
        self.retries
    }

    #[must_use]
    pub const fn retries(&self) -> u32 {
        self.retries
    }
}

/// A view shared between the code issuing requests and the code rendering.
#[derive(Debug)]
pub struct SharedView<T> {
    inner: Arc<RwLock<View<T>>>,
}

impl<T> Clone for SharedView<T> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<T> Default for SharedView<T> {
    fn default() -> Self {
        Self { inner: Arc::new(RwLock::new(View::new())) }
    }
}

impl<T> SharedView<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub async fn snapshot(&self) -> ViewState<T>
    where
        T: Clone,
    {
        self.inner.read().await.state().clone()
    }

    pub async fn retries(&self) -> u32 {
        self.inner.read().await.retries()
    }

    pub async fn note_retry(&self) -> u32 {
        self.inner.write().await.note_retry()
    }

    pub async fn reset(&self) {
        self.inner.write().await.reset();
    }

    /// Run `request` as the view's latest request.
    ///
    /// The lock is only held to issue the ticket and to apply the result,
    /// never across the request itself.
    pub async fn dispatch<F>(&self, request: F) -> DispatchOutcome
    where
        F: Future<Output = RequestResult<Vec<T>>>,
    {
        let pending = self.issue(request).await;
        self.settle(pending).await
    }

    /// Issue a ticket for `request` without running it yet.
    ///
    /// Any reset after this call invalidates the returned request.
    pub async fn issue<F>(&self, request: F) -> PendingRequest<F>
    where
        F: Future<Output = RequestResult<Vec<T>>>,
    {
        let (request, handle) = abortable(request);
        let ticket = self.inner.write().await.begin(handle);
        PendingRequest { ticket, request }
    }

    /// Run an issued request and apply its result if it is still current.
    pub async fn settle<F>(&self, pending: PendingRequest<F>) -> DispatchOutcome
    where
        F: Future<Output = RequestResult<Vec<T>>>,
    {
        let PendingRequest { ticket, request } = pending;
        match request.await {
            Ok(result) => {
                if self.inner.write().await.complete(ticket, result) {
                    DispatchOutcome::Applied
                } else {
                    DispatchOutcome::Stale
                }
            }
            Err(_) => {
                tracing::debug!(ticket = ticket.sequence(), "Request superseded");
                DispatchOutcome::Aborted
            }
        }
    }
}

/// A request holding a ticket, not yet run.
#[derive(Debug)]
#[must_use = "an issued request does nothing until settled"]
pub struct PendingRequest<F> {
    ticket: RequestTicket,
    request: Abortable<F>,
}

impl<F> PendingRequest<F> {
    #[must_use]
    pub const fn ticket(&self) -> RequestTicket {
        self.ticket
    }
}

#[derive(Debug, Clone, Default)]
struct Selection {
    paper_id: String,
    depth: ReferenceDepth,
}

/// Reference exploration for one selected paper.
///
/// Changing the paper or the depth clears the tree; nothing is fetched until
/// [`ReferenceExplorer::load`] is called.
#[derive(Debug, Clone)]
pub struct ReferenceExplorer {
    client: ScholarClient,
    selection: Arc<RwLock<Selection>>,
    view: SharedView<ReferenceNode>,
}

impl ReferenceExplorer {
    #[must_use]
    pub fn new(client: ScholarClient) -> Self {
        Self { client, selection: Arc::default(), view: SharedView::new() }
    }

    /// Select a paper. A different id resets the view.
    pub async fn select(&self, paper_id: &str) {
        let mut selection = self.selection.write().await;
        if selection.paper_id != paper_id {
            selection.paper_id = paper_id.to_string();
            self.view.reset().await;
        }
    }

    /// Change the expansion depth. A different depth resets the view.
    pub async fn set_depth(&self, depth: ReferenceDepth) {
        let mut selection = self.selection.write().await;
        if selection.depth != depth {
            selection.depth = depth;
            self.view.reset().await;
        }
    }

    pub async fn paper_id(&self) -> String {
        self.selection.read().await.paper_id.clone()
    }

    pub async fn depth(&self) -> ReferenceDepth {
        self.selection.read().await.depth
    }

    /// Fetch references for the current selection.
    ///
    /// The selection stays read-locked until the ticket is issued, so a
    /// concurrent [`select`](Self::select) either precedes the load or
    /// invalidates it.
    pub async fn load(&self) -> DispatchOutcome {
        let pending = {
            let selection = self.selection.read().await;
            let Selection { paper_id, depth } = selection.clone();
            let client = self.client.clone();

            self.view
                .issue(async move { actions::fetch_references(&client, &paper_id, depth).await })
                .await
        };
        self.view.settle(pending).await
    }

    /// Fetch again after a failure.
    pub async fn retry(&self) -> DispatchOutcome {
        let attempt = self.view.note_retry().await;
        tracing::info!(attempt, "Retrying reference fetch");
        self.load().await
    }

    pub async fn state(&self) -> ViewState<ReferenceNode> {
        self.view.snapshot().await
    }

    #[must_use]
    pub const fn view(&self) -> &SharedView<ReferenceNode> {
        &self.view
    }
}

#[derive(Debug, Clone)]
struct SearchInput {
    query: String,
    year: Option<String>,
    api: Provider,
}

/// Search results view with the last submitted input kept for retries.
#[derive(Debug, Clone)]
pub struct SearchSession {
    client: ScholarClient,
    last: Arc<RwLock<Option<SearchInput>>>,
    view: SharedView<Paper>,
}

impl SearchSession {
    #[must_use]
    pub fn new(client: ScholarClient) -> Self {
        Self { client, last: Arc::default(), view: SharedView::new() }
    }

    /// Submit a search.
    pub async fn submit(&self, query: &str, year: Option<&str>, api: Provider) -> DispatchOutcome {
        let input = SearchInput {
            query: query.to_string(),
            year: year.map(str::to_string),
            api,
        };
        *self.last.write().await = Some(input.clone());
        self.run(input).await
    }

    /// Re-run the last submitted search; `None` if nothing was submitted.
    pub async fn retry(&self) -> Option<DispatchOutcome> {
        let input = self.last.read().await.clone()?;
        let attempt = self.view.note_retry().await;
        tracing::info!(attempt, query = %input.query, "Retrying search");
        Some(self.run(input).await)
    }

    pub async fn state(&self) -> ViewState<Paper> {
        self.view.snapshot().await
    }

    #[must_use]
    pub const fn view(&self) -> &SharedView<Paper> {
        &self.view
    }

    async fn run(&self, input: SearchInput) -> DispatchOutcome {
        let client = self.client.clone();
        self.view
            .dispatch(async move {
                actions::perform_search(&client, &input.query, input.year.as_deref(), input.api)
                    .await
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RequestError;

    fn handle() -> AbortHandle {
        AbortHandle::new_pair().0
    }

    #[test]
    fn test_state_from_result() {
        assert_eq!(ViewState::<u8>::from_result(Ok(vec![])), ViewState::Empty);
        assert_eq!(ViewState::from_result(Ok(vec![1, 2])).items(), &[1, 2]);

        let err = RequestError::validation("query", "Please enter a search query");
        let failed = ViewState::<u8>::from_result(Err(err));
        assert_eq!(failed.error(), Some("Please enter a search query"));
    }

    #[test]
    fn test_stale_completion_is_ignored() {
        let mut view = View::<u8>::new();
        let first = view.begin(handle());
        let second = view.begin(handle());

        assert!(view.complete(second, Ok(vec![2])));
        assert!(!view.complete(first, Ok(vec![1])));
        assert_eq!(view.state().items(), &[2]);
    }

    #[test]
    fn test_begin_aborts_previous_request() {
        let mut view = View::<u8>::new();
        let (first, registration) = AbortHandle::new_pair();
        view.begin(first.clone());
        view.begin(handle());

        assert!(first.is_aborted());
        drop(registration);
    }

    #[test]
    fn test_reset_invalidates_in_flight_ticket() {
        let mut view = View::<u8>::new();
        let ticket = view.begin(handle());
        view.reset();

        assert!(view.state().is_idle());
        assert!(!view.complete(ticket, Ok(vec![1])));
        assert!(view.state().is_idle());
    }

    #[tokio::test]
    async fn test_reset_after_issue_aborts_request() {
        let view = SharedView::<u8>::new();
        let pending = view.issue(async { Ok(vec![1]) }).await;
        assert_eq!(pending.ticket().sequence(), 1);

        view.reset().await;

        assert_eq!(view.settle(pending).await, DispatchOutcome::Aborted);
        assert!(view.snapshot().await.is_idle());
    }

    #[test]
    fn test_retry_counter() {
        let mut view = View::<u8>::new();
        assert_eq!(view.note_retry(), 1);
        assert_eq!(view.note_retry(), 2);
        assert_eq!(view.retries(), 2);
    }

    #[tokio::test]
    async fn test_dispatch_supersedes_pending_request() {
        let view = SharedView::<u8>::new();
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();

        let slow = view.dispatch(async move {
            let _ = rx.await;
            Ok(vec![1])
        });
        let fast = async {
            tokio::task::yield_now().await;
            view.dispatch(async { Ok(vec![2]) }).await
        };

        let (slow, fast) = tokio::join!(slow, fast);
        drop(tx);

        assert_eq!(slow, DispatchOutcome::Aborted);
        assert_eq!(fast, DispatchOutcome::Applied);
        assert_eq!(view.snapshot().await.items(), &[2]);
    }
}
