//! The search controller loop.
//!
//! A search goes through three steps so callers can run several at once:
//! [`SearchSession::begin_search`] snapshots the state and issues a ticket,
//! [`PendingSearch::execute`] runs the request without holding the session, and
//! [`SearchSession::apply`] renders the answer unless a newer search was issued
//! in the meantime. The session stays free for dispatches and new searches while
//! a request is in flight.

use std::sync::Arc;
use std::time::Duration;

use common::search_options::SearchOptions;
use common::search_query::FacetState;
use common::search_result::{PageWindow, ResultSet, SnippetSpans};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::api::search::snippets::snippets_for_display;
use crate::api::search::{build_query, normalize};
use crate::db_utils::es_utils::SearchBackend;
use crate::error::SearchError;
use crate::session::facet_state_store::{FacetStateStore, StateAction};
use crate::session::render_adapter::{PanelOutcome, RenderAdapter, RenderFrame};
use crate::session::request_sequencer::{RequestSequencer, RequestTicket};


/// An issued search that has not been applied yet.
pub struct PendingSearch<B> {
    pub ticket: RequestTicket,
    pub state: Arc<FacetState>,
    pub query: Value,
    backend: Arc<B>,
    token: CancellationToken,
    delay: Option<Duration>,
}

impl<B: SearchBackend> PendingSearch<B> {
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Runs the request; resolves to [`SearchError::Cancelled`] as soon as the
    /// search is superseded, even while waiting for the backend.
    pub async fn execute(&self) -> Result<Value, SearchError> {
        let request = async {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.backend.search(&self.query).await
        };
        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(SearchError::Cancelled),
            response = request => response,
        }
    }
}

impl<B> std::fmt::Debug for PendingSearch<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingSearch")
            .field("ticket", &self.ticket)
            .field("query", &self.query)
            .field("cancelled", &self.token.is_cancelled())
            .field("delay", &self.delay)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    Applied(RequestTicket),
    /// Superseded or cancelled; nothing was rendered.
    Discarded(RequestTicket),
}


pub struct SearchSession<B, R> {
    backend: Arc<B>,
    renderer: R,
    options: SearchOptions,
    store: FacetStateStore,
    sequencer: RequestSequencer,
}

impl<B: SearchBackend, R: RenderAdapter> SearchSession<B, R> {
    pub fn new(backend: B, renderer: R, options: SearchOptions) -> Self {
        let state = options.initial_state();
        Self::with_state(backend, renderer, options, state)
    }

    /// Starts from a restored state, e.g. one decoded from a shared link.
    pub fn with_state(backend: B, renderer: R, options: SearchOptions, state: FacetState) -> Self {
        Self {
            backend: Arc::new(backend),
            renderer,
            options,
            store: FacetStateStore::new(state),
            sequencer: RequestSequencer::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn store(&self) -> &FacetStateStore {
        &self.store
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn dispatch(&mut self, action: StateAction) {
        self.store.dispatch(action);
    }

    /// Snapshots the state, builds its query and supersedes any search in flight.
    pub fn begin_search(&mut self) -> PendingSearch<B> {
        self.begin(None)
    }

    /// Like [`begin_search`](Self::begin_search), but waits `freetext_submit_delay`
    /// before sending when `use_delay` is on, so a burst of keystrokes sends one request.
    pub fn begin_freetext_search(&mut self) -> PendingSearch<B> {
        let delay = self.options.use_delay.then(|| Duration::from_millis(self.options.freetext_submit_delay));
        self.begin(delay)
    }

    fn begin(&mut self, delay: Option<Duration>) -> PendingSearch<B> {
        let state = self.store.snapshot();
        let query = build_query(&state);
        let (ticket, token) = self.sequencer.issue();
        info!("Search issued: ticket {}", ticket.0);
        PendingSearch { ticket, state, query, backend: self.backend.clone(), token, delay }
    }

    /// Renders the response of `pending` if it is still the latest search.
    pub fn apply(&mut self, pending: PendingSearch<B>, response: Result<Value, SearchError>) -> SearchStatus {
        let ticket = pending.ticket;
        if !self.sequencer.is_current(ticket) {
            debug!("Discarding stale response for ticket {}", ticket.0);
            return SearchStatus::Discarded(ticket);
        }
        let outcome = match response {
            Ok(body) => {
                let result = normalize(body);
                if result.is_empty() { PanelOutcome::Empty(result) } else { PanelOutcome::Results(result) }
            }
            Err(SearchError::Cancelled) => {
                debug!("Search {} cancelled", ticket.0);
                return SearchStatus::Discarded(ticket);
            }
            Err(e) => {
                warn!("Search {} failed: {}", ticket.0, e);
                PanelOutcome::Failed { message: e.to_string() }
            }
        };
        let total = outcome.result().map(|result| result.total_found).unwrap_or(0);
        let window = PageWindow::new(pending.state.paging.offset, pending.state.paging.page_size, total);
        let snippets = outcome.result().map(|result| self.snippets(result)).unwrap_or_default();
        self.renderer.render(RenderFrame { ticket, state: pending.state, outcome, window, snippets });
        SearchStatus::Applied(ticket)
    }

    fn snippets(&self, result: &ResultSet) -> Vec<Vec<SnippetSpans>> {
        result
            .highlights
            .iter()
            .map(|highlight| snippets_for_display(highlight, self.options.snippet_style))
            .collect()
    }

    /// Issues, runs and applies one search.
    pub async fn search(&mut self) -> SearchStatus {
        let pending = self.begin_search();
        let response = pending.execute().await;
        self.apply(pending, response)
    }

    /// Applies `action` and searches with the new state.
    pub async fn dispatch_and_search(&mut self, action: StateAction) -> SearchStatus {
        self.dispatch(action);
        self.search().await
    }

    /// Cancels everything in flight; later responses are discarded.
    pub fn close(&mut self) {
        info!("Search session closed");
        self.sequencer.cancel_all();
    }
}
