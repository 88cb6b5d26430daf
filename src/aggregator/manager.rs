use chrono::Utc;
use futures::future::try_join_all;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

use super::session::{Completion, FetchTicket, SearchSession};
use super::types::{FetchOutcome, SearchEvent};
use crate::client::SearchClient;
use crate::config::AppConfig;
use crate::error::FetchError;
use crate::models::{Document, DocumentOrigin, RecentSearchEntry, SearchFilter};
use crate::recent::RecentSearchStore;

/// Aggregator tuning / 聚合器参数
#[derive(Debug, Clone)]
pub struct AggregatorOptions {
    /// Upper bound for each remote call
    pub request_timeout: Duration,
    pub event_capacity: usize,
    pub initial_filter: SearchFilter,
}

impl Default for AggregatorOptions {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
            event_capacity: 256,
            initial_filter: SearchFilter::All,
        }
    }
}

impl AggregatorOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            request_timeout: config.get_request_timeout(),
            event_capacity: config.search.event_capacity.max(1),
            initial_filter: config.search.default_filter,
        }
    }
}

/// Frees the session's in-flight slot if a fetch future is dropped before it settles
struct InFlightGuard {
    session: Arc<Mutex<SearchSession>>,
    generation: u64,
    armed: bool,
}

impl InFlightGuard {
    fn new(session: Arc<Mutex<SearchSession>>, generation: u64) -> Self {
        Self {
            session,
            generation,
            armed: true,
        }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if self.armed {
            tracing::debug!("Fetch of generation {} dropped before settling", self.generation);
            self.session.lock().abandon(self.generation);
        }
    }
}

/// Search aggregator (one per screen, events via broadcast) / 搜索聚合器
///
/// Owns the [`SearchSession`], fans requests out to the blog and cafe
/// sources, tags and merges what comes back and reports it as
/// [`SearchEvent`]s. Every fetch carries the session generation it was
/// dispatched under; completions from an older generation are dropped.
#[derive(Clone)]
pub struct SearchAggregator {
    client: Arc<dyn SearchClient>,
    store: Arc<dyn RecentSearchStore>,
    session: Arc<Mutex<SearchSession>>,
    event_sender: broadcast::Sender<SearchEvent>,
    request_timeout: Duration,
}

impl SearchAggregator {
    pub fn new(
        client: Arc<dyn SearchClient>,
        store: Arc<dyn RecentSearchStore>,
        options: AggregatorOptions,
    ) -> Self {
        let (event_sender, _) = broadcast::channel(options.event_capacity.max(1));
        Self {
            client,
            store,
            session: Arc::new(Mutex::new(SearchSession::new(options.initial_filter))),
            event_sender,
            request_timeout: options.request_timeout,
        }
    }

    /// 订阅搜索事件 / Subscribe to search events
    pub fn subscribe(&self) -> broadcast::Receiver<SearchEvent> {
        self.event_sender.subscribe()
    }

    /// Snapshot of the session / 会话快照
    pub fn session(&self) -> SearchSession {
        self.session.lock().clone()
    }

    pub fn filter(&self) -> SearchFilter {
        self.session.lock().filter()
    }

    /// Submit a query: record it, reset paging, fetch page 1 / 提交搜索
    ///
    /// Blank or missing queries are ignored.
    pub async fn submit(&self, query: Option<&str>) -> FetchOutcome {
        let query = match query {
            Some(q) if !q.trim().is_empty() => q,
            _ => return FetchOutcome::Skipped,
        };

        let ticket = self.session.lock().begin(query);
        tracing::info!(
            "Search '{}' ({}), generation {}",
            query,
            ticket.filter,
            ticket.generation
        );

        // The store write runs alongside the fetch and never delays it
        let (_, outcome) = tokio::join!(self.record_recent(query), self.run(ticket));
        outcome
    }

    /// Fetch the next page of the active query / 请求下一页
    pub async fn request_next_page(&self) -> FetchOutcome {
        let ticket = match self.session.lock().next_page() {
            Some(ticket) => ticket,
            None => {
                tracing::debug!("Next page skipped: no active query or fetch in flight");
                return FetchOutcome::Skipped;
            }
        };
        self.run(ticket).await
    }

    /// Change the filter; an active query is re-run from page 1 / 切换搜索类型
    pub async fn change_filter(&self, filter: SearchFilter) -> FetchOutcome {
        let query = {
            let mut session = self.session.lock();
            if !session.set_filter(filter) {
                return FetchOutcome::Skipped;
            }
            session.query().map(str::to_string)
        };

        match query {
            Some(query) => self.submit(Some(&query)).await,
            None => FetchOutcome::Skipped,
        }
    }

    /// Load recent terms; emits `ShowRecent` only when there are any / 最近搜索词
    pub async fn list_recent(&self) -> Vec<RecentSearchEntry> {
        match self.store.list_recent().await {
            Ok(entries) => {
                if !entries.is_empty() {
                    self.emit(SearchEvent::ShowRecent {
                        entries: entries.clone(),
                    });
                }
                entries
            }
            Err(e) => {
                tracing::warn!("Failed to load recent searches: {}", e);
                Vec::new()
            }
        }
    }

    async fn record_recent(&self, term: &str) {
        if let Err(e) = self.store.insert(term, Utc::now()).await {
            tracing::warn!("Failed to save recent search '{}': {}", term, e);
        }
    }

    async fn run(&self, ticket: FetchTicket) -> FetchOutcome {
        tracing::debug!(
            "Dispatch '{}' page {} ({})",
            ticket.query,
            ticket.page,
            ticket.filter
        );
        let mut guard = InFlightGuard::new(self.session.clone(), ticket.generation);
        let result = self.fetch(&ticket).await;
        guard.disarm();

        // Settle and emit under the lock so a newer query cannot interleave
        let mut session = self.session.lock();
        if session.complete(&ticket, result.is_ok()) == Completion::Stale {
            tracing::debug!(
                "Dropped stale result for '{}' page {} (generation {} < {})",
                ticket.query,
                ticket.page,
                ticket.generation,
                session.generation()
            );
            return FetchOutcome::Discarded {
                generation: ticket.generation,
            };
        }

        match result {
            Ok(documents) => {
                let count = documents.len();
                let event = if ticket.page == 1 {
                    SearchEvent::ReplaceResults { documents }
                } else {
                    SearchEvent::AppendResults { documents }
                };
                self.emit(event);
                FetchOutcome::Delivered {
                    page: ticket.page,
                    count,
                }
            }
            Err(e) => {
                tracing::warn!(
                    "Search '{}' page {} failed: {}",
                    ticket.query,
                    ticket.page,
                    e
                );
                self.emit(SearchEvent::FetchFailed {
                    reason: e.to_string(),
                });
                FetchOutcome::Failed
            }
        }
    }

    /// Query every source of the ticket's filter and merge in source order.
    /// Any failure fails the whole fetch.
    async fn fetch(&self, ticket: &FetchTicket) -> Result<Vec<Document>, FetchError> {
        let sources = ticket.filter.sources();
        let joined = sources.len() > 1;

        let pages = try_join_all(sources.iter().map(|&origin| async move {
            self.fetch_source(origin, &ticket.query, ticket.page)
                .await
                .map_err(|e| if joined { FetchError::join(origin, e) } else { e })
        }))
        .await?;

        Ok(pages.into_iter().flatten().collect())
    }

    async fn fetch_source(
        &self,
        origin: DocumentOrigin,
        query: &str,
        page: u32,
    ) -> Result<Vec<Document>, FetchError> {
        let page = tokio::time::timeout(self.request_timeout, self.client.search(origin, query, page))
            .await
            .map_err(|_| FetchError::Timeout(self.request_timeout))??;
        Ok(page.into_tagged(origin))
    }

    fn emit(&self, event: SearchEvent) {
        // No subscribers is fine
        let _ = self.event_sender.send(event);
    }
}
