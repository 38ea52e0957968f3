//! Lookup session: index loading, query resolution and detail display.
//!
//! A [`Session`] owns everything one page of the tool needs: the resource
//! source, the index cache and the page itself. Searches take a ticket from
//! a monotonically increasing sequence; a response that arrives after a
//! newer search has started is discarded instead of overwriting the page.

use crate::config::LookupConfig;
use crate::constants::messages;
use crate::detail::fetch_trafo_details;
use crate::index::IndexCache;
use crate::models::SearchIndex;
use crate::page::{Page, StatusKind};
use crate::render::render_results;
use crate::source::ResourceSource;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, error, info};

/// What a single search ended in
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Input was empty after trimming; nothing was fetched
    EmptyQuery,
    /// The index could not be loaded, even after one more attempt
    IndexUnavailable,
    /// The normalized query is not an index key
    NotFound(String),
    /// The detail record for this identifier is on the page
    Rendered(String),
    /// The detail record for this identifier could not be loaded
    DetailFailed(String),
    /// A newer search started before this one finished
    Superseded,
}

/// Trim and uppercase raw user input into an index key
pub fn normalize_query(raw: &str) -> String {
    raw.trim().to_uppercase()
}

pub struct Session {
    source: Arc<dyn ResourceSource>,
    config: LookupConfig,
    index: IndexCache,
    page: Mutex<Page>,
    sequence: AtomicU64,
}

impl Session {
    pub fn new(source: Arc<dyn ResourceSource>, config: LookupConfig) -> Self {
        Self::with_index(source, config, IndexCache::new())
    }

    pub fn with_index(
        source: Arc<dyn ResourceSource>,
        config: LookupConfig,
        index: IndexCache,
    ) -> Self {
        Self {
            source,
            config,
            index,
            page: Mutex::new(Page::new()),
            sequence: AtomicU64::new(0),
        }
    }

    /// Snapshot of the page as it currently stands
    pub fn page(&self) -> Page {
        self.page_mut().clone()
    }

    pub fn index(&self) -> Option<Arc<SearchIndex>> {
        self.index.get()
    }

    pub fn config(&self) -> &LookupConfig {
        &self.config
    }

    fn page_mut(&self) -> MutexGuard<'_, Page> {
        self.page.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_current(&self, ticket: u64) -> bool {
        self.sequence.load(Ordering::SeqCst) == ticket
    }

    /// Load (or reload) the search index.
    ///
    /// Failures never reach the caller: they are logged and shown on the
    /// status line, and the previously cached state is kept.
    pub async fn load_index(&self) {
        if let Err(e) = self.index.load(&*self.source, &self.config.retry).await {
            error!("Error loading search index: {}", e);
            self.page_mut()
                .set_status(StatusKind::Error, messages::INDEX_LOAD_FAILED);
        }
    }

    /// Resolve `raw` through the index and display the matching record
    pub async fn perform_search(&self, raw: &str) -> SearchOutcome {
        let ticket = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;

        {
            let mut page = self.page_mut();
            page.set_status(StatusKind::Info, messages::SEARCHING);
            page.hide_results();
        }

        let query = normalize_query(raw);
        if query.is_empty() {
            self.page_mut()
                .set_status(StatusKind::Warning, messages::EMPTY_QUERY);
            return SearchOutcome::EmptyQuery;
        }

        let index = match self.index.get() {
            Some(index) => index,
            None => {
                self.page_mut()
                    .set_status(StatusKind::Info, messages::INDEX_LOADING);
                let loaded = self.index.load(&*self.source, &self.config.retry).await;
                if let Err(e) = &loaded {
                    error!("Error loading search index: {}", e);
                }
                // A newer search owns the page now, success or not
                if !self.is_current(ticket) {
                    debug!("Discarding stale index reload for '{}'", query);
                    return SearchOutcome::Superseded;
                }
                match (loaded, self.index.get()) {
                    (Ok(_), Some(index)) => index,
                    _ => {
                        self.page_mut()
                            .set_status(StatusKind::Error, messages::INDEX_LOAD_FAILED);
                        return SearchOutcome::IndexUnavailable;
                    }
                }
            }
        };

        let Some(id) = index.lookup(&query) else {
            debug!("No index entry for '{}'", query);
            self.page_mut()
                .set_status(StatusKind::Warning, messages::no_results(&query));
            return SearchOutcome::NotFound(query);
        };

        let id = id.to_string();
        info!("'{}' resolved to transformer {}", query, id);
        self.show_trafo_details(&id, ticket).await
    }

    async fn show_trafo_details(&self, id: &str, ticket: u64) -> SearchOutcome {
        let result = fetch_trafo_details(&*self.source, id, &self.config.retry).await;

        if !self.is_current(ticket) {
            debug!("Discarding stale detail response for {}", id);
            return SearchOutcome::Superseded;
        }

        match result {
            Ok(record) => {
                let rendered = render_results(&record, &self.config.badge);
                let mut page = self.page_mut();
                page.show_results(rendered);
                page.clear_status();
                SearchOutcome::Rendered(id.to_string())
            }
            Err(e) => {
                error!("Error loading details for {}: {}", id, e);
                self.page_mut()
                    .set_status(StatusKind::Error, messages::DETAIL_LOAD_FAILED);
                SearchOutcome::DetailFailed(id.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RetryPolicy;
    use crate::constants::INDEX_LOCATION;
    use crate::render::ClientRow;
    use crate::source::testing::MemorySource;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::Notify;

    const INDEX: &str = r#"{"AB123": "T-001", "CT-9": "T-002"}"#;

    fn session(source: MemorySource) -> (Session, Arc<MemorySource>) {
        let source = Arc::new(source);
        let session = Session::new(source.clone(), LookupConfig::default());
        (session, source)
    }

    fn detail_requests(source: &MemorySource) -> Vec<String> {
        source
            .requests()
            .into_iter()
            .filter(|r| r.starts_with("api/details/"))
            .collect()
    }

    #[test]
    fn test_normalize_query() {
        assert_eq!(normalize_query(" ab123 "), "AB123");
        assert_eq!(normalize_query("\tct-9\n"), "CT-9");
        assert_eq!(normalize_query("   "), "");
    }

    #[tokio::test]
    async fn test_hit_fetches_exactly_the_mapped_identifier() {
        let (session, source) = session(
            MemorySource::new()
                .with_resource(INDEX_LOCATION, INDEX)
                .with_resource(
                    "api/details/T-001.json",
                    r#"{"CODIGO_TRANSFORMADOR": "T-001", "LEVANTAR_STATUS": "LEVANTAR"}"#,
                ),
        );
        session.load_index().await;

        let outcome = session.perform_search(" ab123 ").await;

        assert_eq!(outcome, SearchOutcome::Rendered("T-001".to_string()));
        assert_eq!(detail_requests(&source), vec!["api/details/T-001.json"]);

        let page = session.page();
        assert_eq!(page.status(), "");
        let results = page.results().unwrap();
        assert_eq!(results.slot("t_codigo").unwrap().value, "T-001");
        assert_eq!(results.badge.class, "badge-danger");
    }

    #[tokio::test]
    async fn test_miss_reports_normalized_query() {
        let (session, source) = session(MemorySource::new().with_resource(INDEX_LOCATION, INDEX));
        session.load_index().await;

        let outcome = session.perform_search("zzz999").await;

        assert_eq!(outcome, SearchOutcome::NotFound("ZZZ999".to_string()));
        let page = session.page();
        assert_eq!(page.status(), "No se encontraron resultados para: ZZZ999");
        assert!(!page.is_results_visible());
        assert!(detail_requests(&source).is_empty());
    }

    #[tokio::test]
    async fn test_empty_query_makes_no_request() {
        let (session, source) = session(MemorySource::new().with_resource(INDEX_LOCATION, INDEX));

        for raw in ["", "   ", "\t\n"] {
            assert_eq!(session.perform_search(raw).await, SearchOutcome::EmptyQuery);
            assert_eq!(
                session.page().status(),
                "Por favor ingrese un término de búsqueda."
            );
        }
        assert!(source.requests().is_empty());
    }

    #[tokio::test]
    async fn test_lazy_index_load_on_first_search() {
        let (session, source) = session(
            MemorySource::new()
                .with_resource(INDEX_LOCATION, INDEX)
                .with_resource("api/details/T-002.json", "{}"),
        );

        let outcome = session.perform_search("ct-9").await;

        assert_eq!(outcome, SearchOutcome::Rendered("T-002".to_string()));
        assert_eq!(source.request_count(INDEX_LOCATION), 1);
    }

    #[tokio::test]
    async fn test_unavailable_index_aborts_after_one_reload() {
        let (session, source) = session(MemorySource::new().with_failure(INDEX_LOCATION, 503));
        session.load_index().await;
        assert_eq!(
            session.page().status(),
            "Error: No se pudo cargar la base de datos de búsqueda."
        );

        let outcome = session.perform_search("AB123").await;

        assert_eq!(outcome, SearchOutcome::IndexUnavailable);
        assert_eq!(source.request_count(INDEX_LOCATION), 2);
        assert!(detail_requests(&source).is_empty());
        assert_eq!(
            session.page().status(),
            "Error: No se pudo cargar la base de datos de búsqueda."
        );
    }

    #[tokio::test]
    async fn test_configured_retries_apply_to_index_load() {
        let source = Arc::new(MemorySource::new().with_failure(INDEX_LOCATION, 503));
        let config = LookupConfig::default().with_retry(RetryPolicy {
            max_attempts: 3,
            backoff_ms: 0,
        });
        let session = Session::new(source.clone(), config);

        session.load_index().await;

        assert!(session.index().is_none());
        assert_eq!(source.request_count(INDEX_LOCATION), 3);
    }

    #[tokio::test]
    async fn test_detail_failure_shows_no_partial_results() {
        let (session, _source) = session(
            MemorySource::new()
                .with_resource(INDEX_LOCATION, INDEX)
                .with_resource("api/details/T-001.json", "{\"CLIENTES\": "),
        );
        session.load_index().await;

        let outcome = session.perform_search("AB123").await;

        assert_eq!(outcome, SearchOutcome::DetailFailed("T-001".to_string()));
        let page = session.page();
        assert_eq!(page.status(), "Error al cargar detalles del Transformador.");
        assert_eq!(page.status_kind(), StatusKind::Error);
        assert!(!page.is_results_visible());
    }

    #[tokio::test]
    async fn test_rerender_replaces_client_table() {
        let (session, _source) = session(
            MemorySource::new()
                .with_resource(INDEX_LOCATION, INDEX)
                .with_resource(
                    "api/details/T-001.json",
                    r#"{"CLIENTES": [{"NOMBRE_CLIENTE": "ANA"}, {"NOMBRE_CLIENTE": "LUIS"}]}"#,
                )
                .with_resource("api/details/T-002.json", r#"{"CLIENTES": []}"#),
        );
        session.load_index().await;

        session.perform_search("AB123").await;
        assert_eq!(session.page().results().unwrap().client_rows.len(), 2);

        session.perform_search("CT-9").await;
        let page = session.page();
        let rows = &page.results().unwrap().client_rows;
        assert_eq!(rows.len(), 1);
        assert!(matches!(rows[0], ClientRow::Placeholder { colspan: 7, .. }));
    }

    #[tokio::test]
    async fn test_new_search_hides_previous_results() {
        let (session, _source) = session(
            MemorySource::new()
                .with_resource(INDEX_LOCATION, INDEX)
                .with_resource("api/details/T-001.json", "{}"),
        );
        session.load_index().await;

        session.perform_search("AB123").await;
        assert!(session.page().is_results_visible());

        session.perform_search("missing").await;
        assert!(!session.page().is_results_visible());
    }

    /// Source whose detail responses wait until released
    struct GatedSource {
        inner: MemorySource,
        gate: Notify,
    }

    #[async_trait]
    impl ResourceSource for GatedSource {
        async fn fetch(&self, location: &str) -> crate::Result<Vec<u8>> {
            if location == "api/details/T-001.json" {
                self.gate.notified().await;
            }
            self.inner.fetch(location).await
        }

        fn describe(&self) -> String {
            "gated".to_string()
        }
    }

    #[tokio::test]
    async fn test_stale_detail_response_is_discarded() {
        let source = Arc::new(GatedSource {
            inner: MemorySource::new()
                .with_resource(INDEX_LOCATION, INDEX)
                .with_resource("api/details/T-001.json", r#"{"CODIGO_TRANSFORMADOR": "T-001"}"#)
                .with_resource("api/details/T-002.json", r#"{"CODIGO_TRANSFORMADOR": "T-002"}"#),
            gate: Notify::new(),
        });
        let session = Session::new(source.clone(), LookupConfig::default());
        session.load_index().await;

        let slow = session.perform_search("AB123");
        let fast = async {
            let outcome = session.perform_search("CT-9").await;
            source.gate.notify_one();
            outcome
        };
        let (slow_outcome, fast_outcome) = tokio::join!(slow, fast);

        assert_eq!(slow_outcome, SearchOutcome::Superseded);
        assert_eq!(fast_outcome, SearchOutcome::Rendered("T-002".to_string()));
        let page = session.page();
        assert_eq!(page.results().unwrap().slot("t_codigo").unwrap().value, "T-002");
    }

    /// Source whose first index fetch waits until released and then fails
    struct FlakyIndexSource {
        inner: MemorySource,
        gate: Notify,
        index_fetches: AtomicUsize,
    }

    #[async_trait]
    impl ResourceSource for FlakyIndexSource {
        async fn fetch(&self, location: &str) -> crate::Result<Vec<u8>> {
            if location == INDEX_LOCATION && self.index_fetches.fetch_add(1, Ordering::SeqCst) == 0
            {
                self.gate.notified().await;
                return Err(crate::LookupError::UnsuccessfulStatus {
                    location: location.to_string(),
                    status: 503,
                });
            }
            self.inner.fetch(location).await
        }

        fn describe(&self) -> String {
            "flaky".to_string()
        }
    }

    #[tokio::test]
    async fn test_stale_index_reload_failure_leaves_page_alone() {
        let source = Arc::new(FlakyIndexSource {
            inner: MemorySource::new()
                .with_resource(INDEX_LOCATION, INDEX)
                .with_resource("api/details/T-002.json", r#"{"CODIGO_TRANSFORMADOR": "T-002"}"#),
            gate: Notify::new(),
            index_fetches: AtomicUsize::new(0),
        });
        let session = Session::new(source.clone(), LookupConfig::default());

        let slow = session.perform_search("AB123");
        let fast = async {
            let outcome = session.perform_search("CT-9").await;
            source.gate.notify_one();
            outcome
        };
        let (slow_outcome, fast_outcome) = tokio::join!(slow, fast);

        assert_eq!(slow_outcome, SearchOutcome::Superseded);
        assert_eq!(fast_outcome, SearchOutcome::Rendered("T-002".to_string()));
        let page = session.page();
        assert_eq!(page.status(), "");
        assert!(page.is_results_visible());
        assert_eq!(page.results().unwrap().slot("t_codigo").unwrap().value, "T-002");
    }
}
