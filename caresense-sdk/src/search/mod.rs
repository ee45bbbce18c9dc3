//! Doctor directory search engine
//!
//! [`DirectorySearchEngine`] owns the fetched records and the browsing state
//! (category, query, list-size policy, selection). Refreshes may overlap;
//! only the most recently started one is ever applied.

pub mod catalog;
pub mod filter;

pub use catalog::{CategoryTag, Taxonomy, ALL_CATEGORY_ID};
pub use filter::{compute_view, DirectoryView, ViewMode, PREVIEW_LIMIT};

use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use log::{debug, info, warn};

use crate::core::DirectoryService;
use crate::error::{ErrorKind, Result, ServiceError};
use crate::services::directory::{DirectoryRecord, DoctorQuery, RecordId};

/// Fetch status of the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineStatus {
    /// A fetch is in flight, or none has completed yet
    Loading,

    /// The last applied fetch succeeded
    Ready,

    /// The last applied fetch failed; earlier records are kept
    Errored { kind: ErrorKind, message: String },
}

/// What happened to one `refresh()` call
#[derive(Debug)]
pub enum RefreshOutcome {
    /// Records replaced
    Applied { record_count: usize },

    /// Fetch failed; previous records kept
    Failed(ServiceError),

    /// A newer refresh started before this one finished; result dropped
    Superseded,
}

impl RefreshOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, RefreshOutcome::Applied { .. })
    }
}

#[derive(Debug)]
struct EngineState {
    records: Vec<DirectoryRecord>,
    active_category: String,
    query_text: String,
    view_mode: ViewMode,
    selected: Option<RecordId>,
    status: EngineStatus,
    generation: u64,
}

/// In-memory search and selection over the doctor directory
pub struct DirectorySearchEngine<S> {
    service: S,
    taxonomy: Taxonomy,
    fetch_query: DoctorQuery,
    state: Mutex<EngineState>,
}

impl<S: DirectoryService> DirectorySearchEngine<S> {
    /// Engine over the standard taxonomy
    pub fn new(service: S) -> Self {
        Self::with_taxonomy(service, Taxonomy::standard())
    }

    /// Engine over a custom taxonomy
    pub fn with_taxonomy(service: S, taxonomy: Taxonomy) -> Self {
        Self {
            service,
            taxonomy,
            fetch_query: DoctorQuery::default(),
            state: Mutex::new(EngineState {
                records: Vec::new(),
                active_category: ALL_CATEGORY_ID.to_string(),
                query_text: String::new(),
                view_mode: ViewMode::default(),
                selected: None,
                status: EngineStatus::Loading,
                generation: 0,
            }),
        }
    }

    /// Parameters sent with every fetch
    pub fn with_fetch_query(mut self, query: DoctorQuery) -> Self {
        self.fetch_query = query;
        self
    }

    /// Start in the given list-size policy
    pub fn with_view_mode(self, mode: ViewMode) -> Self {
        self.lock_state().view_mode = mode;
        self
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    fn lock_state(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Re-fetch the directory.
    ///
    /// The refresh is registered when this is called, not when the returned
    /// future is first polled, so call order decides which fetch wins.
    /// Category, query and selection are left alone.
    pub fn refresh(&self) -> impl Future<Output = RefreshOutcome> + Send + '_ {
        let ticket = {
            let mut state = self.lock_state();
            state.generation += 1;
            state.status = EngineStatus::Loading;
            state.generation
        };
        debug!("Directory refresh #{} started", ticket);

        async move {
            let result = self.service.fetch_doctors(&self.fetch_query).await;

            let mut state = self.lock_state();
            if state.generation != ticket {
                debug!(
                    "Directory refresh #{} superseded by #{}, dropping its result",
                    ticket, state.generation
                );
                return RefreshOutcome::Superseded;
            }

            match result {
                Ok(records) => {
                    let record_count = records.len();
                    state.records = records;
                    state.status = EngineStatus::Ready;
                    info!("Directory refresh #{} applied {} record(s)", ticket, record_count);
                    RefreshOutcome::Applied { record_count }
                }
                Err(error) => {
                    warn!(
                        "Directory refresh #{} failed, keeping {} record(s): {}",
                        ticket,
                        state.records.len(),
                        error
                    );
                    state.status = EngineStatus::Errored {
                        kind: error.kind(),
                        message: error.detail().to_string(),
                    };
                    RefreshOutcome::Failed(error)
                }
            }
        }
    }

    /// Current fetch status
    pub fn status(&self) -> EngineStatus {
        self.lock_state().status.clone()
    }

    /// All records in fetch order
    pub fn records(&self) -> Vec<DirectoryRecord> {
        self.lock_state().records.clone()
    }

    pub fn record_count(&self) -> usize {
        self.lock_state().records.len()
    }

    /// The visible list under the current category, query and policy
    pub fn compute_visible(&self) -> Vec<DirectoryRecord> {
        self.view().records
    }

    /// The visible list with match counts
    pub fn view(&self) -> DirectoryView {
        let state = self.lock_state();
        let category = self
            .taxonomy
            .get(&state.active_category)
            .unwrap_or_else(|| self.taxonomy.all_category());

        compute_view(&state.records, category, &state.query_text, state.view_mode)
    }

    /// Active category
    pub fn active_category(&self) -> CategoryTag {
        let state = self.lock_state();
        self.taxonomy
            .get(&state.active_category)
            .unwrap_or_else(|| self.taxonomy.all_category())
            .clone()
    }

    /// Switch category. Unknown ids are rejected and change nothing.
    pub fn set_active_category(&self, id: &str) -> Result<()> {
        let category = self.taxonomy.require(id)?;
        self.lock_state().active_category = category.id.clone();
        Ok(())
    }

    pub fn query_text(&self) -> String {
        self.lock_state().query_text.clone()
    }

    /// Replace the free-text query; stored as typed, trimmed when matching
    pub fn set_query(&self, text: impl Into<String>) {
        self.lock_state().query_text = text.into();
    }

    pub fn view_mode(&self) -> ViewMode {
        self.lock_state().view_mode
    }

    pub fn set_view_mode(&self, mode: ViewMode) {
        self.lock_state().view_mode = mode;
    }

    /// Select a record for the detail view.
    ///
    /// Returns `false`, leaving the selection alone, when no current record
    /// has this id.
    pub fn select_record(&self, id: &RecordId) -> bool {
        let mut state = self.lock_state();
        if state.records.iter().any(|r| &r.id == id) {
            state.selected = Some(id.clone());
            true
        } else {
            false
        }
    }

    pub fn clear_selection(&self) {
        self.lock_state().selected = None;
    }

    /// The selected record, resolved against the current records
    pub fn selected_record(&self) -> Option<DirectoryRecord> {
        let state = self.lock_state();
        let id = state.selected.as_ref()?;
        state.records.iter().find(|r| &r.id == id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MockDirectoryService;

    fn records() -> Vec<DirectoryRecord> {
        vec![
            DirectoryRecord::new(1u64, "Dr. Asha Rao", "Cardiology").with_location("Mumbai"),
            DirectoryRecord::new(2u64, "Dr. Vikram Shah", "Dermatology").with_location("Pune"),
        ]
    }

    #[tokio::test]
    async fn test_refresh_applies_records() {
        let mut service = MockDirectoryService::new();
        service
            .expect_fetch_doctors()
            .times(1)
            .returning(|_| Ok(records()));

        let engine = DirectorySearchEngine::new(service);
        assert_eq!(engine.status(), EngineStatus::Loading);

        let outcome = engine.refresh().await;
        assert!(matches!(outcome, RefreshOutcome::Applied { record_count: 2 }));
        assert_eq!(engine.status(), EngineStatus::Ready);
        assert_eq!(engine.compute_visible(), records());
    }

    #[tokio::test]
    async fn test_unknown_category_is_rejected() {
        let mut service = MockDirectoryService::new();
        service.expect_fetch_doctors().returning(|_| Ok(records()));

        let engine = DirectorySearchEngine::new(service);
        engine.refresh().await;
        engine.set_active_category("eyes-skin").unwrap();

        let err = engine.set_active_category("dentistry").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(engine.active_category().id, "eyes-skin");
        assert_eq!(engine.compute_visible().len(), 1);
    }

    #[tokio::test]
    async fn test_selection() {
        let mut service = MockDirectoryService::new();
        service.expect_fetch_doctors().returning(|_| Ok(records()));

        let engine = DirectorySearchEngine::new(service);
        engine.refresh().await;

        assert!(engine.select_record(&RecordId::from(2u64)));
        assert_eq!(engine.selected_record().unwrap().display_name, "Dr. Vikram Shah");

        assert!(!engine.select_record(&RecordId::from(99u64)));
        assert_eq!(engine.selected_record().unwrap().id, RecordId::from(2u64));

        engine.clear_selection();
        assert!(engine.selected_record().is_none());
    }
}
