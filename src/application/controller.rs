//! View-state controller for the post listing.

use std::sync::Arc;

use postdeck_api_types::ResultPage;
use tokio::sync::{mpsc, watch};
use tracing::{debug, instrument, warn};

use crate::domain::view_state::ViewState;

use super::repos::{FetchError, PostFeed};
use super::search::{DebouncedSearch, SearchOptions, SearchSink};

/// Failures kept for the receiver before newer ones are dropped.
pub const FAILURE_BACKLOG: usize = 16;

/// Holds the displayed state; every write goes through [`ViewStateStore::replace`].
pub struct ViewStateStore {
    state: watch::Sender<ViewState>,
    failures: mpsc::Sender<FetchError>,
}

impl ViewStateStore {
    fn new(initial: ResultPage, failures: mpsc::Sender<FetchError>) -> Self {
        let (state, _) = watch::channel(ViewState::from_page(initial));
        Self { state, failures }
    }

    /// Swap in a state derived entirely from `page`.
    pub fn replace(&self, page: ResultPage) {
        let next = ViewState::from_page(page);
        debug!(
            page_number = next.page_number,
            total_pages = next.total_pages,
            items = next.items.len(),
            "View state replaced"
        );
        self.state.send_replace(next);
    }

    pub fn snapshot(&self) -> ViewState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.subscribe()
    }
}

impl SearchSink for ViewStateStore {
    fn deliver(&self, query: &str, outcome: Result<ResultPage, FetchError>) {
        match outcome {
            Ok(page) => self.replace(page),
            Err(err) => {
                warn!(query, error = %err, "Debounced search failed");
                match self.failures.try_send(err) {
                    Ok(()) => {}
                    Err(mpsc::error::TrySendError::Full(err)) => {
                        warn!(error = %err, "Search failure backlog full; dropping failure");
                    }
                    Err(mpsc::error::TrySendError::Closed(_)) => {
                        debug!("Search failure receiver dropped");
                    }
                }
            }
        }
    }
}

/// Displayed page of posts plus the `list` and `search` operations that refresh it.
///
/// Resolutions are not sequenced: when a `list` and a fired search overlap,
/// whichever completes last owns the state.
pub struct PostListController {
    feed: Arc<dyn PostFeed>,
    store: Arc<ViewStateStore>,
    search: DebouncedSearch,
}

impl PostListController {
    /// Build a controller seeded with `initial`.
    ///
    /// Failures of debounced searches arrive on the returned receiver. It holds
    /// at most [`FAILURE_BACKLOG`] undrained failures; later ones are logged and
    /// dropped until the receiver catches up.
    pub fn new(
        feed: Arc<dyn PostFeed>,
        initial: ResultPage,
        options: SearchOptions,
    ) -> (Self, mpsc::Receiver<FetchError>) {
        let (failures_tx, failures_rx) = mpsc::channel(FAILURE_BACKLOG);
        let store = Arc::new(ViewStateStore::new(initial, failures_tx));
        let sink: Arc<dyn SearchSink> = store.clone();
        let search = DebouncedSearch::new(Arc::clone(&feed), sink, options);

        (
            Self {
                feed,
                store,
                search,
            },
            failures_rx,
        )
    }

    /// Fetch `page` and replace the state. On failure the state is left as it was.
    #[instrument(skip(self))]
    pub async fn list(&self, page: u32) -> Result<(), FetchError> {
        let result = self.feed.list(page).await?;
        self.store.replace(result);
        Ok(())
    }

    pub fn search(&self, query: impl Into<String>) {
        self.search.search(query);
    }

    /// Wait for any scheduled search to fire and every fired search to land.
    pub async fn settle(&self) {
        self.search.settle().await;
    }

    pub fn is_search_pending(&self) -> bool {
        self.search.is_pending()
    }

    pub fn state(&self) -> ViewState {
        self.store.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.store.subscribe()
    }
}
