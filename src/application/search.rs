//! Debounced search.
//!
//! Rapid calls to [`DebouncedSearch::search`] collapse into one outbound
//! request issued after a quiet period; the last query in a burst wins. At
//! most one timer is ever scheduled-but-unfired per instance. A timer that has
//! fired is no longer cancellable; its request always completes and
//! [`DebouncedSearch::settle`] waits for it.

use std::{
    fmt,
    str::FromStr,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use metrics::counter;
use postdeck_api_types::ResultPage;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::config::{DEFAULT_SEARCH_QUIET_PERIOD_MS, SearchSettings};

use super::lock::mutex_lock;
use super::repos::{FetchError, PostFeed};

const SOURCE: &str = "application::search";
const METRIC_SEARCH_SCHEDULED: &str = "postdeck_search_scheduled_total";
const METRIC_SEARCH_CANCELLED: &str = "postdeck_search_cancelled_total";
const METRIC_SEARCH_FIRED: &str = "postdeck_search_fired_total";

/// Which read endpoint a fired search hits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMode {
    /// Free-text match on post titles.
    #[default]
    Title,
    /// Keyword listing.
    Keyword,
}

impl SearchMode {
    async fn run(self, feed: &dyn PostFeed, query: &str) -> Result<ResultPage, FetchError> {
        match self {
            SearchMode::Title => feed.search_by_title(query).await,
            SearchMode::Keyword => feed.list_by_keyword(query).await,
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchMode::Title => f.write_str("title"),
            SearchMode::Keyword => f.write_str("keyword"),
        }
    }
}

impl FromStr for SearchMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "title" => Ok(SearchMode::Title),
            "keyword" => Ok(SearchMode::Keyword),
            other => Err(format!(
                "unknown search mode `{other}` (expected `title` or `keyword`)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    pub quiet_period: Duration,
    pub mode: SearchMode,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            quiet_period: Duration::from_millis(DEFAULT_SEARCH_QUIET_PERIOD_MS),
            mode: SearchMode::default(),
        }
    }
}

impl From<&SearchSettings> for SearchOptions {
    fn from(settings: &SearchSettings) -> Self {
        Self {
            quiet_period: settings.quiet_period,
            mode: settings.mode,
        }
    }
}

/// Receives the outcome of every fired search.
pub trait SearchSink: Send + Sync + 'static {
    fn deliver(&self, query: &str, outcome: Result<ResultPage, FetchError>);
}

#[derive(Default)]
struct TimerState {
    fired: AtomicBool,
    cancelled: AtomicBool,
}

struct PendingTimer {
    generation: u64,
    state: Arc<TimerState>,
    handle: JoinHandle<()>,
}

#[derive(Default)]
struct TimerSlot {
    generation: u64,
    pending: Option<PendingTimer>,
    /// Fired timers whose request may still be running.
    in_flight: Vec<PendingTimer>,
}

impl TimerSlot {
    fn next_to_settle(&mut self) -> Option<PendingTimer> {
        self.in_flight.retain(|timer| !timer.handle.is_finished());
        self.pending.take().or_else(|| self.in_flight.pop())
    }
}

pub struct DebouncedSearch {
    feed: Arc<dyn PostFeed>,
    sink: Arc<dyn SearchSink>,
    options: SearchOptions,
    slot: Arc<Mutex<TimerSlot>>,
}

impl DebouncedSearch {
    pub fn new(feed: Arc<dyn PostFeed>, sink: Arc<dyn SearchSink>, options: SearchOptions) -> Self {
        Self {
            feed,
            sink,
            options,
            slot: Arc::new(Mutex::new(TimerSlot::default())),
        }
    }

    /// Re-arm the timer for `query`. Must be called from within a Tokio runtime.
    pub fn search(&self, query: impl Into<String>) {
        let query = query.into();
        let mut slot = mutex_lock(&self.slot, SOURCE, "search");

        if let Some(previous) = slot.pending.take() {
            if previous.state.fired.load(Ordering::Acquire) {
                debug!(
                    generation = previous.generation,
                    "Previous search already fired; leaving request in flight"
                );
                slot.in_flight.retain(|timer| !timer.handle.is_finished());
                slot.in_flight.push(previous);
            } else {
                previous.state.cancelled.store(true, Ordering::Release);
                previous.handle.abort();
                counter!(METRIC_SEARCH_CANCELLED).increment(1);
                debug!(
                    generation = previous.generation,
                    "Cancelled pending search timer"
                );
            }
        }

        slot.generation += 1;
        let generation = slot.generation;
        let state = Arc::new(TimerState::default());
        let timer = TimerTask {
            generation,
            query,
            options: self.options,
            state: Arc::clone(&state),
            slot: Arc::clone(&self.slot),
            feed: Arc::clone(&self.feed),
            sink: Arc::clone(&self.sink),
        };
        let handle = tokio::spawn(timer.run());

        slot.pending = Some(PendingTimer {
            generation,
            state,
            handle,
        });
        counter!(METRIC_SEARCH_SCHEDULED).increment(1);
    }

    /// True while a timer is scheduled and has not fired yet.
    pub fn is_pending(&self) -> bool {
        let slot = mutex_lock(&self.slot, SOURCE, "is_pending");
        slot.pending
            .as_ref()
            .is_some_and(|timer| !timer.state.fired.load(Ordering::Acquire))
    }

    /// Wait until no timer is scheduled and every fired request has been delivered.
    ///
    /// A `search` issued while settling supersedes the timer being awaited if
    /// it has not fired yet; the new timer is then awaited as well.
    pub async fn settle(&self) {
        loop {
            let next = mutex_lock(&self.slot, SOURCE, "settle").next_to_settle();
            let Some(timer) = next else {
                return;
            };

            if let Err(err) = timer.handle.await {
                if !err.is_cancelled() {
                    warn!(
                        generation = timer.generation,
                        error = %err,
                        "Search task terminated abnormally"
                    );
                }
            }
        }
    }
}

impl Drop for DebouncedSearch {
    fn drop(&mut self) {
        let slot = mutex_lock(&self.slot, SOURCE, "drop");
        if let Some(timer) = slot.pending.as_ref() {
            if !timer.state.fired.load(Ordering::Acquire) {
                timer.handle.abort();
            }
        }
    }
}

struct TimerTask {
    generation: u64,
    query: String,
    options: SearchOptions,
    state: Arc<TimerState>,
    slot: Arc<Mutex<TimerSlot>>,
    feed: Arc<dyn PostFeed>,
    sink: Arc<dyn SearchSink>,
}

impl TimerTask {
    async fn run(self) {
        tokio::time::sleep(self.options.quiet_period).await;

        {
            let slot = mutex_lock(&self.slot, SOURCE, "fire");
            if slot.generation != self.generation {
                if !self.state.cancelled.swap(true, Ordering::AcqRel) {
                    counter!(METRIC_SEARCH_CANCELLED).increment(1);
                    debug!(
                        generation = self.generation,
                        "Search timer superseded while settling"
                    );
                }
                return;
            }
            self.state.fired.store(true, Ordering::Release);
        }

        counter!(METRIC_SEARCH_FIRED).increment(1);
        debug!(
            generation = self.generation,
            query = %self.query,
            mode = %self.options.mode,
            "Search timer fired"
        );

        let outcome = self.options.mode.run(self.feed.as_ref(), &self.query).await;
        self.sink.deliver(&self.query, outcome);
    }
}
