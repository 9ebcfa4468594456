//! In-memory collaborators shared by the application tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use postdeck_api_types::{PostSummary, ResultPage};

use super::repos::{FetchError, PostFeed};
use super::search::SearchSink;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FeedCall {
    List(u32),
    Keyword(String),
    Title(String),
}

/// Records every call and answers with deterministic pages.
///
/// `list(n)` returns posts `n * 10` and `n * 10 + 1` on page `n` of 3; keyword
/// and title reads return a single post titled after the query.
#[derive(Default)]
pub(crate) struct RecordingFeed {
    calls: Mutex<Vec<FeedCall>>,
    failure: Option<FetchError>,
    latency: Duration,
    list_latency: Option<Duration>,
    query_latency: HashMap<String, Duration>,
    query_failure: HashMap<String, FetchError>,
}

impl RecordingFeed {
    pub(crate) fn with_latency(latency: Duration) -> Self {
        Self {
            latency,
            ..Default::default()
        }
    }

    pub(crate) fn failing(error: FetchError) -> Self {
        Self {
            failure: Some(error),
            ..Default::default()
        }
    }

    pub(crate) fn with_list_latency(mut self, latency: Duration) -> Self {
        self.list_latency = Some(latency);
        self
    }

    /// Keyword and title reads for `query` take `latency` instead of the default.
    pub(crate) fn with_query_latency(mut self, query: &str, latency: Duration) -> Self {
        self.query_latency.insert(query.to_string(), latency);
        self
    }

    /// Keyword and title reads for `query` fail with `error`.
    pub(crate) fn with_query_failure(mut self, query: &str, error: FetchError) -> Self {
        self.query_failure.insert(query.to_string(), error);
        self
    }

    pub(crate) fn calls(&self) -> Vec<FeedCall> {
        self.calls.lock().expect("calls lock").clone()
    }

    async fn answer(
        &self,
        call: FeedCall,
        latency: Duration,
        page: ResultPage,
    ) -> Result<ResultPage, FetchError> {
        self.calls.lock().expect("calls lock").push(call);
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok(page),
        }
    }

    async fn answer_query(&self, call: FeedCall, query: &str) -> Result<ResultPage, FetchError> {
        let latency = self
            .query_latency
            .get(query)
            .copied()
            .unwrap_or(self.latency);
        let page = self.answer(call, latency, titled_page(query)).await?;
        match self.query_failure.get(query) {
            Some(error) => Err(error.clone()),
            None => Ok(page),
        }
    }
}

pub(crate) fn titled_page(title: &str) -> ResultPage {
    let post = PostSummary::new(title).with_field("title", title);
    ResultPage::new(vec![post], 1, 1).expect("valid page")
}

pub(crate) fn listing_page(page: u32) -> ResultPage {
    let first = u64::from(page) * 10;
    let items = vec![PostSummary::new(first), PostSummary::new(first + 1)];
    ResultPage::new(items, page, 3).expect("valid page")
}

#[async_trait]
impl PostFeed for RecordingFeed {
    async fn list(&self, page: u32) -> Result<ResultPage, FetchError> {
        let page = page.max(1);
        let latency = self.list_latency.unwrap_or(self.latency);
        self.answer(FeedCall::List(page), latency, listing_page(page))
            .await
    }

    async fn list_by_keyword(&self, keyword: &str) -> Result<ResultPage, FetchError> {
        self.answer_query(FeedCall::Keyword(keyword.to_string()), keyword)
            .await
    }

    async fn search_by_title(&self, query: &str) -> Result<ResultPage, FetchError> {
        self.answer_query(FeedCall::Title(query.to_string()), query)
            .await
    }
}

#[derive(Default)]
pub(crate) struct CollectingSink {
    outcomes: Mutex<Vec<(String, Result<ResultPage, FetchError>)>>,
}

impl CollectingSink {
    pub(crate) fn outcomes(&self) -> Vec<(String, Result<ResultPage, FetchError>)> {
        self.outcomes.lock().expect("outcomes lock").clone()
    }

    pub(crate) fn queries(&self) -> Vec<String> {
        self.outcomes()
            .into_iter()
            .map(|(query, _)| query)
            .collect()
    }
}

impl SearchSink for CollectingSink {
    fn deliver(&self, query: &str, outcome: Result<ResultPage, FetchError>) {
        self.outcomes
            .lock()
            .expect("outcomes lock")
            .push((query.to_string(), outcome));
    }
}
