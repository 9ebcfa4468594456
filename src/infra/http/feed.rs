use std::time::Instant;

use async_trait::async_trait;
use metrics::{counter, histogram};
use postdeck_api_types::ResultPage;
use reqwest::{Client, Url};
use tracing::{debug, warn};

use crate::application::repos::{FetchError, PostFeed};
use crate::config::ApiSettings;
use crate::infra::error::InfraError;

const METRIC_FEED_REQUEST_TOTAL: &str = "postdeck_feed_request_total";
const METRIC_FEED_REQUEST_MS: &str = "postdeck_feed_request_ms";

const ENDPOINT_LIST: &str = "list";
const ENDPOINT_KEYWORD: &str = "keyword";
const ENDPOINT_TITLE: &str = "title";

/// [`PostFeed`] backed by the blog's `/v1/post` read API.
#[derive(Clone, Debug)]
pub struct HttpPostFeed {
    client: Client,
    base: Url,
}

impl HttpPostFeed {
    pub fn new(settings: &ApiSettings) -> Result<Self, InfraError> {
        let client = Client::builder()
            .user_agent(Self::user_agent())
            .timeout(settings.timeout)
            .build()
            .map_err(|err| {
                InfraError::configuration(format!("failed to build http client: {err}"))
            })?;

        Ok(Self {
            client,
            base: with_trailing_slash(settings.base_url.clone()),
        })
    }

    pub fn user_agent() -> &'static str {
        concat!("postdeck/", env!("CARGO_PKG_VERSION"))
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    fn url(&self, path: &str) -> Result<Url, FetchError> {
        self.base
            .join(path)
            .map_err(|err| FetchError::transport(format!("invalid request url: {err}")))
    }

    async fn fetch(&self, endpoint: &'static str, url: Url) -> Result<ResultPage, FetchError> {
        let started_at = Instant::now();
        let outcome = self.send(url).await;

        let label = match &outcome {
            Ok(_) => "ok",
            Err(FetchError::Transport { .. }) => "transport_failure",
            Err(FetchError::Server { .. }) => "server_failure",
        };
        counter!(METRIC_FEED_REQUEST_TOTAL, "endpoint" => endpoint, "outcome" => label)
            .increment(1);
        histogram!(METRIC_FEED_REQUEST_MS, "endpoint" => endpoint)
            .record(started_at.elapsed().as_secs_f64() * 1000.0);

        match &outcome {
            Ok(page) => debug!(
                endpoint,
                page_number = page.page_number(),
                total_pages = page.total_pages(),
                items = page.items().len(),
                "Fetched result page"
            ),
            Err(err) => warn!(endpoint, error = %err, "Fetch failed"),
        }

        outcome
    }

    async fn send(&self, url: Url) -> Result<ResultPage, FetchError> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(FetchError::transport)?;

        let status = resp.status();
        let bytes = resp.bytes().await.map_err(FetchError::transport)?;
        if !status.is_success() {
            let text = String::from_utf8_lossy(&bytes).into_owned();
            return Err(FetchError::server(status.as_u16(), format!("body {text}")));
        }

        serde_json::from_slice(&bytes).map_err(|err| {
            FetchError::server(status.as_u16(), format!("failed to parse body: {err}"))
        })
    }
}

#[async_trait]
impl PostFeed for HttpPostFeed {
    async fn list(&self, page: u32) -> Result<ResultPage, FetchError> {
        let mut url = self.url("v1/post")?;
        url.query_pairs_mut()
            .append_pair("page", &page.max(1).to_string());
        self.fetch(ENDPOINT_LIST, url).await
    }

    async fn list_by_keyword(&self, keyword: &str) -> Result<ResultPage, FetchError> {
        let mut url = self.url("v1/post/keyword")?;
        url.path_segments_mut()
            .map_err(|()| FetchError::transport("base url cannot carry a path"))?
            .push(keyword);
        self.fetch(ENDPOINT_KEYWORD, url).await
    }

    async fn search_by_title(&self, query: &str) -> Result<ResultPage, FetchError> {
        let mut url = self.url("v1/post/title")?;
        url.query_pairs_mut().append_pair("q", query);
        self.fetch(ENDPOINT_TITLE, url).await
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
