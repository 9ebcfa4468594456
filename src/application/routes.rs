//! Initial data resolution for the listing routes.

use postdeck_api_types::ResultPage;
use tracing::instrument;

use super::repos::{FetchError, PostFeed};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitialRoute {
    /// `/` and `/page/{page}`.
    Index { page: u32 },
    /// `/keyword/{keyword}`.
    Keyword { keyword: String },
}

impl Default for InitialRoute {
    fn default() -> Self {
        Self::Index { page: 1 }
    }
}

/// Fetch the page a controller for `route` starts from.
#[instrument(skip(feed))]
pub async fn resolve(feed: &dyn PostFeed, route: &InitialRoute) -> Result<ResultPage, FetchError> {
    match route {
        InitialRoute::Index { page } => feed.list(*page).await,
        InitialRoute::Keyword { keyword } => feed.list_by_keyword(keyword).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{FeedCall, RecordingFeed};

    #[tokio::test]
    async fn index_route_lists_requested_page() {
        let feed = RecordingFeed::default();
        let page = resolve(&feed, &InitialRoute::Index { page: 2 })
            .await
            .expect("resolves");

        assert_eq!(page.page_number(), 2);
        assert_eq!(feed.calls(), vec![FeedCall::List(2)]);
    }

    #[tokio::test]
    async fn keyword_route_uses_keyword_listing() {
        let feed = RecordingFeed::default();
        resolve(
            &feed,
            &InitialRoute::Keyword {
                keyword: "rust".into(),
            },
        )
        .await
        .expect("resolves");

        assert_eq!(feed.calls(), vec![FeedCall::Keyword("rust".into())]);
    }

    #[tokio::test]
    async fn resolution_failure_propagates() {
        let feed = RecordingFeed::failing(FetchError::server(404, "no such keyword"));
        let err = resolve(&feed, &InitialRoute::default())
            .await
            .expect_err("fails");
        assert_eq!(err, FetchError::server(404, "no such keyword"));
    }
}
