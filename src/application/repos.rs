//! Read-side port onto the remote content service.

use async_trait::async_trait;
use postdeck_api_types::ResultPage;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("transport failure: {message}")]
    Transport { message: String },
    #[error("server failure (status {status}): {message}")]
    Server { status: u16, message: String },
}

impl FetchError {
    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self::Transport {
            message: err.to_string(),
        }
    }

    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server {
            status,
            message: message.into(),
        }
    }
}

/// Paginated and filtered reads of post summaries.
///
/// Implementations do not cache or retry; every failure reaches the caller.
#[async_trait]
pub trait PostFeed: Send + Sync {
    /// Page `page` of the default listing. Page `0` means the first page.
    async fn list(&self, page: u32) -> Result<ResultPage, FetchError>;

    async fn list_by_keyword(&self, keyword: &str) -> Result<ResultPage, FetchError>;

    async fn search_by_title(&self, query: &str) -> Result<ResultPage, FetchError>;
}
