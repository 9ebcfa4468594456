//! Shared response types for the blog read API.
//!
//! The content service owns the shape of a post; these types only pin down the
//! pagination envelope and the identifier, passing every other field through.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Identifier of a post as issued by the content service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PostId {
    Numeric(u64),
    Text(String),
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostId::Numeric(value) => write!(f, "{value}"),
            PostId::Text(value) => f.write_str(value),
        }
    }
}

impl From<u64> for PostId {
    fn from(value: u64) -> Self {
        Self::Numeric(value)
    }
}

impl From<&str> for PostId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// One post as returned in a listing. Everything except `id` is opaque.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostSummary {
    pub id: PostId,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl PostSummary {
    pub fn new(id: impl Into<PostId>) -> Self {
        Self {
            id: id.into(),
            fields: Map::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn title(&self) -> Option<&str> {
        self.fields.get("title").and_then(Value::as_str)
    }

    /// Title when present, otherwise the identifier.
    pub fn label(&self) -> String {
        match self.title() {
            Some(title) if !title.trim().is_empty() => title.to_string(),
            _ => format!("#{}", self.id),
        }
    }
}

/// Largest `totalPages` a page may claim.
pub const MAX_TOTAL_PAGES: u32 = 10_000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResultPageError {
    #[error("pageNumber must be at least 1")]
    ZeroPageNumber,
    #[error("totalPages {0} exceeds the limit of {MAX_TOTAL_PAGES}")]
    TooManyPages(u32),
}

/// One page of listing or search results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawResultPage")]
pub struct ResultPage {
    items: Vec<PostSummary>,
    page_number: u32,
    total_pages: u32,
}

impl ResultPage {
    pub fn new(
        items: Vec<PostSummary>,
        page_number: u32,
        total_pages: u32,
    ) -> Result<Self, ResultPageError> {
        if page_number == 0 {
            return Err(ResultPageError::ZeroPageNumber);
        }
        if total_pages > MAX_TOTAL_PAGES {
            return Err(ResultPageError::TooManyPages(total_pages));
        }
        Ok(Self {
            items,
            page_number,
            total_pages,
        })
    }

    /// First page with no posts.
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            page_number: 1,
            total_pages: 0,
        }
    }

    pub fn items(&self) -> &[PostSummary] {
        &self.items
    }

    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn into_parts(self) -> (Vec<PostSummary>, u32, u32) {
        (self.items, self.page_number, self.total_pages)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawResultPage {
    #[serde(default)]
    items: Vec<PostSummary>,
    page_number: u32,
    total_pages: u32,
}

impl TryFrom<RawResultPage> for ResultPage {
    type Error = ResultPageError;

    fn try_from(raw: RawResultPage) -> Result<Self, Self::Error> {
        ResultPage::new(raw.items, raw.page_number, raw.total_pages)
    }
}
