//! Displayed listing state and the single transition that produces it.

use postdeck_api_types::{PostSummary, ResultPage};

/// Snapshot read by renderers. Built only from a complete [`ResultPage`].
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub items: Vec<PostSummary>,
    pub page_number: u32,
    pub total_pages: u32,
    pub can_show_pagination: bool,
    pub page_numbers: Vec<u32>,
}

impl ViewState {
    /// Derive every field from `page` at once. Prior items are never merged in.
    pub fn from_page(page: ResultPage) -> Self {
        let (items, page_number, total_pages) = page.into_parts();
        Self {
            items,
            page_number,
            total_pages,
            can_show_pagination: can_show_pagination(total_pages),
            page_numbers: page_numbers(total_pages),
        }
    }
}

impl From<ResultPage> for ViewState {
    fn from(page: ResultPage) -> Self {
        Self::from_page(page)
    }
}

pub fn can_show_pagination(total_pages: u32) -> bool {
    total_pages > 1
}

pub fn page_numbers(total_pages: u32) -> Vec<u32> {
    (1..=total_pages).collect()
}
