use askama::{Error as AskamaError, Template};
use thiserror::Error;

use crate::domain::view_state::ViewState;

#[derive(Debug, Error)]
#[error("{public_message}")]
pub struct TemplateRenderError {
    pub(crate) source: &'static str,
    pub(crate) public_message: &'static str,
    #[source]
    pub(crate) error: AskamaError,
}

impl TemplateRenderError {
    pub fn new(source: &'static str, public_message: &'static str, error: AskamaError) -> Self {
        Self {
            source,
            public_message,
            error,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PostLine {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone, Copy)]
pub struct PageLink {
    pub number: u32,
    pub current: bool,
}

/// Plain-text listing: one line per post, then the pagination bar.
#[derive(Template)]
#[template(path = "post_list.txt")]
pub struct PostListView {
    pub heading: String,
    pub posts: Vec<PostLine>,
    pub pages: Vec<PageLink>,
    pub show_pagination: bool,
}

impl PostListView {
    pub fn new(heading: impl Into<String>, state: &ViewState) -> Self {
        let posts = state
            .items
            .iter()
            .map(|post| PostLine {
                id: post.id.to_string(),
                label: post.label(),
            })
            .collect();
        let pages = state
            .page_numbers
            .iter()
            .map(|&number| PageLink {
                number,
                current: number == state.page_number,
            })
            .collect();

        Self {
            heading: heading.into(),
            posts,
            pages,
            show_pagination: state.can_show_pagination,
        }
    }
}

pub fn render_template<T: Template>(template: T) -> Result<String, TemplateRenderError> {
    template.render().map_err(|err| {
        TemplateRenderError::new(
            "presentation::views::render_template",
            "Template rendering failed",
            err,
        )
    })
}

pub fn render_listing(heading: &str, state: &ViewState) -> Result<String, TemplateRenderError> {
    render_template(PostListView::new(heading, state))
}
