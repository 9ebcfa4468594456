//! HTTP adapters for the blog read API.

mod feed;

pub use feed::HttpPostFeed;
