//! Post listing, debounced search and view state for a personal technical blog.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
pub mod presentation;
