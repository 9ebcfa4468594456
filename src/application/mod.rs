//! Application services layer.

pub mod controller;
pub mod error;
mod lock;
pub mod repos;
pub mod routes;
pub mod search;

#[cfg(test)]
pub(crate) mod testing;
