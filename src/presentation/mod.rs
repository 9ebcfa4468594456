//! Text rendering of the listing state.

pub mod views;
