//! Domain layer types and invariants.

pub mod view_state;
