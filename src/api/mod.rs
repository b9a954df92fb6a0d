//! HTTP boundary helpers (feature `axum`).

mod types;

pub use types::*;

pub mod axum;
