//! Shared types and models for the irrigation telemetry dashboard
//!
//! This crate contains types shared between the dashboard server, the
//! browser helpers (via WASM), and the tests of both.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
