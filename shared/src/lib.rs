//! Shared types and models for the Crop Risk Advisory Platform
//!
//! This crate contains the pure domain layer: weather records and series,
//! crop stage documents, the deterministic risk formulas, and input
//! validation helpers. It performs no IO.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
