//! Application layer: Use cases and services.
//!
//! This module orchestrates domain logic with ports to implement
//! the core use cases of the application.

mod accounts;
mod pipeline;
pub mod report;

pub use accounts::AccountService;
pub use pipeline::PredictionService;
