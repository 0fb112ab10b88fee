//! Adapters layer: Concrete implementations of ports.
//!
//! - `artifacts`: JSON exports of the fitted imputer, scaler and models
//! - `holdout`: held-out feature table for test sampling
//! - `json_store`: flat-file user registry
//! - `sanitize`: credential filtering for logs

pub mod artifacts;
pub mod holdout;
pub mod json_store;
pub mod sanitize;

pub use artifacts::{ArtifactBundle, ArtifactError};
pub use holdout::HoldoutTable;
pub use json_store::{JsonUserStore, StorageError};
