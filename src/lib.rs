//! # cardiorisk
//!
//! Heart disease risk prediction from ten clinical risk factors.
//!
//! This crate provides:
//! - A linear prediction pipeline (encode, impute, scale, classify, format)
//!   over externally fitted artifacts loaded once at startup
//! - A terminal form for local use (desktop variant)
//! - An HTTP front-end with a flat-file user registry (web variant)
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core types (clinical inputs, feature vector, predictions, users)
//! - `ports`: Trait definitions for preprocessing, classification and user storage
//! - `adapters`: Concrete implementations (JSON artifacts, JSON user file, log sanitizer)
//! - `application`: Use cases orchestrating domain and ports
//! - `tui`: Terminal user interface
//! - `web`: HTTP routes and pages

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod logging;
pub mod ports;
pub mod tui;
pub mod web;

pub use domain::{ClinicalInputs, FeatureVector, PredictionResult, UserRecord};

/// Result type for cardiorisk operations
pub type Result<T> = std::result::Result<T, CardioError>;

/// Main error type for cardiorisk
#[derive(Debug, thiserror::Error)]
pub enum CardioError {
    /// A field is missing, unparseable, or outside its accepted values.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A fitted imputer/scaler rejected the vector.
    #[error("Preprocessing failed: {0}")]
    Preprocessing(String),

    /// A fitted model rejected the vector.
    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Username already exists. Please try a different one.")]
    DuplicateUsername,

    #[error("Invalid credentials. Please try again.")]
    InvalidCredentials,

    #[error("Storage operation failed: {0}")]
    Storage(#[from] adapters::StorageError),

    #[error("Artifact error: {0}")]
    Artifact(#[from] adapters::ArtifactError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CardioError {
    /// Whether the error was caused by the caller's input rather than the deployment.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput(_) | Self::DuplicateUsername | Self::InvalidCredentials
        )
    }
}
