//! Ports layer: Trait definitions for external operations.
//!
//! Following Hexagonal Architecture, these traits define the boundaries
//! between the application and external systems (fitted artifacts, storage).

mod classifier;
mod preprocess;
mod user_registry;

pub use classifier::Classifier;
pub use preprocess::Preprocessor;
pub use user_registry::UserRegistry;
