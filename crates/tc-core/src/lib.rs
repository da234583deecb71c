//! tc-core: shared types, IDs, errors, configuration, and library models.
//!
//! This crate is the foundational dependency for all other tc-* crates,
//! providing type-safe identifiers, a unified error type, the music library
//! domain model, and application configuration.

pub mod config;
pub mod error;
pub mod ids;
pub mod library;

// Re-export the most commonly used items at the crate root.
pub use error::{Error, Result};
pub use ids::*;
pub use library::*;
