//! buildscan Core - Model Types
//!
//! Value types produced by the build-script extractor: coordinates,
//! configurations, repository and dependency declarations, diagnostics and
//! the errors and configuration shared by every consumer of the model.
//! This crate contains no parser - see `buildscan-dsl` for that.

pub mod config;
pub mod diagnostic;
pub mod entities;
pub mod enums;
pub mod error;
pub mod filter;

pub use config::*;
pub use diagnostic::*;
pub use entities::*;
pub use enums::*;
pub use error::*;
pub use filter::*;
