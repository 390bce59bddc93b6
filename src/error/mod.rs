//! Error handling module for compadre.
//!
//! This module provides error handling for the completion protocol with:
//! - A single top-level error type wrapping per-domain kinds
//! - An explicit taxonomy of provider failures (spawn, exit status, timeout,
//!   undecodable output) that the adapter absorbs per the fail-open policy
//! - A crate-wide `Result` alias
//!
//! # Example
//!
//! ```rust,no_run
//! use compadre::error::{Result, CompadreError, ProviderError};
//!
//! fn example_operation() -> Result<()> {
//!     // Provider failures convert into the top-level error type
//!     Err(CompadreError::Provider(ProviderError::Timeout(200)))
//! }
//! ```

pub mod kinds;

// Re-export commonly used types
pub use kinds::{CompadreError, ConfigError, ProviderError, RegistryError, Result};
