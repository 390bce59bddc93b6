//! Compadre Completion Library
//!
//! This library implements both sides of a line-oriented tab-completion
//! protocol between a host shell and a command-line tool. It can be used as
//! a standalone library to add protocol-compatible completion to any tool.
//!
//! # Modules
//!
//! - `adapter`: shell-side client (subprocess transport, channels, fail-open)
//! - `cli`: command-line interface and shell script generation
//! - `config`: configuration management
//! - `error`: error types and handling
//! - `protocol`: request/response types and the wire format
//! - `provider`: tool-side candidate generation from declarative specs
//!
//! # Example
//!
//! ```no_run
//! use compadre::adapter::{CompletionAdapter, SubprocessTransport};
//! use compadre::protocol::CommandLine;
//!
//! #[tokio::main]
//! async fn main() {
//!     let adapter = CompletionAdapter::new(SubprocessTransport::new("redtime"));
//!
//!     let line = CommandLine::new(vec!["redtime".into(), "log".into()], 2);
//!     let channels = adapter.on_subcommand_completion(&line).await;
//!
//!     for candidate in &channels.arguments {
//!         println!("{}", candidate.value);
//!     }
//! }
//! ```

pub mod adapter;
pub mod cli;
pub mod config;
pub mod error;
pub mod protocol;
pub mod provider;

// Re-export commonly used types
pub use adapter::{ChannelSet, CompletionAdapter, InProcessTransport, SubprocessTransport};
pub use config::Config;
pub use error::{CompadreError, Result};
pub use protocol::{Candidate, CandidateKind, CommandLine, CompletionRequest, CompletionResponse};
pub use provider::{CandidateProvider, CompleteArgs, RegistryProvider, ToolSpec};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library version string
///
/// # Returns
/// * `&str` - Version string
pub fn version() -> &'static str {
    VERSION
}
