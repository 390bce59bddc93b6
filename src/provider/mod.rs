//! Provider side of the completion protocol.
//!
//! The provider answers three questions about a tool's command line:
//!
//! - **Commands**: which sub-commands exist at the top level
//! - **Arguments**: which values fit the token under the cursor
//! - **Options**: which flags the active sub-command accepts
//!
//! # Architecture
//!
//! - **registry**: declarative spec of a tool's CLI surface (TOML)
//! - **values**: value hints resolving positional candidates
//! - **engine**: `RegistryProvider`, the spec-driven [`CandidateProvider`]
//! - **serve**: the `complete` sub-command harness a tool mounts to expose
//!   the provider over its process boundary
//!
//! # Examples
//!
//! ```no_run
//! use std::time::Duration;
//! use compadre::provider::{CandidateProvider, RegistryProvider, ToolSpec};
//!
//! # async fn demo() -> compadre::error::Result<()> {
//! let spec = ToolSpec::load(std::path::Path::new("specs/redtime.toml"))?;
//! let provider = RegistryProvider::new(spec, Duration::from_millis(200));
//! let commands = provider.list_commands().await;
//! # Ok(())
//! # }
//! ```

mod engine;
pub mod registry;
pub mod serve;
pub mod values;

pub use engine::RegistryProvider;
pub use registry::{ArgSpec, CommandSpec, OptionSpec, SpecEntry, ToolSpec};
pub use serve::CompleteArgs;
pub use values::{ArgContext, StaticValue, ValueHint, ValueResolver};

use async_trait::async_trait;

use crate::protocol::{CommandLine, CompletionResponse};

/// Trait for answering completion requests.
///
/// Every operation is total: syntactically incomplete command lines,
/// unknown sub-commands, and out-of-range cursor indices all yield an
/// empty response, never an error.
#[async_trait]
pub trait CandidateProvider: Send + Sync {
    /// Every top-level sub-command, independent of partial input.
    async fn list_commands(&self) -> CompletionResponse;

    /// Valid completions for the token at the line's cursor index.
    async fn list_arguments(&self, line: &CommandLine) -> CompletionResponse;

    /// Flags of the named sub-command.
    async fn list_options(&self, command: &str) -> CompletionResponse;
}
