//! Adapter side of the completion protocol.
//!
//! The adapter bridges a host shell's completion request to a provider and
//! renders the answer into the shell's two presentation channels:
//!
//! - **arguments**: sub-commands and positional values
//! - **options**: `-`/`--` flags, which the host matches dash-aware
//!
//! Its one hard rule is to fail open: a provider that is missing, crashing,
//! slow, or talking garbage contributes zero candidates and nothing else.
//! The user is mid-keystroke; no error is ever worth showing there.
//!
//! # Examples
//!
//! ```no_run
//! use compadre::adapter::{CompletionAdapter, SubprocessTransport};
//! use compadre::protocol::CommandLine;
//!
//! # async fn demo() {
//! let transport = SubprocessTransport::new("redtime");
//! let adapter = CompletionAdapter::new(transport);
//!
//! let line = CommandLine::new(vec!["redtime".into(), "log".into()], 2);
//! let channels = adapter.on_subcommand_completion(&line).await;
//! # }
//! ```

pub mod transport;


pub use transport::{DEFAULT_TIMEOUT, InProcessTransport, ProviderTransport, SubprocessTransport};

use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;

use crate::config::AdapterConfig;
use crate::error::ProviderError;
use crate::protocol::{Candidate, CandidateKind, CommandLine, CompletionRequest};

/// Presentation-side behavior knobs.
#[derive(Debug, Clone)]
pub struct AdapterSettings {
    /// Always offer a static `--help` entry at the top level.
    pub inject_help: bool,

    /// Drop duplicate candidates, keeping the first occurrence.
    pub dedup: bool,
}

impl Default for AdapterSettings {
    fn default() -> Self {
        Self {
            inject_help: true,
            dedup: true,
        }
    }
}

impl From<&AdapterConfig> for AdapterSettings {
    fn from(config: &AdapterConfig) -> Self {
        Self {
            inject_help: config.inject_help,
            dedup: config.dedup,
        }
    }
}

/// The two presentation channels handed to the host shell.
///
/// At the top level the `arguments` channel carries sub-commands; after a
/// sub-command it carries positional values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelSet {
    /// Commands and positional values.
    pub arguments: Vec<Candidate>,

    /// Dash-prefixed flags.
    pub options: Vec<Candidate>,
}

impl ChannelSet {
    /// Whether both channels are empty.
    pub fn is_empty(&self) -> bool {
        self.arguments.is_empty() && self.options.is_empty()
    }
}

/// Stateless bridge between a host shell and one completion provider.
///
/// Each invocation is a pure request/response round-trip keyed only on the
/// command line snapshot; nothing survives between keystrokes.
pub struct CompletionAdapter<T> {
    transport: T,
    settings: AdapterSettings,
}

impl<T: ProviderTransport> CompletionAdapter<T> {
    /// Create an adapter with default settings.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            settings: AdapterSettings::default(),
        }
    }

    /// Create an adapter with explicit settings.
    pub fn with_settings(transport: T, settings: AdapterSettings) -> Self {
        Self {
            transport,
            settings,
        }
    }

    /// Completion for the first token: which sub-command to run.
    ///
    /// The commands land in the arguments channel in provider order; the
    /// shell applies its own prefix matching. The options channel carries
    /// the static `--help` fallback so something is offered even when the
    /// provider is entirely unreachable.
    pub async fn on_command_completion(&self, line: &CommandLine) -> ChannelSet {
        let request = CompletionRequest::commands(line.clone());
        let commands = self.fetch_open(&request).await;

        let mut options = Vec::new();
        if self.settings.inject_help {
            options.push(Candidate::described(
                "--help",
                "Show help",
                CandidateKind::Option,
            ));
        }

        ChannelSet {
            arguments: self.present(commands, CandidateKind::Command),
            options,
        }
    }

    /// Completion for any token after the first.
    ///
    /// Issues the arguments and options requests concurrently; they are
    /// independent and merge only at render time. Either half failing
    /// leaves the other untouched.
    pub async fn on_subcommand_completion(&self, line: &CommandLine) -> ChannelSet {
        let arguments_request = CompletionRequest::arguments(line.clone());
        let options_request = CompletionRequest::options(line.clone());

        let (arguments, options) = futures::join!(
            self.fetch_open(&arguments_request),
            self.fetch_open(&options_request),
        );

        ChannelSet {
            arguments: self.present(arguments, CandidateKind::Argument),
            options: self.present(options, CandidateKind::Option),
        }
    }

    /// One provider call under the fail-open policy.
    ///
    /// This is the single code path where provider failures vanish; every
    /// [`ProviderError`] kind becomes an empty contribution, logged at
    /// debug level only.
    async fn fetch_open(&self, request: &CompletionRequest) -> Vec<Candidate> {
        match self.transport.fetch(request).await {
            Ok(candidates) => candidates,
            Err(e) => {
                absorb(&e);
                Vec::new()
            }
        }
    }

    /// Prepare one channel: enforce kind isolation, then deduplicate.
    fn present(&self, candidates: Vec<Candidate>, kind: CandidateKind) -> Vec<Candidate> {
        let mut seen = HashSet::new();
        candidates
            .into_iter()
            .filter(|c| c.kind == kind)
            .filter(|c| !self.settings.dedup || seen.insert(c.value.clone()))
            .collect()
    }
}

/// Swallow one provider failure.
fn absorb(error: &ProviderError) {
    debug!(error = %error, "provider call failed, contributing no candidates");
}
