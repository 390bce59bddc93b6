//! Transports carrying completion requests to a provider.
//!
//! [`SubprocessTransport`] is the protocol's canonical form: a fresh
//! provider process per request, a short deadline, stderr discarded. No
//! connection, no shared state, nothing to lock. [`InProcessTransport`]
//! serves tools that embed both sides in one binary, and test code.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, trace};

use crate::error::ProviderError;
use crate::protocol::{Candidate, CommandLine, CompletionRequest, RequestKind, wire};
use crate::provider::CandidateProvider;

/// Default deadline for one provider round-trip.
///
/// The adapter blocks the user's keystroke while waiting, so the budget is
/// a subprocess spawn plus local computation, nothing more.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(200);

/// Carries one completion request to a provider and returns its candidates.
#[async_trait]
pub trait ProviderTransport: Send + Sync {
    /// Execute one request/response round-trip.
    async fn fetch(&self, request: &CompletionRequest) -> Result<Vec<Candidate>, ProviderError>;
}

/// Spawns `<program> complete ...` per request.
pub struct SubprocessTransport {
    program: PathBuf,
    timeout: Duration,
}

impl SubprocessTransport {
    /// Create a transport for the given provider program.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the round-trip deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Arguments of the `complete` invocation for one request.
    ///
    /// Returns `None` when the request cannot be expressed (an options
    /// request with no sub-command on the line): there is nothing to ask,
    /// which is an empty response rather than an error.
    fn build_args(request: &CompletionRequest) -> Option<Vec<String>> {
        let mut args = vec!["complete".to_string()];

        match &request.kind {
            RequestKind::Commands => {}
            RequestKind::ArgumentsAt(nth) => {
                args.push("--nth".to_string());
                args.push(nth.to_string());
                args.push("--".to_string());
                args.extend(request.line.tokens().iter().cloned());
            }
            RequestKind::Options => {
                let command = request.line.subcommand()?;
                args.push("--options".to_string());
                args.push("--".to_string());
                args.push(command.to_string());
            }
        }

        Some(args)
    }
}

#[async_trait]
impl ProviderTransport for SubprocessTransport {
    async fn fetch(&self, request: &CompletionRequest) -> Result<Vec<Candidate>, ProviderError> {
        let Some(args) = Self::build_args(request) else {
            return Ok(Vec::new());
        };

        trace!(program = %self.program.display(), ?args, "spawning completion provider");

        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output();

        let output = match tokio::time::timeout(self.timeout, output).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(ProviderError::Unavailable(format!(
                    "{}: {e}",
                    self.program.display()
                )));
            }
            Err(_) => {
                return Err(ProviderError::Timeout(self.timeout.as_millis() as u64));
            }
        };

        if !output.status.success() {
            // A failed provider's stdout is discarded wholesale so a crash
            // cannot leak partial candidates into the display.
            return Err(ProviderError::NonZeroExit(output.status.code()));
        }

        Ok(wire::decode_stream(&output.stdout, request.expected_kind()))
    }
}

/// Calls a [`CandidateProvider`] directly, no process boundary.
pub struct InProcessTransport<P> {
    provider: P,
}

impl<P: CandidateProvider> InProcessTransport<P> {
    /// Wrap a provider.
    pub fn new(provider: P) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<P: CandidateProvider> ProviderTransport for InProcessTransport<P> {
    async fn fetch(&self, request: &CompletionRequest) -> Result<Vec<Candidate>, ProviderError> {
        let response = match &request.kind {
            RequestKind::Commands => self.provider.list_commands().await,
            RequestKind::ArgumentsAt(nth) => {
                let line = if *nth == request.line.cursor() {
                    request.line.clone()
                } else {
                    CommandLine::new(request.line.tokens().to_vec(), *nth)
                };
                self.provider.list_arguments(&line).await
            }
            RequestKind::Options => match request.line.subcommand() {
                Some(command) => self.provider.list_options(command).await,
                None => {
                    debug!("options request without a sub-command");
                    return Ok(Vec::new());
                }
            },
        };

        Ok(response.into_candidates())
    }
}
