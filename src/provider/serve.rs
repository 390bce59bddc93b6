//! The `complete` sub-command harness.
//!
//! Tools expose their provider over the process boundary by mounting
//! [`CompleteArgs`] under a `complete` sub-command:
//!
//! | Invocation | Meaning |
//! |---|---|
//! | `tool complete` | list top-level commands |
//! | `tool complete --nth <N> -- <tokens...>` | argument completions for token index N |
//! | `tool complete --options -- <cmd>` | options of sub-command `<cmd>` |
//!
//! Candidates go to stdout one per line in wire format. "No candidates" is
//! an empty stdout with exit status 0; the exit status never encodes
//! completion results.

use clap::Args;
use tracing::debug;

use crate::protocol::{CandidateKind, CommandLine, CompletionResponse, wire};
use crate::provider::CandidateProvider;

/// Arguments of the `complete` sub-command.
///
/// Embed with `#[command(subcommand)]` in a clap CLI:
///
/// ```no_run
/// use clap::{Parser, Subcommand};
/// use compadre::provider::CompleteArgs;
///
/// #[derive(Parser)]
/// struct Cli {
///     #[command(subcommand)]
///     command: Commands,
/// }
///
/// #[derive(Subcommand)]
/// enum Commands {
///     /// Show completion candidates for a command line
///     Complete(CompleteArgs),
/// }
/// ```
#[derive(Debug, Clone, Args)]
pub struct CompleteArgs {
    /// Complete the token at this index (0 is the tool name)
    #[arg(long, value_name = "N")]
    pub nth: Option<usize>,

    /// List options of a sub-command instead of argument values
    #[arg(long)]
    pub options: bool,

    /// The command line typed so far
    #[arg(last = true, value_name = "TOKENS")]
    pub tokens: Vec<String>,
}

impl CompleteArgs {
    /// Build a commands request (bare `complete`).
    pub fn commands() -> Self {
        Self {
            nth: None,
            options: false,
            tokens: Vec::new(),
        }
    }

    /// Build an arguments request for the token at `nth`.
    pub fn arguments(nth: usize, tokens: Vec<String>) -> Self {
        Self {
            nth: Some(nth),
            options: false,
            tokens,
        }
    }

    /// Build an options request for one sub-command.
    pub fn options_of(command: impl Into<String>) -> Self {
        Self {
            nth: None,
            options: true,
            tokens: vec![command.into()],
        }
    }
}

/// Answer a `complete` invocation.
///
/// Every input shape yields a well-formed response; a request that maps to
/// nothing (no sub-command for `--options`, tokens without `--nth`) is an
/// empty response, not an error.
pub async fn respond<P: CandidateProvider>(
    provider: &P,
    args: &CompleteArgs,
) -> CompletionResponse {
    if args.options {
        // The options form passes the sub-command as the only token.
        return match args.tokens.first() {
            Some(command) => provider.list_options(command).await,
            None => CompletionResponse::empty(CandidateKind::Option),
        };
    }

    if let Some(nth) = args.nth {
        let line = CommandLine::new(args.tokens.clone(), nth);
        return provider.list_arguments(&line).await;
    }

    if args.tokens.is_empty() {
        return provider.list_commands().await;
    }

    // Tokens without --nth or --options: the legacy provider exited 1
    // here; this one degrades to an empty response.
    debug!(tokens = ?args.tokens, "complete called with tokens but no mode flag");
    CompletionResponse::empty(CandidateKind::Argument)
}

/// Render a response as provider stdout.
pub fn render(response: &CompletionResponse) -> String {
    wire::encode_stream(response.candidates())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{RegistryProvider, ToolSpec};
    use clap::Parser;
    use std::time::Duration;

    const REDTIME_SPEC: &str = include_str!("../../specs/redtime.toml");

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        complete: CompleteArgs,
    }

    fn provider() -> RegistryProvider {
        let spec = ToolSpec::from_toml_str(REDTIME_SPEC, "redtime.toml").unwrap();
        RegistryProvider::new(spec, Duration::from_millis(200))
    }

    #[test]
    fn test_parse_commands_form() {
        let cli = TestCli::try_parse_from(["redtime-complete"]).unwrap();
        assert_eq!(cli.complete.nth, None);
        assert!(!cli.complete.options);
        assert!(cli.complete.tokens.is_empty());
    }

    #[test]
    fn test_parse_arguments_form() {
        let cli =
            TestCli::try_parse_from(["redtime-complete", "--nth", "2", "--", "redtime", "log"])
                .unwrap();
        assert_eq!(cli.complete.nth, Some(2));
        assert_eq!(cli.complete.tokens, ["redtime", "log"]);
    }

    #[test]
    fn test_parse_options_form() {
        let cli = TestCli::try_parse_from(["redtime-complete", "--options", "--", "log"]).unwrap();
        assert!(cli.complete.options);
        assert_eq!(cli.complete.tokens, ["log"]);
    }

    #[test]
    fn test_dashed_tokens_survive_the_separator() {
        let cli = TestCli::try_parse_from([
            "redtime-complete",
            "--nth",
            "4",
            "--",
            "redtime",
            "log",
            "--date",
            "2026-08-08",
        ])
        .unwrap();
        assert_eq!(cli.complete.tokens[2], "--date");
    }

    #[tokio::test]
    async fn test_respond_commands() {
        let response = respond(&provider(), &CompleteArgs::commands()).await;
        assert_eq!(response.kind(), CandidateKind::Command);
        assert_eq!(response.candidates()[0].value, "log");
    }

    #[tokio::test]
    async fn test_respond_options() {
        let response = respond(&provider(), &CompleteArgs::options_of("overview")).await;
        let values: Vec<_> = response
            .candidates()
            .iter()
            .map(|c| c.value.as_str())
            .collect();
        assert_eq!(values, ["--from-date", "--to-date", "--limit", "--offset"]);
    }

    #[tokio::test]
    async fn test_respond_arguments_static_slot() {
        let tokens = vec![
            "redtime".to_string(),
            "log".to_string(),
            "Website:42".to_string(),
            "13".to_string(),
            "dev".to_string(),
        ];
        // Token 5 is the hours slot.
        let response = respond(&provider(), &CompleteArgs::arguments(5, tokens)).await;
        let values: Vec<_> = response
            .candidates()
            .iter()
            .map(|c| c.value.as_str())
            .collect();
        assert_eq!(values, ["2", "4", "6", "8"]);
    }

    #[tokio::test]
    async fn test_respond_tokens_without_mode_is_empty() {
        let args = CompleteArgs {
            nth: None,
            options: false,
            tokens: vec!["redtime".to_string(), "log".to_string()],
        };
        let response = respond(&provider(), &args).await;
        assert!(response.is_empty());
    }

    #[tokio::test]
    async fn test_respond_options_without_command_is_empty() {
        let args = CompleteArgs {
            nth: None,
            options: true,
            tokens: Vec::new(),
        };
        let response = respond(&provider(), &args).await;
        assert!(response.is_empty());
    }

    #[tokio::test]
    async fn test_render_wire_lines() {
        let response = respond(&provider(), &CompleteArgs::options_of("overview")).await;
        let out = render(&response);
        assert!(out.starts_with("--from-date:First day of the overview\n"));
        assert!(out.ends_with("\n"));
    }
}
