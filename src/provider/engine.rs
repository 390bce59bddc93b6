//! Spec-driven candidate provider.
//!
//! Walks the command line the way the tool's own parser would: token 1
//! selects the sub-command, dashed tokens and the value token of
//! value-taking options are skipped, and the remaining tokens map onto
//! positional slots in order. The slot under the cursor decides which value
//! hint is resolved.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, trace};

use crate::protocol::{Candidate, CandidateKind, CommandLine, CompletionResponse};
use crate::provider::CandidateProvider;
use crate::provider::registry::{CommandSpec, ToolSpec};
use crate::provider::values::{ArgContext, ValueResolver};

/// [`CandidateProvider`] backed by a [`ToolSpec`].
pub struct RegistryProvider {
    spec: ToolSpec,
    resolver: ValueResolver,
}

impl RegistryProvider {
    /// Create a provider for one tool spec.
    ///
    /// # Arguments
    /// * `spec` - The tool's completion spec
    /// * `exec_timeout` - Deadline for exec value sources
    pub fn new(spec: ToolSpec, exec_timeout: Duration) -> Self {
        Self {
            spec,
            resolver: ValueResolver::new(exec_timeout),
        }
    }

    /// The tool this provider serves.
    pub fn tool_name(&self) -> &str {
        &self.spec.name
    }

    /// Locate the positional slot under the cursor.
    ///
    /// Returns the slot index plus the positional values typed before it.
    /// Dashed tokens are treated as options of the active sub-command; a
    /// value-taking option also consumes the following token. Unknown
    /// dashed tokens count as plain flags.
    fn positional_slot(command: &CommandSpec, line: &CommandLine) -> (usize, ArgContext) {
        let tokens = line.tokens();
        let end = line.cursor().min(tokens.len());

        let mut slot = 0usize;
        let mut context = ArgContext::new();
        let mut skip_value = false;

        for token in &tokens[2.min(end)..end] {
            if skip_value {
                skip_value = false;
                continue;
            }

            if token.starts_with('-') && token.len() > 1 {
                // `--flag=value` carries its value inline and consumes
                // nothing further.
                if !token.contains('=') {
                    if let Some(opt) = command.options.iter().find(|o| o.matches(token)) {
                        skip_value = opt.takes_value;
                    }
                }
                continue;
            }

            if let Some(arg) = command.args.get(slot) {
                context.insert(arg.name.clone(), token.clone());
            }
            slot += 1;
        }

        (slot, context)
    }
}

#[async_trait]
impl CandidateProvider for RegistryProvider {
    async fn list_commands(&self) -> CompletionResponse {
        let candidates = self
            .spec
            .commands
            .iter()
            .map(|command| Candidate {
                value: command.name.clone(),
                description: command.summary.clone(),
                kind: CandidateKind::Command,
            })
            .collect();

        CompletionResponse::commands(candidates)
    }

    async fn list_arguments(&self, line: &CommandLine) -> CompletionResponse {
        if line.at_command_position() {
            // The first token is the sub-command itself; that family is
            // served by list_commands.
            return CompletionResponse::empty(CandidateKind::Argument);
        }

        let Some(command) = line.subcommand().and_then(|name| self.spec.command(name)) else {
            debug!(tool = %self.spec.name, subcommand = ?line.subcommand(),
                "unknown sub-command, no argument candidates");
            return CompletionResponse::empty(CandidateKind::Argument);
        };

        let (slot, context) = Self::positional_slot(command, line);
        let Some(arg) = command.args.get(slot) else {
            trace!(command = %command.name, slot, "cursor past the last positional");
            return CompletionResponse::empty(CandidateKind::Argument);
        };

        let mut candidates = self
            .resolver
            .resolve(&arg.complete, &arg.name, &context)
            .await;

        if let Some(prefix) = line.current_prefix()
            && !prefix.is_empty()
        {
            candidates.retain(|c| c.value.starts_with(prefix));
        }

        CompletionResponse::arguments(candidates)
    }

    async fn list_options(&self, command: &str) -> CompletionResponse {
        let Some(command) = self.spec.command(command) else {
            return CompletionResponse::empty(CandidateKind::Option);
        };

        let mut candidates = Vec::new();
        for option in &command.options {
            for flag in option.flags() {
                candidates.push(Candidate {
                    value: flag.to_string(),
                    description: option.summary.clone(),
                    kind: CandidateKind::Option,
                });
            }
        }

        CompletionResponse::options(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::values::{StaticValue, ValueHint};
    use crate::provider::registry::{ArgSpec, OptionSpec};

    const REDTIME_SPEC: &str = include_str!("../../specs/redtime.toml");

    fn redtime_provider() -> RegistryProvider {
        let spec = ToolSpec::from_toml_str(REDTIME_SPEC, "redtime.toml").unwrap();
        RegistryProvider::new(spec, Duration::from_millis(200))
    }

    fn demo_provider() -> RegistryProvider {
        let spec = ToolSpec {
            name: "demo".to_string(),
            summary: None,
            commands: vec![CommandSpec {
                name: "log".to_string(),
                summary: Some("Log spent time".to_string()),
                args: vec![
                    ArgSpec {
                        name: "project".to_string(),
                        summary: None,
                        complete: ValueHint::Static {
                            values: vec![
                                StaticValue {
                                    value: "website".to_string(),
                                    description: None,
                                },
                                StaticValue {
                                    value: "backend".to_string(),
                                    description: None,
                                },
                            ],
                        },
                    },
                    ArgSpec {
                        name: "date".to_string(),
                        summary: None,
                        complete: ValueHint::Today,
                    },
                ],
                options: vec![OptionSpec {
                    long: "--date".to_string(),
                    short: Some("-d".to_string()),
                    summary: Some("Date the time was spent on".to_string()),
                    takes_value: true,
                }],
            }],
        };
        RegistryProvider::new(spec, Duration::from_millis(200))
    }

    fn line(tokens: &[&str], cursor: usize) -> CommandLine {
        CommandLine::new(tokens.iter().map(|t| t.to_string()).collect(), cursor)
    }

    #[tokio::test]
    async fn test_list_commands_in_spec_order() {
        let provider = redtime_provider();
        let response = provider.list_commands().await;
        let values: Vec<_> = response
            .candidates()
            .iter()
            .map(|c| c.value.as_str())
            .collect();
        assert_eq!(
            values,
            [
                "log",
                "log_entry",
                "projects",
                "issues",
                "activities",
                "overview",
                "configure",
                "complete"
            ]
        );
        assert_eq!(response.kind(), CandidateKind::Command);
    }

    #[tokio::test]
    async fn test_list_commands_carry_summaries() {
        let provider = redtime_provider();
        let response = provider.list_commands().await;
        let log = &response.candidates()[0];
        assert_eq!(
            log.description.as_deref(),
            Some("Log spent time against a project or issue")
        );
    }

    #[tokio::test]
    async fn test_list_options_emits_each_spelling() {
        let provider = demo_provider();
        let response = provider.list_options("log").await;
        let values: Vec<_> = response
            .candidates()
            .iter()
            .map(|c| c.value.as_str())
            .collect();
        assert_eq!(values, ["--date", "-d"]);
        assert!(
            response
                .candidates()
                .iter()
                .all(|c| c.description.as_deref() == Some("Date the time was spent on"))
        );
    }

    #[tokio::test]
    async fn test_list_options_unknown_command_is_empty() {
        let provider = redtime_provider();
        let response = provider.list_options("teleport").await;
        assert!(response.is_empty());
    }

    #[tokio::test]
    async fn test_first_positional() {
        let provider = demo_provider();
        let response = provider.list_arguments(&line(&["demo", "log"], 2)).await;
        let values: Vec<_> = response
            .candidates()
            .iter()
            .map(|c| c.value.as_str())
            .collect();
        assert_eq!(values, ["website", "backend"]);
    }

    #[tokio::test]
    async fn test_prefix_filter() {
        let provider = demo_provider();
        let response = provider
            .list_arguments(&line(&["demo", "log", "web"], 2))
            .await;
        let values: Vec<_> = response
            .candidates()
            .iter()
            .map(|c| c.value.as_str())
            .collect();
        assert_eq!(values, ["website"]);
    }

    #[tokio::test]
    async fn test_second_positional_is_today() {
        let provider = demo_provider();
        let response = provider
            .list_arguments(&line(&["demo", "log", "website"], 3))
            .await;
        assert_eq!(response.len(), 1);
        assert_eq!(
            response.candidates()[0].description.as_deref(),
            Some("date")
        );
    }

    #[tokio::test]
    async fn test_value_taking_option_consumes_next_token() {
        let provider = demo_provider();
        // "--date 2026-08-08" must not shift the positional mapping.
        let response = provider
            .list_arguments(&line(&["demo", "log", "--date", "2026-08-08"], 4))
            .await;
        let values: Vec<_> = response
            .candidates()
            .iter()
            .map(|c| c.value.as_str())
            .collect();
        assert_eq!(values, ["website", "backend"]);
    }

    #[tokio::test]
    async fn test_inline_option_value_consumes_nothing() {
        let provider = demo_provider();
        let response = provider
            .list_arguments(&line(&["demo", "log", "--date=2026-08-08"], 3))
            .await;
        let values: Vec<_> = response
            .candidates()
            .iter()
            .map(|c| c.value.as_str())
            .collect();
        assert_eq!(values, ["website", "backend"]);
    }

    #[tokio::test]
    async fn test_unknown_flag_counts_as_plain_flag() {
        let provider = demo_provider();
        let response = provider
            .list_arguments(&line(&["demo", "log", "--verbose"], 3))
            .await;
        assert_eq!(response.len(), 2);
    }

    #[tokio::test]
    async fn test_cursor_past_last_positional_is_empty() {
        let provider = demo_provider();
        let response = provider
            .list_arguments(&line(&["demo", "log", "website", "2026-08-08"], 4))
            .await;
        assert!(response.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_subcommand_is_empty() {
        let provider = demo_provider();
        let response = provider
            .list_arguments(&line(&["demo", "teleport", "x"], 2))
            .await;
        assert!(response.is_empty());
    }

    #[tokio::test]
    async fn test_command_position_yields_no_arguments() {
        let provider = demo_provider();
        let response = provider.list_arguments(&line(&["demo"], 1)).await;
        assert!(response.is_empty());
        let response = provider.list_arguments(&line(&[], 0)).await;
        assert!(response.is_empty());
    }

    #[tokio::test]
    async fn test_context_collects_typed_positionals() {
        let spec = ToolSpec::from_toml_str(REDTIME_SPEC, "redtime.toml").unwrap();
        let command = spec.command("log").unwrap();
        let (slot, context) = RegistryProvider::positional_slot(
            command,
            &line(&["redtime", "log", "Website:42", "-y"], 4),
        );
        assert_eq!(slot, 1);
        assert_eq!(context.get("project").map(String::as_str), Some("Website:42"));
    }
}
