//! Value sources for positional argument completion.
//!
//! Each positional slot in a spec carries a [`ValueHint`] saying how its
//! candidates are produced: a fixed list, today's date, or the stdout of an
//! external command decoded with the wire codec. The exec form is the seam
//! where tool-specific lookups (Redmine projects, issues, activities in the
//! redtime case) plug into the otherwise tool-agnostic provider.

use std::collections::HashMap;
use std::process::Stdio;
use std::time::Duration;

use chrono::Local;
use serde::{Deserialize, Serialize};
use tokio::process::Command;
use tracing::debug;

use crate::protocol::{Candidate, CandidateKind, wire};

/// How candidates for one positional slot are produced.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum ValueHint {
    /// No candidates.
    #[default]
    None,

    /// Today's date, formatted `%Y-%m-%d`.
    Today,

    /// A fixed list of values.
    Static {
        /// Candidate values in ranking order.
        values: Vec<StaticValue>,
    },

    /// Run a command and decode its stdout with the wire codec.
    ///
    /// Argv elements may contain `{name}` placeholders which are substituted
    /// with the value already typed for the positional of that name, or the
    /// empty string when it has not been typed yet.
    Exec {
        /// Program and arguments.
        argv: Vec<String>,
    },
}

/// One fixed candidate value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaticValue {
    /// Text inserted into the command line.
    pub value: String,

    /// Annotation shown next to the value.
    #[serde(default)]
    pub description: Option<String>,
}

/// Positional values already typed on the command line, keyed by slot name.
///
/// Built fresh for each request while walking the tokens before the cursor;
/// feeds `{name}` placeholder substitution in exec sources.
pub type ArgContext = HashMap<String, String>;

/// Resolves value hints into candidate lists.
#[derive(Debug, Clone)]
pub struct ValueResolver {
    /// Deadline for one exec source invocation.
    exec_timeout: Duration,
}

impl ValueResolver {
    /// Create a resolver with the given exec deadline.
    pub fn new(exec_timeout: Duration) -> Self {
        Self { exec_timeout }
    }

    /// Resolve a hint into argument candidates.
    ///
    /// Exec failures of any kind (spawn error, non-zero exit, timeout)
    /// produce an empty list; completion must degrade, not fail.
    pub async fn resolve(
        &self,
        hint: &ValueHint,
        arg_name: &str,
        context: &ArgContext,
    ) -> Vec<Candidate> {
        match hint {
            ValueHint::None => Vec::new(),

            ValueHint::Today => {
                let today = Local::now().format("%Y-%m-%d").to_string();
                vec![Candidate::described(
                    today,
                    arg_name,
                    CandidateKind::Argument,
                )]
            }

            ValueHint::Static { values } => values
                .iter()
                .map(|v| Candidate {
                    value: v.value.clone(),
                    description: v.description.clone(),
                    kind: CandidateKind::Argument,
                })
                .collect(),

            ValueHint::Exec { argv } => self.run_exec(argv, context).await,
        }
    }

    /// Spawn an exec source and decode its stdout.
    async fn run_exec(&self, argv: &[String], context: &ArgContext) -> Vec<Candidate> {
        let argv: Vec<String> = argv
            .iter()
            .map(|part| substitute_placeholders(part, context))
            .collect();

        let Some((program, args)) = argv.split_first() else {
            return Vec::new();
        };
        if program.is_empty() {
            return Vec::new();
        }

        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output();

        let output = match tokio::time::timeout(self.exec_timeout, output).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                debug!(program = %program, error = %e, "exec value source failed to spawn");
                return Vec::new();
            }
            Err(_) => {
                debug!(program = %program, timeout_ms = self.exec_timeout.as_millis() as u64,
                    "exec value source timed out");
                return Vec::new();
            }
        };

        if !output.status.success() {
            debug!(program = %program, status = ?output.status.code(),
                "exec value source exited non-zero");
            return Vec::new();
        }

        wire::decode_stream(&output.stdout, CandidateKind::Argument)
    }
}

/// Replace `{name}` placeholders with context values.
///
/// Unknown names substitute to the empty string, matching how the legacy
/// provider passed an absent project filter.
fn substitute_placeholders(part: &str, context: &ArgContext) -> String {
    let mut out = String::with_capacity(part.len());
    let mut rest = part;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        match rest[open..].find('}') {
            Some(close) => {
                let name = &rest[open + 1..open + close];
                if let Some(value) = context.get(name) {
                    out.push_str(value);
                }
                rest = &rest[open + close + 1..];
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}
