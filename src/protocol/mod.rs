//! Core types of the completion-candidate protocol.
//!
//! This module defines the value objects exchanged between the completion
//! adapter (shell side) and the completion provider (tool side):
//!
//! - **CommandLine**: immutable snapshot of the tokens typed so far plus the
//!   cursor token index
//! - **CandidateKind**: which presentation bucket a candidate belongs to
//! - **Candidate**: one suggestion with an optional description
//! - **CompletionRequest** / **CompletionResponse**: one request/response
//!   round-trip, created fresh per completion trigger and never retained
//!
//! All entities live for a single completion cycle. Nothing here is shared
//! or mutated across invocations, so a previous completion can never leak
//! stale candidates into the next one.

pub mod wire;

use serde::Serialize;

/// Snapshot of the command line under completion.
///
/// Tokens include the tool's own invocation name at index 0. The cursor is
/// the 0-based index of the token being completed; it may equal
/// `tokens.len()` when the user is starting a fresh token at the end of the
/// line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandLine {
    tokens: Vec<String>,
    cursor: usize,
}

impl CommandLine {
    /// Create a snapshot from tokens and a cursor token index.
    pub fn new(tokens: Vec<String>, cursor: usize) -> Self {
        Self { tokens, cursor }
    }

    /// All tokens typed so far, the tool name first.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Index of the token being completed.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The tool's invocation name, if any token was typed at all.
    pub fn tool(&self) -> Option<&str> {
        self.tokens.first().map(String::as_str)
    }

    /// The active sub-command (second token), if present.
    pub fn subcommand(&self) -> Option<&str> {
        self.tokens.get(1).map(String::as_str)
    }

    /// The partial text already typed at the cursor position, if any.
    pub fn current_prefix(&self) -> Option<&str> {
        self.tokens.get(self.cursor).map(String::as_str)
    }

    /// Whether the completion targets the sub-command position itself.
    ///
    /// Index 0 is the tool name, so anything at index 1 or earlier selects
    /// which sub-command to run.
    pub fn at_command_position(&self) -> bool {
        self.cursor <= 1
    }
}

/// Presentation bucket for a candidate.
///
/// The host shell groups and formats each kind differently; options get a
/// leading-dash affordance and dash-aware matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CandidateKind {
    /// A top-level sub-command.
    Command,

    /// A positional argument value.
    Argument,

    /// A `-`/`--` flag.
    Option,
}

/// One suggested completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    /// Text inserted into the command line.
    pub value: String,

    /// Human-readable annotation shown next to the value.
    pub description: Option<String>,

    /// Presentation bucket.
    pub kind: CandidateKind,
}

impl Candidate {
    /// Create a candidate without a description.
    pub fn new(value: impl Into<String>, kind: CandidateKind) -> Self {
        Self {
            value: value.into(),
            description: None,
            kind,
        }
    }

    /// Create a candidate with a description.
    pub fn described(
        value: impl Into<String>,
        description: impl Into<String>,
        kind: CandidateKind,
    ) -> Self {
        Self {
            value: value.into(),
            description: Some(description.into()),
            kind,
        }
    }
}

/// What the adapter is asking the provider for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestKind {
    /// Every top-level sub-command, independent of partial input.
    Commands,

    /// Valid values for the token at this index.
    ArgumentsAt(usize),

    /// Flags of the active sub-command.
    Options,
}

/// One completion request, keyed only on the current command line snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    /// The command line under completion.
    pub line: CommandLine,

    /// Which candidate family is requested.
    pub kind: RequestKind,
}

impl CompletionRequest {
    /// Request the top-level command list.
    pub fn commands(line: CommandLine) -> Self {
        Self {
            line,
            kind: RequestKind::Commands,
        }
    }

    /// Request argument completions at the line's cursor index.
    pub fn arguments(line: CommandLine) -> Self {
        let cursor = line.cursor();
        Self {
            line,
            kind: RequestKind::ArgumentsAt(cursor),
        }
    }

    /// Request the active sub-command's options.
    pub fn options(line: CommandLine) -> Self {
        Self {
            line,
            kind: RequestKind::Options,
        }
    }

    /// The candidate kind every entry of the response must carry.
    pub fn expected_kind(&self) -> CandidateKind {
        match self.kind {
            RequestKind::Commands => CandidateKind::Command,
            RequestKind::ArgumentsAt(_) => CandidateKind::Argument,
            RequestKind::Options => CandidateKind::Option,
        }
    }
}

/// Ordered candidate sequence of a single kind.
///
/// Order is meaningful: the provider ranks by relevance and nothing
/// downstream re-sorts. The constructors enforce the kind invariant, so a
/// `Commands` response can never carry an `Option` candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionResponse {
    kind: CandidateKind,
    candidates: Vec<Candidate>,
}

impl CompletionResponse {
    /// Create an empty response of the given kind.
    pub fn empty(kind: CandidateKind) -> Self {
        Self {
            kind,
            candidates: Vec::new(),
        }
    }

    /// Create a response, coercing every candidate to the response kind.
    pub fn of(kind: CandidateKind, candidates: Vec<Candidate>) -> Self {
        let candidates = candidates
            .into_iter()
            .map(|mut c| {
                c.kind = kind;
                c
            })
            .collect();
        Self { kind, candidates }
    }

    /// Create a command-list response.
    pub fn commands(candidates: Vec<Candidate>) -> Self {
        Self::of(CandidateKind::Command, candidates)
    }

    /// Create an argument-values response.
    pub fn arguments(candidates: Vec<Candidate>) -> Self {
        Self::of(CandidateKind::Argument, candidates)
    }

    /// Create an options response.
    pub fn options(candidates: Vec<Candidate>) -> Self {
        Self::of(CandidateKind::Option, candidates)
    }

    /// The kind shared by every candidate in this response.
    pub fn kind(&self) -> CandidateKind {
        self.kind
    }

    /// Candidates in provider order.
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Consume the response and return the candidates.
    pub fn into_candidates(self) -> Vec<Candidate> {
        self.candidates
    }

    /// Whether the response carries no candidates.
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Number of candidates.
    pub fn len(&self) -> usize {
        self.candidates.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(tokens: &[&str], cursor: usize) -> CommandLine {
        CommandLine::new(tokens.iter().map(|t| t.to_string()).collect(), cursor)
    }

    #[test]
    fn test_command_line_accessors() {
        let cl = line(&["redtime", "log", "tod"], 2);
        assert_eq!(cl.tool(), Some("redtime"));
        assert_eq!(cl.subcommand(), Some("log"));
        assert_eq!(cl.current_prefix(), Some("tod"));
        assert!(!cl.at_command_position());
    }

    #[test]
    fn test_command_line_fresh_token() {
        // Cursor past the last token: a new token is being started.
        let cl = line(&["redtime", "log"], 2);
        assert_eq!(cl.current_prefix(), None);
        assert_eq!(cl.cursor(), 2);
    }

    #[test]
    fn test_command_position() {
        assert!(line(&["redtime"], 1).at_command_position());
        assert!(line(&[], 0).at_command_position());
        assert!(!line(&["redtime", "log"], 2).at_command_position());
    }

    #[test]
    fn test_request_expected_kind() {
        let cl = line(&["redtime", "log"], 2);
        assert_eq!(
            CompletionRequest::commands(cl.clone()).expected_kind(),
            CandidateKind::Command
        );
        assert_eq!(
            CompletionRequest::arguments(cl.clone()).expected_kind(),
            CandidateKind::Argument
        );
        assert_eq!(
            CompletionRequest::options(cl).expected_kind(),
            CandidateKind::Option
        );
    }

    #[test]
    fn test_arguments_request_uses_cursor() {
        let req = CompletionRequest::arguments(line(&["redtime", "log"], 2));
        assert_eq!(req.kind, RequestKind::ArgumentsAt(2));
    }

    #[test]
    fn test_response_kind_invariant() {
        // A mis-tagged candidate is coerced to the response kind.
        let stray = Candidate::new("--project", CandidateKind::Option);
        let response = CompletionResponse::arguments(vec![stray]);
        assert!(
            response
                .candidates()
                .iter()
                .all(|c| c.kind == CandidateKind::Argument)
        );
    }

    #[test]
    fn test_response_preserves_order() {
        let response = CompletionResponse::commands(vec![
            Candidate::new("overview", CandidateKind::Command),
            Candidate::new("log", CandidateKind::Command),
        ]);
        let values: Vec<_> = response.candidates().iter().map(|c| &c.value).collect();
        assert_eq!(values, ["overview", "log"]);
    }
}
