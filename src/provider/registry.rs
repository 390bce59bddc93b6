//! Declarative command registry backing the candidate provider.
//!
//! A spec file describes the completion-relevant surface of one tool: its
//! sub-commands, their positional arguments (with value hints), and their
//! options. Specs are TOML documents discovered in configured directories,
//! e.g.:
//!
//! ```toml
//! name = "redtime"
//! summary = "Redmine time tracking from the command line"
//!
//! [[commands]]
//! name = "log"
//! summary = "Log spent time against a project or issue"
//!
//! [[commands.args]]
//! name = "project"
//! complete = { source = "exec", argv = ["redtime", "projects", "--porcelain"] }
//!
//! [[commands.options]]
//! long = "--date"
//! summary = "Date the time was spent on"
//! takes_value = true
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{RegistryError, Result};
use crate::provider::values::ValueHint;

/// Completion spec for one tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSpec {
    /// Invocation name of the tool.
    pub name: String,

    /// One-line description.
    #[serde(default)]
    pub summary: Option<String>,

    /// Sub-commands, in ranking order.
    #[serde(default)]
    pub commands: Vec<CommandSpec>,
}

/// One sub-command of the tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandSpec {
    /// Sub-command name.
    pub name: String,

    /// One-line description shown next to the command candidate.
    #[serde(default)]
    pub summary: Option<String>,

    /// Positional arguments, in the order they are typed.
    #[serde(default)]
    pub args: Vec<ArgSpec>,

    /// Options valid for this sub-command.
    #[serde(default)]
    pub options: Vec<OptionSpec>,
}

/// One positional argument slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArgSpec {
    /// Argument name, used for descriptions and `{name}` placeholders.
    pub name: String,

    /// One-line description.
    #[serde(default)]
    pub summary: Option<String>,

    /// How candidate values for this slot are produced.
    #[serde(default)]
    pub complete: ValueHint,
}

/// One option (flag) of a sub-command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionSpec {
    /// Long spelling, e.g. `--date`.
    pub long: String,

    /// Optional short spelling, e.g. `-d`.
    #[serde(default)]
    pub short: Option<String>,

    /// One-line description shared by all spellings.
    #[serde(default)]
    pub summary: Option<String>,

    /// Whether the flag consumes the following token as its value.
    #[serde(default)]
    pub takes_value: bool,
}

impl OptionSpec {
    /// All spellings of this option, long first.
    pub fn flags(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.long.as_str()).chain(self.short.as_deref())
    }

    /// Whether the given token is one of this option's spellings.
    pub fn matches(&self, token: &str) -> bool {
        self.flags().any(|f| f == token)
    }
}

impl ToolSpec {
    /// Parse a spec from TOML text.
    ///
    /// # Arguments
    /// * `contents` - TOML document
    /// * `origin` - Path or label used in error messages
    ///
    /// # Returns
    /// * `Result<ToolSpec>` - Parsed and validated spec or error
    pub fn from_toml_str(contents: &str, origin: &str) -> Result<Self> {
        let spec: ToolSpec =
            toml::from_str(contents).map_err(|e| RegistryError::InvalidSpec {
                path: origin.to_string(),
                reason: e.to_string(),
            })?;
        spec.validate(origin)?;
        Ok(spec)
    }

    /// Load and validate a spec file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents, &path.display().to_string())
    }

    /// Look up a sub-command by name.
    pub fn command(&self, name: &str) -> Option<&CommandSpec> {
        self.commands.iter().find(|c| c.name == name)
    }

    /// Validate structural invariants.
    fn validate(&self, origin: &str) -> Result<()> {
        if self.name.is_empty() {
            return Err(RegistryError::InvalidSpec {
                path: origin.to_string(),
                reason: "tool name is empty".to_string(),
            }
            .into());
        }

        let mut seen = std::collections::HashSet::new();
        for command in &self.commands {
            if command.name.is_empty() {
                return Err(RegistryError::InvalidSpec {
                    path: origin.to_string(),
                    reason: "command with empty name".to_string(),
                }
                .into());
            }
            if !seen.insert(command.name.as_str()) {
                return Err(RegistryError::DuplicateCommand(command.name.clone()).into());
            }

            let mut flags = std::collections::HashSet::new();
            for option in &command.options {
                if !option.long.starts_with('-') {
                    return Err(RegistryError::InvalidSpec {
                        path: origin.to_string(),
                        reason: format!(
                            "option '{}' of command '{}' does not start with '-'",
                            option.long, command.name
                        ),
                    }
                    .into());
                }
                for flag in option.flags() {
                    if !flags.insert(flag.to_string()) {
                        return Err(RegistryError::DuplicateFlag {
                            command: command.name.clone(),
                            flag: flag.to_string(),
                        }
                        .into());
                    }
                }
            }
        }

        Ok(())
    }
}

/// A spec file discovered on disk.
#[derive(Debug, Clone)]
pub struct SpecEntry {
    /// Tool name declared by the spec.
    pub name: String,

    /// Where the spec was found.
    pub path: PathBuf,

    /// Number of sub-commands it describes.
    pub command_count: usize,
}

/// Scan spec directories for valid spec files.
///
/// Unreadable or invalid files are skipped with a debug log; discovery is a
/// best-effort listing, not a validation pass.
pub fn discover(spec_dirs: &[PathBuf]) -> Vec<SpecEntry> {
    let mut entries = Vec::new();

    for dir in spec_dirs {
        let Ok(read_dir) = std::fs::read_dir(dir) else {
            debug!(dir = %dir.display(), "spec directory not readable, skipping");
            continue;
        };

        let mut paths: Vec<PathBuf> = read_dir
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "toml"))
            .collect();
        paths.sort();

        for path in paths {
            match ToolSpec::load(&path) {
                Ok(spec) => entries.push(SpecEntry {
                    name: spec.name,
                    path,
                    command_count: spec.commands.len(),
                }),
                Err(e) => {
                    debug!(path = %path.display(), error = %e, "skipping invalid spec");
                }
            }
        }
    }

    entries
}

/// Find and load the spec for a named tool.
///
/// Looks for `<tool>.toml` in each spec directory first, then falls back to
/// scanning for a spec whose declared name matches.
pub fn find(tool: &str, spec_dirs: &[PathBuf]) -> Result<ToolSpec> {
    for dir in spec_dirs {
        let direct = dir.join(format!("{tool}.toml"));
        if direct.is_file() {
            return ToolSpec::load(&direct);
        }
    }

    for entry in discover(spec_dirs) {
        if entry.name == tool {
            return ToolSpec::load(&entry.path);
        }
    }

    Err(RegistryError::SpecNotFound(tool.to_string()).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    const REDTIME_SPEC: &str = include_str!("../../specs/redtime.toml");

    #[test]
    fn test_parse_redtime_spec() {
        let spec = ToolSpec::from_toml_str(REDTIME_SPEC, "redtime.toml").unwrap();
        assert_eq!(spec.name, "redtime");
        assert!(spec.command("log").is_some());
        assert!(spec.command("overview").is_some());
        assert!(spec.command("missing").is_none());
    }

    #[test]
    fn test_log_command_shape() {
        let spec = ToolSpec::from_toml_str(REDTIME_SPEC, "redtime.toml").unwrap();
        let log = spec.command("log").unwrap();
        let names: Vec<_> = log.args.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(
            names,
            ["project", "issue", "activity", "hours", "description"]
        );
        assert!(log.options.iter().any(|o| o.long == "--date"));
    }

    #[test]
    fn test_duplicate_command_rejected() {
        let toml = r#"
            name = "demo"
            [[commands]]
            name = "log"
            [[commands]]
            name = "log"
        "#;
        let err = ToolSpec::from_toml_str(toml, "demo.toml").unwrap_err();
        assert!(err.to_string().contains("Duplicate command"));
    }

    #[test]
    fn test_duplicate_flag_rejected() {
        let toml = r#"
            name = "demo"
            [[commands]]
            name = "log"
            [[commands.options]]
            long = "--date"
            [[commands.options]]
            long = "--date"
        "#;
        let err = ToolSpec::from_toml_str(toml, "demo.toml").unwrap_err();
        assert!(err.to_string().contains("Duplicate flag"));
    }

    #[test]
    fn test_flag_must_be_dashed() {
        let toml = r#"
            name = "demo"
            [[commands]]
            name = "log"
            [[commands.options]]
            long = "date"
        "#;
        assert!(ToolSpec::from_toml_str(toml, "demo.toml").is_err());
    }

    #[test]
    fn test_option_matches_both_spellings() {
        let opt = OptionSpec {
            long: "--date".to_string(),
            short: Some("-d".to_string()),
            summary: None,
            takes_value: true,
        };
        assert!(opt.matches("--date"));
        assert!(opt.matches("-d"));
        assert!(!opt.matches("--day"));
    }

    #[test]
    fn test_discover_and_find() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("redtime.toml"), REDTIME_SPEC).unwrap();
        std::fs::write(dir.path().join("broken.toml"), "name = ").unwrap();

        let dirs = vec![dir.path().to_path_buf()];
        let entries = discover(&dirs);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "redtime");

        let spec = find("redtime", &dirs).unwrap();
        assert_eq!(spec.name, "redtime");

        assert!(find("unknown", &dirs).is_err());
    }
}
