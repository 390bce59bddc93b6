//! Command-line interface for compadre
//!
//! This module handles:
//! - Command-line argument parsing using clap
//! - Configuration loading and validation
//! - Dispatching sub-commands (complete, completion, query, specs, config)

pub mod completion;

use clap::{Args, Parser, Subcommand};
use nu_ansi_term::Color;
use std::path::PathBuf;
use std::time::Duration;

use crate::adapter::{AdapterSettings, CompletionAdapter, SubprocessTransport};
use crate::config::Config;
use crate::error::{CompadreError, Result};
use crate::protocol::CommandLine;
use crate::provider::{self, CompleteArgs, RegistryProvider, ToolSpec, serve};

/// Context-aware shell completion broker
#[derive(Parser, Debug)]
#[command(
    name = "compadre",
    version,
    about = "Context-aware shell completion broker for command-line tools",
    long_about = "Serves tab-completion candidates for any tool described by a completion
spec, generates the shell glue that asks for them, and provides a debugging
front-end for the completion protocol."
)]
pub struct CliArgs {
    /// Configuration file path
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Disable colored output
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Quiet mode (errors only)
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Verbose mode (detailed logging)
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Very verbose mode (debug logging)
    #[arg(long = "vv")]
    pub very_verbose: bool,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands for compadre
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show version information
    Version,

    /// Serve completion candidates for a spec-described tool
    Complete {
        /// Tool whose spec answers the request
        #[arg(long = "for", value_name = "TOOL")]
        tool: String,

        #[command(flatten)]
        request: CompleteArgs,
    },

    /// Generate shell integration scripts
    Completion {
        /// Shell type (bash, zsh, fish)
        #[arg(value_name = "SHELL")]
        shell: String,

        /// Generate an adapter script for this tool instead of compadre's own
        #[arg(long, value_name = "TOOL")]
        tool: Option<String>,

        /// Route the tool's candidates through `compadre complete`
        #[arg(long)]
        via_broker: bool,
    },

    /// Run the completion adapter against a provider and print both channels
    Query(QueryArgs),

    /// List or validate completion spec files
    Specs {
        /// Print tool names only
        #[arg(long)]
        names: bool,

        /// Validate a spec file and exit
        #[arg(long, value_name = "FILE")]
        validate: Option<PathBuf>,
    },

    /// Show configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Validate configuration file
        #[arg(long)]
        validate: bool,
    },
}

/// Arguments of the query sub-command
#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Provider program (defaults to the first token)
    #[arg(long, value_name = "PROGRAM")]
    pub provider: Option<PathBuf>,

    /// Complete the token at this index; defaults to one past the last token
    #[arg(long, value_name = "N")]
    pub nth: Option<usize>,

    /// Provider deadline in milliseconds
    #[arg(long, value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Output format (text, json)
    #[arg(long, value_name = "FORMAT", default_value = "text")]
    pub format: String,

    /// The command line to complete
    #[arg(last = true, value_name = "TOKENS", required = true)]
    pub tokens: Vec<String>,
}

/// CLI interface handler
pub struct CliInterface {
    /// Parsed command-line arguments
    args: CliArgs,

    /// Loaded configuration
    config: Config,
}

impl CliInterface {
    /// Create a new CLI interface
    ///
    /// # Returns
    /// * `Result<Self>` - New CLI interface or error
    pub fn new() -> Result<Self> {
        let args = CliArgs::parse();
        let config = Self::load_config(&args)?;

        Ok(Self { args, config })
    }

    /// Load configuration from file and validate it
    fn load_config(args: &CliArgs) -> Result<Config> {
        let config = Config::load_from_file(args.config_file.as_deref())?;
        config.validate()?;
        Ok(config)
    }

    /// Get parsed arguments
    pub fn args(&self) -> &CliArgs {
        &self.args
    }

    /// Get loaded configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Dispatch the selected sub-command
    ///
    /// # Returns
    /// * `Result<()>` - Success or error
    pub async fn handle_subcommand(&self) -> Result<()> {
        match &self.args.command {
            Commands::Version => {
                println!("compadre {}", crate::VERSION);
                Ok(())
            }

            Commands::Complete { tool, request } => self.handle_complete(tool, request).await,

            Commands::Completion {
                shell,
                tool,
                via_broker,
            } => completion::generate_completion(shell, tool.as_deref(), *via_broker),

            Commands::Query(query) => self.handle_query(query).await,

            Commands::Specs { names, validate } => self.handle_specs(*names, validate.as_deref()),

            Commands::Config { show, validate } => self.handle_config(*show, *validate),
        }
    }

    /// Serve one provider request from a spec file
    ///
    /// Missing specs and unknown tools degrade to an empty response with
    /// exit status 0: this invocation sits on a completion hot path and
    /// must never block the user's shell.
    async fn handle_complete(&self, tool: &str, request: &CompleteArgs) -> Result<()> {
        let spec = match provider::registry::find(tool, &self.config.provider.spec_dirs) {
            Ok(spec) => spec,
            Err(e) => {
                tracing::debug!(tool = %tool, error = %e, "serving empty completion");
                return Ok(());
            }
        };

        let provider = RegistryProvider::new(spec, self.config.exec_timeout());
        let response = serve::respond(&provider, request).await;
        print!("{}", serve::render(&response));

        Ok(())
    }

    /// Drive the adapter end-to-end and print both channels
    async fn handle_query(&self, query: &QueryArgs) -> Result<()> {
        let program = match &query.provider {
            Some(program) => program.clone(),
            None => PathBuf::from(query.tokens.first().cloned().unwrap_or_default()),
        };

        let timeout = query
            .timeout_ms
            .map(Duration::from_millis)
            .unwrap_or_else(|| self.config.provider_timeout());

        let transport = SubprocessTransport::new(program).with_timeout(timeout);
        let adapter = CompletionAdapter::with_settings(
            transport,
            AdapterSettings::from(&self.config.adapter),
        );

        let cursor = query.nth.unwrap_or(query.tokens.len());
        let line = CommandLine::new(query.tokens.clone(), cursor);

        let channels = if line.at_command_position() {
            adapter.on_command_completion(&line).await
        } else {
            adapter.on_subcommand_completion(&line).await
        };

        match query.format.as_str() {
            "json" => {
                println!("{}", serde_json::to_string_pretty(&channels).map_err(
                    |e| CompadreError::Generic(format!("Failed to encode channels: {e}")),
                )?);
            }
            "text" => self.print_channels(&channels),
            other => {
                return Err(CompadreError::Generic(format!(
                    "Unsupported format: {other}. Supported formats: text, json"
                )));
            }
        }

        Ok(())
    }

    /// Render both channels for a terminal
    fn print_channels(&self, channels: &crate::adapter::ChannelSet) {
        let paint = |color: Color, text: &str| {
            if self.args.no_color {
                text.to_string()
            } else {
                color.paint(text).to_string()
            }
        };

        println!("{}", paint(Color::Cyan, "arguments:"));
        for candidate in &channels.arguments {
            match &candidate.description {
                Some(desc) => println!(
                    "  {}  {}",
                    candidate.value,
                    paint(Color::DarkGray, desc)
                ),
                None => println!("  {}", candidate.value),
            }
        }

        println!("{}", paint(Color::Cyan, "options:"));
        for candidate in &channels.options {
            match &candidate.description {
                Some(desc) => println!(
                    "  {}  {}",
                    candidate.value,
                    paint(Color::DarkGray, desc)
                ),
                None => println!("  {}", candidate.value),
            }
        }
    }

    /// List or validate spec files
    fn handle_specs(&self, names: bool, validate: Option<&std::path::Path>) -> Result<()> {
        if let Some(path) = validate {
            let spec = ToolSpec::load(path)?;
            println!("OK: {} ({} commands)", spec.name, spec.commands.len());
            return Ok(());
        }

        let entries = provider::registry::discover(&self.config.provider.spec_dirs);

        if names {
            for entry in entries {
                println!("{}", entry.name);
            }
            return Ok(());
        }

        if entries.is_empty() {
            println!(
                "No specs found in: {}",
                self.config
                    .provider
                    .spec_dirs
                    .iter()
                    .map(|d| d.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
            return Ok(());
        }

        for entry in entries {
            let name = if self.args.no_color {
                entry.name.clone()
            } else {
                nu_ansi_term::Style::new().bold().paint(&entry.name).to_string()
            };
            println!(
                "{}  {} commands  {}",
                name,
                entry.command_count,
                entry.path.display()
            );
        }

        Ok(())
    }

    /// Show or validate configuration
    fn handle_config(&self, show: bool, validate: bool) -> Result<()> {
        if validate {
            self.config.validate()?;
            println!("Configuration OK");
        }

        if show || !validate {
            let rendered = toml::to_string_pretty(&self.config)
                .map_err(|e| CompadreError::Generic(format!("Failed to render config: {e}")))?;
            print!("{rendered}");
        }

        Ok(())
    }
}
