//! Compadre - Shell Completion Broker
//!
//! Serves tab-completion candidates for command-line tools described by
//! declarative specs, and generates the shell glue that asks for them.
//!
//! # Features
//!
//! - Spec-driven completion provider with dynamic value sources
//! - Subprocess completion adapter with a strict fail-open policy
//! - Shell integration scripts for bash, zsh, and fish
//! - Protocol debugging via the query sub-command
//!
//! # Usage
//!
//! ```bash
//! # Serve candidates for a spec'd tool
//! compadre complete --for redtime --nth 2 -- redtime log
//!
//! # Install completion for a tool
//! compadre completion zsh --tool redtime > _redtime
//! ```

use tracing::Level;

use compadre::cli::CliInterface;
use compadre::error::Result;

/// Application entry point
#[tokio::main]
async fn main() {
    // Initialize the application and handle any errors
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Main application logic
///
/// This function orchestrates the application startup:
/// 1. Parse command-line arguments
/// 2. Load configuration
/// 3. Initialize logging
/// 4. Dispatch the selected sub-command
///
/// # Returns
/// * `Result<()>` - Success or error
async fn run() -> Result<()> {
    // Parse command-line arguments and load configuration
    let cli = CliInterface::new()?;

    // Initialize logging based on verbosity
    initialize_logging(&cli);

    cli.handle_subcommand().await
}

/// Initialize logging system based on verbosity level
///
/// Diagnostics go to stderr: stdout belongs to the completion protocol and
/// must carry nothing but candidate lines.
///
/// # Arguments
/// * `cli` - CLI interface with verbosity settings
fn initialize_logging(cli: &CliInterface) {
    let level = if cli.args().very_verbose {
        Level::TRACE
    } else if cli.args().verbose {
        Level::DEBUG
    } else if cli.args().quiet {
        Level::ERROR
    } else {
        cli.config().logging.level.to_tracing_level()
    };

    // Build subscriber with level filter
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false);

    // Configure timestamps
    if cli.config().logging.timestamps {
        subscriber.init();
    } else {
        subscriber.without_time().init();
    }
}
