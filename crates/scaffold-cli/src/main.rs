// crates/scaffold-cli/src/main.rs
// ============================================================================
// Module: Schema Scaffold CLI Entry Point
// Description: Command dispatcher for blueprint validation and provisioning.
// Purpose: Drive the provisioning engine and render its progress stream.
// Dependencies: clap, scaffold-config, scaffold-core, scaffold-store-http, tokio
// ============================================================================

//! ## Overview
//! The Schema Scaffold CLI validates blueprint files and provisions them
//! into the configured record store. Validation runs ahead of every
//! provisioning run; the engine itself never validates. Progress events are
//! rendered one per line in emission order, and the process exit code
//! reflects the run's terminal event.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use scaffold_core::ProgressEvent;
use scaffold_core::ProvisionEngine;
use scaffold_core::RequestPacer;
use scaffold_core::SchemaBlueprint;
use scaffold_core::StepStatus;
use scaffold_store_http::HttpRecordStore;
use thiserror::Error;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum size of a blueprint JSON input.
const MAX_BLUEPRINT_BYTES: u64 = 1024 * 1024;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "scaffold", disable_help_subcommand = true)]
struct Cli {
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a blueprint file without touching the record store.
    Validate(ValidateCommand),
    /// Provision a blueprint into the record store.
    Provision(ProvisionCommand),
}

/// Arguments for the validate subcommand.
#[derive(Args, Debug)]
struct ValidateCommand {
    /// Path to the blueprint JSON file.
    #[arg(long)]
    blueprint: PathBuf,
}

/// Arguments for the provision subcommand.
#[derive(Args, Debug)]
struct ProvisionCommand {
    /// Path to the blueprint JSON file.
    #[arg(long)]
    blueprint: PathBuf,
    /// Path to the configuration file (defaults to scaffold.toml).
    #[arg(long)]
    config: Option<PathBuf>,
}

// ============================================================================
// SECTION: CLI Errors
// ============================================================================

/// CLI failure carrying a user-facing message.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Rendered error message.
    message: String,
}

impl CliError {
    /// Creates a CLI error from a message.
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Result alias for CLI operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point.
#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
async fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Validate(command) => run_validate(&command),
        Commands::Provision(command) => run_provision(command).await,
    }
}

// ============================================================================
// SECTION: Commands
// ============================================================================

/// Validates a blueprint file and reports its step counts.
fn run_validate(command: &ValidateCommand) -> CliResult<ExitCode> {
    let blueprint = load_blueprint(&command.blueprint)?;
    blueprint
        .validate()
        .map_err(|err| CliError::new(format!("blueprint validation failed: {err}")))?;
    write_stdout_line(&format!(
        "blueprint ok: {} databases, {} relations",
        blueprint.database_count(),
        blueprint.relation_count()
    ))
    .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Provisions a blueprint into the configured record store.
async fn run_provision(command: ProvisionCommand) -> CliResult<ExitCode> {
    let blueprint = load_blueprint(&command.blueprint)?;
    blueprint
        .validate()
        .map_err(|err| CliError::new(format!("blueprint validation failed: {err}")))?;

    let config = scaffold_config::load(command.config.as_deref())
        .map_err(|err| CliError::new(err.to_string()))?;
    let Some(auth_token) = config.resolve_auth_token() else {
        return Err(CliError::new(format!(
            "store auth token is not set; export {}",
            config.store.auth_token_env
        )));
    };

    let store = HttpRecordStore::new(config.store_config(Some(auth_token)))
        .map_err(|err| CliError::new(err.to_string()))?;
    let pacer = RequestPacer::new(config.pacer_config());
    let engine = ProvisionEngine::new(store, pacer);

    let (handle, mut events) = engine.start(blueprint, config.events.buffer);
    while let Some(event) = events.recv().await {
        write_stdout_line(&render_event(&event))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    }
    match handle.await {
        Ok(Ok(summary)) => {
            write_stdout_line(&format!("container {}: {}", summary.container_id, summary.describe()))
                .map_err(|err| CliError::new(output_error("stdout", &err)))?;
            Ok(ExitCode::SUCCESS)
        }
        Ok(Err(err)) => Err(CliError::new(format!("provisioning failed: {err}"))),
        Err(err) => Err(CliError::new(format!("provisioning task failed: {err}"))),
    }
}

// ============================================================================
// SECTION: Blueprint Loading
// ============================================================================

/// Loads and parses a blueprint JSON file with a size cap.
fn load_blueprint(path: &Path) -> CliResult<SchemaBlueprint> {
    let metadata = fs::metadata(path)
        .map_err(|err| CliError::new(format!("failed to read {}: {err}", path.display())))?;
    if metadata.len() > MAX_BLUEPRINT_BYTES {
        return Err(CliError::new(format!(
            "blueprint {} is {} bytes; limit is {MAX_BLUEPRINT_BYTES}",
            path.display(),
            metadata.len()
        )));
    }
    let raw = fs::read(path)
        .map_err(|err| CliError::new(format!("failed to read {}: {err}", path.display())))?;
    serde_json::from_slice(&raw)
        .map_err(|err| CliError::new(format!("failed to parse {}: {err}", path.display())))
}

// ============================================================================
// SECTION: Event Rendering
// ============================================================================

/// Renders one progress event as a single output line.
fn render_event(event: &ProgressEvent) -> String {
    let label = event.label.as_ref().map(|label| format!(" {label}")).unwrap_or_default();
    let prefix = format!("[{}/{}] {}{}", event.step, event.total_steps, event.message, label);
    match event.status {
        StepStatus::InProgress => format!("{prefix} ..."),
        StepStatus::Success => match &event.detail {
            Some(detail) => format!("{prefix} ({detail})"),
            None => prefix,
        },
        StepStatus::Error => {
            format!("{prefix}: {}", event.error.as_deref().unwrap_or("unknown error"))
        }
        StepStatus::Pending => prefix,
    }
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Builds the message used when an output stream write fails.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed to write to {stream}: {error}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
