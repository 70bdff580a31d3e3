//! webapp-mcp: MCP server exposing a web application project to AI assistants
//!
//! Serves the application's database schema and route table as resources,
//! and sandboxed `ls`/`read_file` tools over the project source tree.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;

use webapp_mcp::config;
use webapp_mcp::mcp::server::McpServer;
use webapp_mcp::project::{FileRoutesProvider, FileSchemaProvider, PathGuard};

/// MCP server exposing a web application project to AI assistants.
///
/// Speaks JSON-RPC 2.0 over stdin/stdout; the working directory (or
/// `--root`) defines the project all resources and tools are confined to.
#[derive(Parser, Debug)]
#[command(name = "webapp-mcp")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(value_name = "CONFIG_FILE")]
    config: Option<PathBuf>,

    /// Project root directory (overrides configuration and working directory)
    #[arg(short, long, value_name = "DIR")]
    root: Option<PathBuf>,

    /// Increase logging verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease logging verbosity (only show errors)
    #[arg(short, long)]
    quiet: bool,
}

/// Determines the log level from CLI arguments.
#[allow(clippy::match_same_arms)] // Explicit "warn" arm for clarity
fn get_log_level(verbose: u8, quiet: bool, config_level: &str) -> Level {
    if quiet {
        return Level::ERROR;
    }

    match verbose {
        0 => match config_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::WARN, // Default to warn for unknown levels
        },
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Initialises the tracing subscriber for logging.
///
/// Logs go to stderr only; stdout belongs to the protocol.
fn init_tracing(level: Level) {
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Entry point for the webapp-mcp server.
fn main() -> ExitCode {
    let args = Args::parse();

    // Load configuration
    let cfg = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Initialise logging
    let log_level = get_log_level(args.verbose, args.quiet, &cfg.logging.level);
    init_tracing(log_level);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting webapp-mcp server"
    );

    // Resolve the project root: CLI flag, then config, then working directory.
    // A relative root is anchored at the working directory.
    let cwd = match std::env::current_dir() {
        Ok(cwd) => cwd,
        Err(e) => {
            error!(error = %e, "Cannot determine working directory");
            return ExitCode::FAILURE;
        }
    };
    let root = match args.root.or(cfg.project_root) {
        Some(root) if root.is_absolute() => root,
        Some(root) => cwd.join(root),
        None => cwd,
    };

    info!(root = %root.display(), "Project root configured");

    let guard = PathGuard::new(root.clone());
    let schema = FileSchemaProvider::new(root.join(&cfg.schema.path));
    let routes = FileRoutesProvider::new(root.join(&cfg.routes.manifest));

    let mut server = McpServer::new(guard, Box::new(schema), Box::new(routes));

    info!("MCP server ready, waiting for client connection...");

    // Strictly sequential request handling: a current-thread runtime is all
    // the concurrency this server ever needs.
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!(error = %e, "Failed to create Tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(server.run()) {
        Ok(()) => {
            info!("Server shut down gracefully");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Server error");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }

    #[test]
    fn verbosity_flags_override_config() {
        assert_eq!(get_log_level(0, false, "debug"), Level::DEBUG);
        assert_eq!(get_log_level(1, false, "error"), Level::INFO);
        assert_eq!(get_log_level(2, false, "warn"), Level::DEBUG);
        assert_eq!(get_log_level(3, false, "warn"), Level::TRACE);
        assert_eq!(get_log_level(2, true, "trace"), Level::ERROR);
    }

    #[test]
    fn unknown_config_level_defaults_to_warn() {
        assert_eq!(get_log_level(0, false, "loud"), Level::WARN);
    }
}
