//! CLI entry point.
//!
//! Loads `.env`, parses arguments, sets up logging, then dispatches. Errors
//! are printed once here and mapped to a sysexits-style exit code.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use tpsetup_cli::{Cli, CliConfig, CliError, Commands, bootstrap, handlers};

#[tokio::main]
async fn main() -> ExitCode {
    // Load before parsing so clap's `env` fallbacks see .env values
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let cli_err = CliError::from_anyhow(&err);
            tracing::debug!(error = ?err, exit_code = cli_err.exit_code(), "Command failed");
            eprintln!("Error: {cli_err}");
            ExitCode::from(cli_err.exit_code())
        }
    }
}

/// `RUST_LOG` wins when set; otherwise `info`, or `debug` with `--verbose`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = CliConfig::from_cli(cli);

    // Paths only needs the layout, not a supported platform
    if matches!(cli.command, Some(Commands::Paths)) {
        return handlers::paths::execute(&config);
    }

    let ctx = bootstrap(&config)?;

    match &cli.command {
        None => handlers::run::execute(&ctx).await,
        Some(Commands::Boost) => handlers::boost::execute(&ctx),
        Some(Commands::Flip) => handlers::flip::execute(&ctx).await,
        Some(Commands::Status { json }) => handlers::status::execute(&ctx, *json),
        Some(Commands::CheckDeps) => handlers::check_deps::execute(&ctx),
        Some(Commands::Paths) => handlers::paths::execute(&config),
    }
}
