//! moviedex - search movies, see posters, keep favorites
//!
//! # Usage
//!
//! ```bash
//! moviedex search "the matrix" --sort year-desc
//! moviedex info tt0133093
//! moviedex favorites toggle tt0133093
//! moviedex --json favorites list
//! ```

use clap::Parser;
use tracing_subscriber::EnvFilter;

use moviedex::cli::{Cli, Command, ExitCode, Output};
use moviedex::commands;
use moviedex::config::Config;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(&cli);

    let exit_code = run_cli(cli).await;
    std::process::exit(exit_code.into());
}

/// Logs go to stderr so stdout stays parseable; RUST_LOG wins over --log-level
fn init_tracing(cli: &Cli) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("moviedex={}", cli.log_level.as_filter())));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Run CLI command and return exit code
async fn run_cli(cli: Cli) -> ExitCode {
    let output = Output::new(&cli);
    let config = match &cli.config {
        Some(path) => match Config::try_load_from(path) {
            Ok(config) => config,
            Err(e) => return output.error(e.to_string(), commands::exit_code_for(&e)),
        },
        None => Config::load(),
    };

    match cli.command {
        Command::Search(cmd) => commands::search_cmd(cmd, &config, &output).await,

        Command::Info(cmd) => {
            if let Err(e) = moviedex::cli::validate_imdb_id(&cmd.imdb_id) {
                return output.error(e, ExitCode::InvalidArgs);
            }
            commands::info_cmd(cmd, &config, &output).await
        }

        Command::Favorites(cmd) => commands::favorites_cmd(cmd, &config, &output).await,
    }
}
