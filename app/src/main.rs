// mealcart/src/main.rs

use clap::Parser;
use mealcart::cli::{self, Cli};
use mealcart::config::AppConfig;
use mealcart::state::AppState;
use std::process::ExitCode;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
  let cli = Cli::parse();

  // Logs go to stderr so receipts on stdout stay clean. RUST_LOG overrides the level.
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  if cli.json_logs {
    tracing_subscriber::fmt()
      .json()
      .with_env_filter(filter)
      .with_writer(std::io::stderr)
      .init();
  } else {
    tracing_subscriber::fmt()
      .with_env_filter(filter)
      .with_span_events(FmtSpan::CLOSE)
      .with_writer(std::io::stderr)
      .init();
  }

  let app_config = match AppConfig::from_env() {
    Ok(cfg) => cfg,
    Err(e) => {
      tracing::error!(error = %e, "Failed to load application configuration.");
      return ExitCode::FAILURE;
    }
  };

  let app_state = match AppState::from_config(app_config) {
    Ok(state) => state,
    Err(e) => {
      tracing::error!(error = %e, "Failed to initialise the API client.");
      return ExitCode::FAILURE;
    }
  };

  match cli::run(cli, app_state).await {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      tracing::error!(error = %e, "Command failed.");
      eprintln!("{}", e.user_message());
      ExitCode::FAILURE
    }
  }
}
