use clap::Parser;
use miette::{IntoDiagnostic, Result};
use rutina::config::AppConfig;
use rutina::interfaces::cli::{self, Cli};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout is reserved for command output (tables, CSV).
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::from_env().into_diagnostic()?;

    cli::run(cli, config).await.into_diagnostic()?;
    Ok(())
}
