use clap::Parser;
use tracing_subscriber::EnvFilter;

use apitest_server::cli::{self, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env / local.env if present so cargo run picks up JWT_KEY, DATABASE_URL, etc.
    let _ = dotenvy::dotenv();
    let _ = dotenvy::from_filename("local.env");

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    let cli = Cli::parse();
    let config = apitest_server::config::config().clone();

    cli::run(cli, config).await
}
