pub mod commands;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;

#[derive(Parser)]
#[command(name = "apitest-server")]
#[command(about = "Backend for saved HTTP requests organised in per-user folders")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve(commands::server::ServeArgs),

    #[command(about = "Apply the database schema and exit")]
    Migrate,
}

pub async fn run(cli: Cli, config: AppConfig) -> anyhow::Result<()> {
    match cli.command {
        Some(Commands::Serve(args)) => commands::server::handle(args, config).await,
        Some(Commands::Migrate) => commands::migrate::handle(config).await,
        None => commands::server::handle(Default::default(), config).await,
    }
}
