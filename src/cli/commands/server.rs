use anyhow::Context;
use clap::Args;

use crate::auth::CredentialVerifier;
use crate::config::AppConfig;
use crate::database;
use crate::state::AppState;

#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    #[arg(long, help = "Bind address (overrides API_HOST)")]
    pub host: Option<String>,

    #[arg(long, help = "Listen port (overrides API_PORT)")]
    pub port: Option<u16>,

    #[arg(long, help = "Apply the database schema before serving")]
    pub migrate: bool,
}

pub async fn handle(args: ServeArgs, mut config: AppConfig) -> anyhow::Result<()> {
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    config.database.auto_migrate |= args.migrate;

    let verifier = CredentialVerifier::new(&config.security.jwt_secret)
        .context("JWT_KEY must be set to a non-empty signing secret")?;
    let store = database::open(&config.database)
        .await
        .context("failed to open the store")?;

    let app = crate::app(AppState::new(store, verifier), &config.security);

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Listening on http://{} ({:?} mode)", bind_addr, config.environment);
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
