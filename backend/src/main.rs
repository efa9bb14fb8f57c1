//! Linktree service entry-point: loads settings, selects the store, and
//! serves the REST API with health probes and OpenAPI docs.

mod server;

use std::sync::Arc;

use actix_web::web;
use color_eyre::eyre::{Context, Result, eyre};
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use linktree::domain::TokenAuthority;
use linktree::inbound::http::health::HealthState;
use linktree::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use linktree::settings::fingerprint::secret_fingerprint;
use linktree::settings::{BuildMode, LinktreeSettings};
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = LinktreeSettings::load_from_iter(std::env::args_os())
        .map_err(|err| eyre!("failed to load configuration: {err}"))?;

    let secret = settings
        .signing_secret(BuildMode::from_debug_assertions())
        .wrap_err("failed to resolve signing secret")?;
    info!(
        fingerprint = %secret_fingerprint(&secret),
        "token signing secret loaded"
    );
    let tokens = TokenAuthority::new(&secret, Arc::new(DefaultClock))
        .with_ttl(settings.token_ttl().wrap_err("invalid token lifetime")?);

    let mut config = ServerConfig::new(settings.bind_addr(), tokens);
    if let Some(database_url) = settings.database_url() {
        run_migrations(database_url)
            .await
            .wrap_err("failed to apply database migrations")?;
        let pool = DbPool::new(
            PoolConfig::new(database_url).with_max_size(settings.db_max_connections()),
        )
        .await
        .wrap_err("failed to build database pool")?;
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config).wrap_err("failed to start server")?;
    info!(bind_addr = %settings.bind_addr(), "listening");
    server.await.wrap_err("server terminated abnormally")
}
