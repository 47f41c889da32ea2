use std::net::SocketAddr;

use anyhow::Context;
use dotenvy::dotenv;
use envconfig::Envconfig;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

use treeboard::config::Config;
use treeboard::create_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("treeboard=info,tower_http=info")),
        )
        .init();

    let config = Config::init_from_env().context("failed to read configuration")?;

    let db_pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .context("failed to create database pool")?;

    sqlx::migrate!()
        .run(&db_pool)
        .await
        .context("failed to apply migrations")?;

    let app = create_router(db_pool);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    tracing::info!(%addr, "listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
