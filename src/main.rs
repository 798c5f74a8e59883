use anyhow::Context;
use dotenvy::dotenv;

use stockroom::{
    config::Config,
    create_router,
    database::{create_database_pool, create_schema},
    logging,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    logging::init();

    let config = Config::from_env().context("invalid configuration")?;

    let db = create_database_pool(&config.database_url, config.max_connections)
        .await
        .with_context(|| format!("failed to connect to {}", config.database_url))?;
    create_schema(&db).await.context("failed to create schema")?;

    let app = create_router(db);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!("stockroom listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
