//! Empties the `products` and `movements` tables of the configured database.

use anyhow::Context;
use dotenvy::dotenv;

use stockroom::{
    config::Config,
    database::{clear_tables, create_database_pool, create_schema},
    logging,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    logging::init();

    let config = Config::from_env().context("invalid configuration")?;
    let db = create_database_pool(&config.database_url, 1)
        .await
        .with_context(|| format!("failed to connect to {}", config.database_url))?;
    create_schema(&db).await.context("failed to create schema")?;

    let cleared = clear_tables(&db).await.context("failed to clear tables")?;
    tracing::info!(
        movements = cleared.movements,
        products = cleared.products,
        "cleared all tables in {}",
        config.database_url
    );

    db.close().await;
    Ok(())
}
