use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};

pub type Database = Pool<Sqlite>;

const SCHEMA: [&str; 3] = [
    r#"
    CREATE TABLE IF NOT EXISTS products (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        quantity INTEGER NOT NULL DEFAULT 0 CHECK (typeof(quantity) = 'integer' AND quantity >= 0),
        last_movement_id INTEGER REFERENCES movements(id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS movements (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        fecha DATE NOT NULL,
        hora TIME NOT NULL,
        quantity INTEGER NOT NULL CHECK (quantity > 0),
        kind TEXT NOT NULL CHECK (kind IN ('inbound', 'outbound')),
        product_id INTEGER NOT NULL REFERENCES products(id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_movements_product ON movements (product_id, fecha, hora, id)",
];

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

pub async fn create_database_pool(
    database_url: &str,
    max_connections: u32,
) -> Result<Database, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    // An in-memory database lives and dies with its connection.
    let pool = if is_in_memory(database_url) {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?
    } else {
        SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?
    };

    // Test the connection
    sqlx::query("SELECT 1").fetch_one(&pool).await?;

    tracing::debug!(database_url, "connected to database");
    Ok(pool)
}

/// Creates the `products` and `movements` tables if they do not exist yet.
pub async fn create_schema(db: &Database) -> Result<(), sqlx::Error> {
    let mut tx = db.begin().await?;
    for statement in SCHEMA {
        sqlx::query(statement).execute(&mut *tx).await?;
    }
    tx.commit().await
}

/// Row counts removed by [`clear_tables`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearedRows {
    pub movements: u64,
    pub products: u64,
}

/// Empties both tables in one transaction. Ids are not reused afterwards.
pub async fn clear_tables(db: &Database) -> Result<ClearedRows, sqlx::Error> {
    let mut tx = db.begin().await?;

    sqlx::query("UPDATE products SET last_movement_id = NULL")
        .execute(&mut *tx)
        .await?;
    let movements = sqlx::query("DELETE FROM movements")
        .execute(&mut *tx)
        .await?
        .rows_affected();
    let products = sqlx::query("DELETE FROM products")
        .execute(&mut *tx)
        .await?
        .rows_affected();

    tx.commit().await?;
    Ok(ClearedRows { movements, products })
}

#[cfg(test)]
pub(crate) async fn test_pool() -> Database {
    let db = create_database_pool("sqlite::memory:", 1)
        .await
        .expect("in-memory database");
    create_schema(&db).await.expect("schema");
    db
}
