//! Inventory store: products, the movement ledger, and the quantity invariant
//! that ties them together.
//!
//! A product's `quantity` always equals its initial quantity plus all inbound
//! movements minus all outbound movements, and is never negative. The only
//! writer of `quantity` and `last_movement_id` is [`record_movement`].

use chrono::Local;

use crate::{
    database::Database,
    error::StoreError,
    models::{Movement, MovementKind, Product, ProductDetail},
};

const MOVEMENT_COLUMNS: &str = "id, fecha, hora, quantity, kind, product_id";

pub async fn create_product(
    db: &Database,
    name: &str,
    initial_quantity: i64,
) -> Result<Product, StoreError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(StoreError::Validation("name must not be empty".to_string()));
    }
    if initial_quantity < 0 {
        return Err(StoreError::Validation(
            "quantity must not be negative".to_string(),
        ));
    }

    let product = sqlx::query_as::<_, Product>(
        r#"
        INSERT INTO products (name, quantity, last_movement_id)
        VALUES (?1, ?2, NULL)
        RETURNING id, name, quantity, last_movement_id
        "#,
    )
    .bind(name)
    .bind(initial_quantity)
    .fetch_one(db)
    .await?;

    tracing::info!(product_id = product.id, name = %product.name, quantity = product.quantity, "created product");
    Ok(product)
}

/// Applies an inbound or outbound movement to a product.
///
/// The guarded `UPDATE` is the first statement of the transaction, so the
/// stock check and the write happen under the same write lock and a
/// concurrent movement can never observe the pre-update quantity. On any
/// error the transaction is dropped and rolled back.
pub async fn record_movement(
    db: &Database,
    product_id: i64,
    quantity: i64,
    kind: MovementKind,
) -> Result<Movement, StoreError> {
    if quantity <= 0 {
        return Err(StoreError::Validation(
            "quantity must be greater than zero".to_string(),
        ));
    }

    let delta = kind.signed(quantity);
    // Highest stock level the product may hold before this movement.
    let ceiling = match kind {
        MovementKind::Inbound => i64::MAX - quantity,
        MovementKind::Outbound => i64::MAX,
    };
    let mut tx = db.begin().await?;

    let updated = sqlx::query(
        "UPDATE products SET quantity = quantity + ?1 WHERE id = ?2 AND quantity <= ?3 AND quantity + ?1 >= 0",
    )
    .bind(delta)
    .bind(product_id)
    .bind(ceiling)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    if updated == 0 {
        let available: Option<i64> =
            sqlx::query_scalar("SELECT quantity FROM products WHERE id = ?1")
                .bind(product_id)
                .fetch_optional(&mut *tx)
                .await?;
        tx.rollback().await?;

        return Err(match available {
            None => StoreError::ProductNotFound(product_id),
            Some(available) if kind == MovementKind::Inbound => {
                tracing::warn!(product_id, requested = quantity, available, "rejected inbound movement");
                StoreError::Validation(format!(
                    "inbound quantity {quantity} would overflow the stock of product {product_id} ({available})"
                ))
            }
            Some(available) => {
                tracing::warn!(product_id, requested = quantity, available, "rejected outbound movement");
                StoreError::InsufficientQuantity {
                    product_id,
                    requested: quantity,
                    available,
                }
            }
        });
    }

    let now = Local::now().naive_local();
    let movement = sqlx::query_as::<_, Movement>(&format!(
        r#"
        INSERT INTO movements (fecha, hora, quantity, kind, product_id)
        VALUES (?1, ?2, ?3, ?4, ?5)
        RETURNING {MOVEMENT_COLUMNS}
        "#
    ))
    .bind(now.date())
    .bind(now.time())
    .bind(quantity)
    .bind(kind)
    .bind(product_id)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query("UPDATE products SET last_movement_id = ?1 WHERE id = ?2")
        .bind(movement.id)
        .bind(product_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!(
        product_id,
        movement_id = movement.id,
        %kind,
        quantity,
        "recorded movement"
    );
    Ok(movement)
}

pub async fn get_product(db: &Database, product_id: i64) -> Result<ProductDetail, StoreError> {
    // Read product and ledger from one snapshot.
    let mut tx = db.begin().await?;

    let product = fetch_product(&mut tx, product_id).await?;
    let movements = fetch_movements(&mut tx, product_id).await?;

    tx.commit().await?;
    Ok(ProductDetail { product, movements })
}

pub async fn list_products(db: &Database) -> Result<Vec<Product>, StoreError> {
    let products = sqlx::query_as::<_, Product>(
        "SELECT id, name, quantity, last_movement_id FROM products ORDER BY id",
    )
    .fetch_all(db)
    .await?;

    Ok(products)
}

pub async fn list_movements(db: &Database, product_id: i64) -> Result<Vec<Movement>, StoreError> {
    let mut tx = db.begin().await?;

    fetch_product(&mut tx, product_id).await?;
    let movements = fetch_movements(&mut tx, product_id).await?;

    tx.commit().await?;
    Ok(movements)
}

async fn fetch_product(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    product_id: i64,
) -> Result<Product, StoreError> {
    sqlx::query_as::<_, Product>(
        "SELECT id, name, quantity, last_movement_id FROM products WHERE id = ?1",
    )
    .bind(product_id)
    .fetch_optional(&mut **tx)
    .await?
    .ok_or(StoreError::ProductNotFound(product_id))
}

async fn fetch_movements(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    product_id: i64,
) -> Result<Vec<Movement>, StoreError> {
    let movements = sqlx::query_as::<_, Movement>(&format!(
        "SELECT {MOVEMENT_COLUMNS} FROM movements WHERE product_id = ?1 ORDER BY fecha, hora, id"
    ))
    .bind(product_id)
    .fetch_all(&mut **tx)
    .await?;

    Ok(movements)
}
