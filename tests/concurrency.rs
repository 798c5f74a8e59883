use tempfile::TempDir;

use stockroom::{
    database::{create_database_pool, create_schema, Database},
    error::StoreError,
    models::MovementKind,
    store,
};

/// A file-backed database, so the pool holds several real connections.
/// Fields drop in order: the pool, then the directory with its `-wal`/`-shm` files.
struct FileDatabase {
    db: Database,
    _dir: TempDir,
}

impl FileDatabase {
    async fn create(max_connections: u32) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let url = format!("sqlite://{}", dir.path().join("stockroom.db").display());
        let db = create_database_pool(&url, max_connections)
            .await
            .expect("file database");
        create_schema(&db).await.expect("schema");
        Self { db, _dir: dir }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn only_one_full_withdrawal_succeeds() {
    const CALLERS: usize = 8;

    let file = FileDatabase::create(CALLERS as u32).await;
    let product = store::create_product(&file.db, "widget", 10).await.unwrap();
    let product_id = product.id;

    let handles: Vec<_> = (0..CALLERS)
        .map(|_| {
            let db = file.db.clone();
            tokio::spawn(async move {
                store::record_movement(&db, product_id, 10, MovementKind::Outbound).await
            })
        })
        .collect();

    let mut successes = 0;
    let mut rejected = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(StoreError::InsufficientQuantity { available: 0, .. }) => rejected += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
    assert_eq!(successes, 1);
    assert_eq!(rejected, CALLERS - 1);

    let detail = store::get_product(&file.db, product.id).await.unwrap();
    assert_eq!(detail.product.quantity, 0);
    assert_eq!(detail.movements.len(), 1);
    assert_eq!(detail.product.last_movement_id, Some(detail.movements[0].id));

    file.db.close().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn mixed_movements_keep_quantity_and_ledger_in_step() {
    const CALLERS: usize = 24;
    const INITIAL: i64 = 5;

    let file = FileDatabase::create(6).await;
    let product = store::create_product(&file.db, "bolt", INITIAL).await.unwrap();
    let product_id = product.id;

    let handles: Vec<_> = (0..CALLERS)
        .map(|i| {
            let db = file.db.clone();
            let (quantity, kind) = if i % 3 == 0 {
                (2, MovementKind::Inbound)
            } else {
                (3, MovementKind::Outbound)
            };
            tokio::spawn(async move {
                store::record_movement(&db, product_id, quantity, kind)
                    .await
                    .map(|movement| kind.signed(movement.quantity))
            })
        })
        .collect();

    let mut applied = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(delta) => applied += delta,
            Err(StoreError::InsufficientQuantity { .. }) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    let detail = store::get_product(&file.db, product.id).await.unwrap();
    let ledger: i64 = detail
        .movements
        .iter()
        .map(|m| m.kind.signed(m.quantity))
        .sum();

    assert!(detail.product.quantity >= 0);
    assert_eq!(detail.product.quantity, INITIAL + applied);
    assert_eq!(detail.product.quantity, INITIAL + ledger);

    file.db.close().await;
}
