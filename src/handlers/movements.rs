use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Json,
};

use crate::{
    database::Database,
    error::ApiError,
    models::{Movement, MovementKind, RecordMovement},
    store,
};

pub async fn record_inbound(
    State(db): State<Database>,
    body: Result<Json<RecordMovement>, JsonRejection>,
) -> Result<(StatusCode, Json<Movement>), ApiError> {
    record(&db, body, MovementKind::Inbound).await
}

pub async fn record_outbound(
    State(db): State<Database>,
    body: Result<Json<RecordMovement>, JsonRejection>,
) -> Result<(StatusCode, Json<Movement>), ApiError> {
    record(&db, body, MovementKind::Outbound).await
}

async fn record(
    db: &Database,
    body: Result<Json<RecordMovement>, JsonRejection>,
    kind: MovementKind,
) -> Result<(StatusCode, Json<Movement>), ApiError> {
    let Json(form) = body?;
    let movement = store::record_movement(db, form.product_id, form.quantity, kind).await?;
    Ok((StatusCode::CREATED, Json(movement)))
}
