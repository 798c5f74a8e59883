use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::Json,
};

use crate::{
    database::Database,
    error::ApiError,
    models::{CreateProduct, Movement, Product, ProductDetail},
    store,
};

pub async fn create_product(
    State(db): State<Database>,
    body: Result<Json<CreateProduct>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let Json(form) = body?;
    let product = store::create_product(&db, &form.name, form.quantity).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn products_list(State(db): State<Database>) -> Result<Json<Vec<Product>>, ApiError> {
    Ok(Json(store::list_products(&db).await?))
}

pub async fn product_detail(
    State(db): State<Database>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<ProductDetail>, ApiError> {
    let Path(product_id) = path?;
    Ok(Json(store::get_product(&db, product_id).await?))
}

pub async fn product_movements(
    State(db): State<Database>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Vec<Movement>>, ApiError> {
    let Path(product_id) = path?;
    Ok(Json(store::list_movements(&db, product_id).await?))
}
