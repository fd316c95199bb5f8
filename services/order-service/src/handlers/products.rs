// Handlers untuk katalog produk (dealer)
use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use uuid::Uuid;

use crate::{
    config::AppState,
    domain::product::{ProductQueryParams, ProductResponse},
    error::AppError,
    middleware::auth::AuthDealer,
    repositories::product_repo,
};

// List produk aktif
#[utoipa::path(
    get,
    path = "/api/products",
    tag = "products",
    summary = "Katalog produk",
    description = "Produk aktif urut nama. Tanpa limit berarti seluruh katalog",
    security(
        ("bearer_auth" = [])
    ),
    params(ProductQueryParams),
    responses(
        (status = 200, description = "Daftar produk", body = Vec<ProductResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Access denied")
    )
)]
pub async fn list_products(
    State(state): State<AppState>,
    _auth: AuthDealer,
    Query(params): Query<ProductQueryParams>,
) -> Result<Json<Vec<ProductResponse>>, AppError> {
    let products = product_repo::find_active_products(&state.db, params.limit).await?;

    Ok(Json(products.into_iter().map(ProductResponse::from).collect()))
}

// Detail satu produk aktif
#[utoipa::path(
    get,
    path = "/api/products/{id}",
    tag = "products",
    summary = "Detail produk",
    description = "Produk aktif untuk form order",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = Uuid, Path, description = "ID produk")
    ),
    responses(
        (status = 200, description = "Detail produk", body = ProductResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Access denied"),
        (status = 404, description = "Produk tidak ditemukan")
    )
)]
pub async fn get_product(
    State(state): State<AppState>,
    _auth: AuthDealer,
    Path(product_id): Path<Uuid>,
) -> Result<Json<ProductResponse>, AppError> {
    let product = product_repo::find_active_product_by_id(&state.db, product_id)
        .await?
        .ok_or_else(|| AppError::not_found("Product not found"))?;

    Ok(Json(ProductResponse::from(product)))
}
