use sqlx::PgPool;
use uuid::Uuid;

use crate::{domain::product::Product, error::AppError};

const MAX_PRODUCT_PAGE: i64 = 100;

// Katalog produk aktif, urut nama. limit None berarti semua produk
pub async fn find_active_products(
    pool: &PgPool,
    limit: Option<i64>,
) -> Result<Vec<Product>, AppError> {
    let limit = limit.map(|l| l.clamp(1, MAX_PRODUCT_PAGE));

    let products = sqlx::query_as(
        "SELECT * FROM products
         WHERE is_active = TRUE
         ORDER BY name ASC
         LIMIT $1"
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(products)
}

// Ambil produk aktif by id, produk non-aktif dianggap tidak ada
pub async fn find_active_product_by_id(
    pool: &PgPool,
    id: Uuid,
) -> Result<Option<Product>, AppError> {
    let product = sqlx::query_as(
        "SELECT * FROM products WHERE id = $1 AND is_active = TRUE"
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(product)
}
