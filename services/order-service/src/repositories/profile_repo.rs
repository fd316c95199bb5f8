use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    domain::profile::{Profile, Role},
    error::AppError,
};

// Ambil profile by id (id = identity id dari JWT)
pub async fn find_profile_by_id(
    pool: &PgPool,
    id: Uuid,
) -> Result<Option<Profile>, AppError> {
    let profile = sqlx::query_as(
        "SELECT id, role, full_name, company_name, created_at
         FROM profiles
         WHERE id = $1"
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(profile)
}

// Hitung jumlah profile dengan role tertentu
pub async fn count_profiles_by_role(
    pool: &PgPool,
    role: Role,
) -> Result<i64, AppError> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM profiles WHERE role = $1"
    )
    .bind(role)
    .fetch_one(pool)
    .await?;

    Ok(count)
}
