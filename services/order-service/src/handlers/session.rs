// Handlers untuk session caller dan role guard halaman browser
use axum::{extract::Query, response::Json};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    domain::{
        access::{GuardResponse, Page, ACCESS_DENIED_NOTICE},
        profile::SessionResponse,
    },
    error::AppError,
    middleware::auth::{AuthUser, MaybeAuthUser},
};

// Query untuk GET /api/guard
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GuardQuery {
    /// Route browser, contoh /dealer/new-order
    pub path: String,
}

// Identity + profile caller yang sedang login
#[utoipa::path(
    get,
    path = "/api/session",
    tag = "session",
    summary = "Session caller",
    description = "Identity, role, dan home route user yang sedang login. Role dibaca dari tabel profiles",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Session aktif", body = SessionResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "User belum memiliki profile")
    )
)]
pub async fn get_session(auth: AuthUser) -> Result<Json<SessionResponse>, AppError> {
    let profile = auth
        .profile
        .ok_or_else(|| AppError::forbidden(ACCESS_DENIED_NOTICE))?;

    Ok(Json(SessionResponse::new(auth.email, profile)))
}

// Keputusan role guard untuk route browser
#[utoipa::path(
    get,
    path = "/api/guard",
    tag = "session",
    summary = "Cek akses halaman",
    description = "Menentukan apakah caller boleh membuka halaman: authorized, redirect_to_login, atau access_denied. Token opsional",
    params(GuardQuery),
    responses(
        (status = 200, description = "Keputusan guard", body = GuardResponse),
        (status = 400, description = "Format path tidak valid"),
        (status = 404, description = "Route tidak dikenal")
    )
)]
pub async fn check_guard(
    MaybeAuthUser(auth): MaybeAuthUser,
    Query(query): Query<GuardQuery>,
) -> Result<Json<GuardResponse>, AppError> {
    if !query.path.trim().starts_with('/') {
        return Err(AppError::bad_request("path harus diawali '/'"));
    }

    let page = Page::from_path(&query.path)
        .ok_or_else(|| AppError::not_found(format!("Route {} tidak dikenal", query.path)))?;

    let identity = auth.as_ref().map(AuthUser::identity);
    let decision = page.check(identity.as_ref());

    tracing::debug!("Guard check - path: {}, decision: {:?}", query.path, decision);

    Ok(Json(GuardResponse::from(decision)))
}
