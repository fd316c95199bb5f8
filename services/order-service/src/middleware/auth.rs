// JWT Authentication + role resolution untuk Order Service
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use shared::utils::{
    jwt,
    token_extraction::{extract_auth_header, extract_bearer_token},
};
use std::convert::Infallible;
use uuid::Uuid;

use crate::{
    config::AppState,
    domain::{
        access::{guard, GuardDecision, Identity, ACCESS_DENIED_NOTICE},
        profile::{Profile, Role},
    },
    error::AppError,
    repositories::profile_repo,
};

// User authentication context, role berasal dari tabel profiles (bukan dari token)
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
    pub role: Option<Role>,
    pub profile: Option<Profile>,
}

impl AuthUser {
    pub fn identity(&self) -> Identity {
        Identity {
            user_id: self.user_id,
            role: self.role,
        }
    }
}

// Caller yang mungkin belum login (endpoint dengan auth opsional)
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<AuthUser>);

// Dealer authentication context
#[derive(Debug, Clone)]
pub struct AuthDealer {
    pub user_id: Uuid,
    pub email: String,
}

// Vendor authentication context
#[derive(Debug, Clone)]
pub struct AuthVendor {
    pub user_id: Uuid,
}

// Admin authentication context
#[derive(Debug, Clone)]
pub struct AuthAdmin {
    pub user_id: Uuid,
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| AppError::unauthorized("Authentication required"))
    }
}

impl<S> FromRequestParts<S> for MaybeAuthUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeAuthUser(parts.extensions.get::<AuthUser>().cloned()))
    }
}

// Role guard dijalankan sebelum handler menyentuh data role-scoped
fn require_role(parts: &Parts, required: Role) -> Result<AuthUser, AppError> {
    let auth_user = parts.extensions.get::<AuthUser>();
    let identity = auth_user.map(AuthUser::identity);

    match guard(identity.as_ref(), required) {
        GuardDecision::Authorized => auth_user
            .cloned()
            .ok_or_else(|| AppError::unauthorized("Authentication required")),
        GuardDecision::RedirectToLogin => Err(AppError::unauthorized("Authentication required")),
        GuardDecision::AccessDenied { .. } => {
            tracing::warn!(
                "Access denied - user: {:?}, required role: {}",
                identity.as_ref().map(|i| i.user_id),
                required
            );
            Err(AppError::forbidden(ACCESS_DENIED_NOTICE))
        }
    }
}

impl<S> FromRequestParts<S> for AuthDealer
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_user = require_role(parts, Role::Dealer)?;

        Ok(AuthDealer {
            user_id: auth_user.user_id,
            email: auth_user.email,
        })
    }
}

impl<S> FromRequestParts<S> for AuthVendor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_user = require_role(parts, Role::Vendor)?;

        Ok(AuthVendor {
            user_id: auth_user.user_id,
        })
    }
}

impl<S> FromRequestParts<S> for AuthAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_user = require_role(parts, Role::Admin)?;

        Ok(AuthAdmin {
            user_id: auth_user.user_id,
        })
    }
}

// Extract Bearer token dari Authorization header
fn extract_jwt_token(headers: &HeaderMap) -> Result<String, AppError> {
    let auth_header = extract_auth_header(headers).ok_or_else(|| {
        AppError::unauthorized("Authorization header dengan Bearer token diperlukan")
    })?;

    extract_bearer_token(&auth_header)
        .ok_or_else(|| AppError::unauthorized("Bearer token format diperlukan"))
}

// Validasi token lalu resolve role dari tabel profiles
async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<AuthUser, AppError> {
    let token = extract_jwt_token(headers)?;

    let claims = jwt::validate_token(&token, &state.config.jwt_secret).map_err(|e| {
        tracing::debug!("JWT validation failed: {}", e);
        AppError::unauthorized("Token tidak valid atau sudah expired")
    })?;

    let profile = profile_repo::find_profile_by_id(&state.db, claims.sub).await?;

    if profile.is_none() {
        tracing::warn!("Authenticated user {} tidak memiliki profile", claims.sub);
    }

    Ok(AuthUser {
        user_id: claims.sub,
        email: claims.email,
        role: profile.as_ref().map(|p| p.role),
        profile,
    })
}

// JWT Authentication middleware, request tanpa token valid ditolak
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = request.uri().path().to_string();

    let auth_user = authenticate(&state, request.headers()).await?;

    tracing::debug!(
        "User authenticated - ID: {}, Role: {:?}, Endpoint: {}",
        auth_user.user_id,
        auth_user.role,
        path
    );

    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

// Auth opsional: token valid di-inject, token kosong/invalid diteruskan sebagai guest
pub async fn optional_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    match authenticate(&state, request.headers()).await {
        Ok(auth_user) => {
            request.extensions_mut().insert(auth_user);
        }
        Err(AppError::Unauthorized(_)) => {}
        Err(e) => return Err(e),
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, StatusCode};
    use axum::response::IntoResponse;

    fn auth_user(role: Option<Role>) -> AuthUser {
        AuthUser {
            user_id: Uuid::new_v4(),
            email: "someone@example.com".to_string(),
            role,
            profile: None,
        }
    }

    fn parts_with(user: Option<AuthUser>) -> Parts {
        let mut request = axum::http::Request::builder()
            .uri("/api/dealer/orders")
            .body(axum::body::Body::empty())
            .unwrap();
        if let Some(user) = user {
            request.extensions_mut().insert(user);
        }
        request.into_parts().0
    }

    #[tokio::test]
    async fn test_dealer_extractor_accepts_dealer() {
        let user = auth_user(Some(Role::Dealer));
        let mut parts = parts_with(Some(user.clone()));

        let dealer = AuthDealer::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(dealer.user_id, user.user_id);
    }

    #[tokio::test]
    async fn test_missing_identity_is_unauthorized() {
        let mut parts = parts_with(None);

        let err = AuthVendor::from_request_parts(&mut parts, &()).await.unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_wrong_role_is_forbidden() {
        let mut parts = parts_with(Some(auth_user(Some(Role::Dealer))));
        let err = AuthAdmin::from_request_parts(&mut parts, &()).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(ref msg) if msg == ACCESS_DENIED_NOTICE));

        let mut parts = parts_with(Some(auth_user(Some(Role::Vendor))));
        let err = AuthDealer::from_request_parts(&mut parts, &()).await.unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_identity_without_profile_is_forbidden_everywhere() {
        let user = auth_user(None);

        let mut parts = parts_with(Some(user.clone()));
        assert!(AuthDealer::from_request_parts(&mut parts, &()).await.is_err());
        let mut parts = parts_with(Some(user.clone()));
        assert!(AuthVendor::from_request_parts(&mut parts, &()).await.is_err());
        let mut parts = parts_with(Some(user));
        let err = AuthAdmin::from_request_parts(&mut parts, &()).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_maybe_auth_user_never_rejects() {
        let mut parts = parts_with(None);
        let MaybeAuthUser(user) = MaybeAuthUser::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert!(user.is_none());

        let mut parts = parts_with(Some(auth_user(Some(Role::Admin))));
        let MaybeAuthUser(user) = MaybeAuthUser::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(user.and_then(|u| u.role), Some(Role::Admin));
    }

    #[test]
    fn test_extract_jwt_token() {
        let mut headers = HeaderMap::new();
        assert!(extract_jwt_token(&headers).is_err());

        headers.insert("authorization", HeaderValue::from_static("Basic abc"));
        assert!(extract_jwt_token(&headers).is_err());

        headers.insert("authorization", HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(extract_jwt_token(&headers).unwrap(), "abc.def.ghi");
    }
}
