// Redis-based Rate Limiting untuk Order Service
use axum::{
    extract::{Request, State},
    http::{HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use redis::{AsyncCommands, Client};
use shared::utils::token_extraction::extract_client_ip;
use std::env;
use thiserror::Error;

use crate::{config::AppState, middleware::auth::AuthUser};

// Configuration dari environment variables
#[derive(Debug, Clone, PartialEq)]
pub struct RateLimitConfig {
    pub guest_requests_per_hour: u32,
    pub dealer_requests_per_hour: u32,
    pub vendor_requests_per_hour: u32,
    pub admin_requests_per_hour: u32,
    pub sensitive_requests_per_hour: u32,
    pub window_seconds: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            guest_requests_per_hour: 100,
            dealer_requests_per_hour: 300,
            vendor_requests_per_hour: 500,
            admin_requests_per_hour: 500,
            sensitive_requests_per_hour: 60,
            window_seconds: 3600,
        }
    }
}

fn env_limit(key: &str, default: u32) -> Result<u32, RateLimitError> {
    match env::var(key) {
        Ok(raw) => raw.parse().map_err(|_| RateLimitError::Configuration),
        Err(_) => Ok(default),
    }
}

impl RateLimitConfig {
    // Load config dari environment dengan validation
    pub fn from_env() -> Result<Self, RateLimitError> {
        let defaults = Self::default();

        let config = Self {
            guest_requests_per_hour: env_limit("RATE_LIMIT_GUEST_REQUESTS", defaults.guest_requests_per_hour)?,
            dealer_requests_per_hour: env_limit("RATE_LIMIT_DEALER_REQUESTS", defaults.dealer_requests_per_hour)?,
            vendor_requests_per_hour: env_limit("RATE_LIMIT_VENDOR_REQUESTS", defaults.vendor_requests_per_hour)?,
            admin_requests_per_hour: env_limit("RATE_LIMIT_ADMIN_REQUESTS", defaults.admin_requests_per_hour)?,
            sensitive_requests_per_hour: env_limit("RATE_LIMIT_SENSITIVE_ENDPOINTS", defaults.sensitive_requests_per_hour)?,
            window_seconds: defaults.window_seconds,
        };

        config.validate()?;

        if config.sensitive_requests_per_hour > 300 {
            tracing::warn!("⚠️ Sensitive endpoint rate limit sangat tinggi: {}", config.sensitive_requests_per_hour);
        }

        Ok(config)
    }

    fn validate(&self) -> Result<(), RateLimitError> {
        let limits = [
            self.guest_requests_per_hour,
            self.dealer_requests_per_hour,
            self.vendor_requests_per_hour,
            self.admin_requests_per_hour,
            self.sensitive_requests_per_hour,
        ];

        if limits.contains(&0) {
            return Err(RateLimitError::Configuration);
        }
        Ok(())
    }

    /// Tentukan max requests berdasarkan role dan sensitivitas endpoint
    pub fn max_requests(&self, role: &str, method: &Method, path: &str) -> u32 {
        if is_sensitive_endpoint(method, path) {
            return self.sensitive_requests_per_hour;
        }

        match role {
            "dealer" => self.dealer_requests_per_hour,
            "vendor" => self.vendor_requests_per_hour,
            "admin" => self.admin_requests_per_hour,
            _ => self.guest_requests_per_hour,
        }
    }
}

// Write operation ke order (create order, update status)
pub fn is_sensitive_endpoint(method: &Method, path: &str) -> bool {
    let is_write = matches!(*method, Method::POST | Method::PUT | Method::PATCH | Method::DELETE);
    is_write && path.contains("/orders")
}

// Scope window rate limit. Write ke order dihitung per user (bukan per order),
// segment UUID di path dinormalisasi supaya satu route = satu window
pub fn rate_limit_scope(method: &Method, path: &str) -> String {
    if is_sensitive_endpoint(method, path) {
        return format!("{}:orders", method);
    }

    let route: Vec<&str> = path
        .split('/')
        .map(|segment| {
            if uuid::Uuid::parse_str(segment).is_ok() {
                "{id}"
            } else {
                segment
            }
        })
        .collect();

    format!("{}:{}", method, route.join("/"))
}

// Rate limiter dengan Redis backend
#[derive(Clone)]
pub struct RateLimiter {
    redis_client: Client,
    config: RateLimitConfig,
}

impl RateLimiter {
    // Initialize rate limiter, koneksi Redis dibuat lazily per request
    pub fn new(redis_url: &str, config: RateLimitConfig) -> Result<Self, RateLimitError> {
        let redis_client = Client::open(redis_url.to_string())
            .map_err(RateLimitError::RedisConnection)?;

        Ok(Self {
            redis_client,
            config,
        })
    }

    // Sliding window check untuk identifier, role, dan endpoint tertentu
    pub async fn check_rate_limit(
        &self,
        identifier: &str,
        role: &str,
        method: &Method,
        path: &str,
    ) -> Result<RateLimitResult, RateLimitError> {
        let mut conn = self.redis_client.get_multiplexed_async_connection()
            .await
            .map_err(RateLimitError::RedisConnection)?;

        let window_key = format!(
            "rate_limit:orders:{}:{}:{}",
            identifier,
            role,
            rate_limit_scope(method, path)
        );
        let now_millis = chrono::Utc::now().timestamp_millis();
        let window_millis = (self.config.window_seconds * 1000) as i64;
        let window_start = now_millis - window_millis;

        // Cleanup old entries dalam sliding window
        let _: () = conn
            .zrembyscore(&window_key, "-inf", window_start)
            .await
            .map_err(RateLimitError::RedisOperation)?;

        let current_count: u32 = conn
            .zcard(&window_key)
            .await
            .map_err(RateLimitError::RedisOperation)?;

        let max_requests = self.config.max_requests(role, method, path);

        // Member unik supaya request di milidetik yang sama tetap terhitung
        let member = format!("{}-{}", now_millis, rand::random::<u32>());
        let _: () = conn
            .zadd(&window_key, member, now_millis)
            .await
            .map_err(RateLimitError::RedisOperation)?;

        let _: () = conn
            .expire(&window_key, self.config.window_seconds as i64)
            .await
            .map_err(RateLimitError::RedisOperation)?;

        Ok(RateLimitResult::evaluate(
            current_count,
            max_requests,
            (now_millis / 1000) as u64 + self.config.window_seconds,
        ))
    }
}

// Rate limit check result
#[derive(Debug, Clone, PartialEq)]
pub struct RateLimitResult {
    pub allowed: bool,
    pub current_count: u32,
    pub max_requests: u32,
    pub remaining: u32,
    pub reset_time: u64,
}

impl RateLimitResult {
    fn evaluate(previous_count: u32, max_requests: u32, reset_time: u64) -> Self {
        let allowed = previous_count < max_requests;
        let remaining = if allowed {
            max_requests.saturating_sub(previous_count + 1)
        } else {
            0
        };

        Self {
            allowed,
            current_count: previous_count + 1,
            max_requests,
            remaining,
            reset_time,
        }
    }
}

// Error handling untuk rate limiting
#[derive(Error, Debug)]
pub enum RateLimitError {
    #[error("Redis connection error: {0}")]
    RedisConnection(redis::RedisError),
    #[error("Redis operation error: {0}")]
    RedisOperation(redis::RedisError),
    #[error("Rate limit configuration error")]
    Configuration,
}

// Rate limiting middleware untuk Axum
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let method = request.method().clone();

    let (identifier, role) = match request.extensions().get::<AuthUser>() {
        Some(auth) => (
            format!("user:{}", auth.user_id),
            auth.role.map(|r| r.as_str()).unwrap_or("guest"),
        ),
        None => (
            format!(
                "ip:{}",
                extract_client_ip(request.headers()).unwrap_or_else(|| "unknown".to_string())
            ),
            "guest",
        ),
    };

    match state.rate_limiter.check_rate_limit(&identifier, role, &method, &path).await {
        Ok(result) if result.allowed => {
            let mut response = next.run(request).await;
            let headers = response.headers_mut();

            headers.insert("X-RateLimit-Limit", HeaderValue::from(result.max_requests));
            headers.insert("X-RateLimit-Used", HeaderValue::from(result.current_count));
            headers.insert("X-RateLimit-Remaining", HeaderValue::from(result.remaining));
            headers.insert("X-RateLimit-Reset", HeaderValue::from(result.reset_time));

            response
        }
        Ok(result) => {
            tracing::warn!(
                "🚨 Rate limit exceeded - identifier: {}, endpoint: {} {}, role: {}",
                identifier, method, path, role
            );

            let error_response = axum::Json(serde_json::json!({
                "error": "rate_limit_exceeded",
                "message": "Too many requests. Please try again later.",
                "retry_after": result.reset_time,
            }));

            (StatusCode::TOO_MANY_REQUESTS, error_response).into_response()
        }
        Err(e) => {
            tracing::error!("💥 Rate limiting error: {}", e);
            // Fail-open jika Redis bermasalah
            next.run(request).await
        }
    }
}
