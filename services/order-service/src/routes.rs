// API Routes untuk order-service dengan OpenAPI documentation
use axum::{
    extract::State,
    http::{header, HeaderValue},
    routing::{get, put},
    Json, Router,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    config::{check_db_health, AppState, HealthStatus},
    domain::{
        access::GuardResponse,
        dashboard::{AdminDashboardResponse, AdminStats, DealerDashboardResponse, VendorDashboardResponse},
        order::{
            DealerSummary, OrderDetailResponse, OrderItem, OrderResponse, OrderStatus,
            OrderWithDealerResponse, StatusBucket, VendorUpdateRequest,
        },
        order_form::{CreateOrderRequest, DimensionUnit},
        product::ProductResponse,
        profile::{Role, SessionResponse},
    },
    handlers::{admin, dealer, products, session, vendor},
    middleware::{
        auth::{jwt_auth_middleware, optional_auth_middleware},
        rate_limit::rate_limit_middleware,
    },
};

// Security scheme modifier untuk Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

// OpenAPI Documentation untuk order-service
#[derive(OpenApi)]
#[openapi(
    paths(
        // Session & guard
        session::get_session,
        session::check_guard,

        // Products
        products::list_products,
        products::get_product,

        // Dealer
        dealer::get_dealer_dashboard,
        dealer::get_dealer_orders,
        dealer::get_dealer_order_history,
        dealer::get_dealer_order,
        dealer::create_order,

        // Vendor
        vendor::get_vendor_orders,
        vendor::update_vendor_order,

        // Admin
        admin::get_admin_dashboard
    ),
    modifiers(&SecurityAddon),
    components(
        schemas(
            Role,
            SessionResponse,
            GuardResponse,
            ProductResponse,
            OrderStatus,
            StatusBucket,
            OrderResponse,
            OrderItem,
            OrderDetailResponse,
            DealerSummary,
            OrderWithDealerResponse,
            DimensionUnit,
            CreateOrderRequest,
            VendorUpdateRequest,
            DealerDashboardResponse,
            VendorDashboardResponse,
            AdminDashboardResponse,
            AdminStats,
            HealthStatus
        )
    ),
    tags(
        (name = "session", description = "Session caller dan role guard halaman"),
        (name = "products", description = "Katalog produk merchandise"),
        (name = "dealer", description = "Dashboard dan order dealer"),
        (name = "vendor", description = "Pemrosesan order oleh vendor"),
        (name = "admin", description = "Overview order dan statistik")
    ),
    info(
        title = "Order Service API",
        description = "API pemesanan merchandise untuk dealer, vendor, dan admin\n\n## Features\n\n- Role guard per halaman (dealer / vendor / admin)\n- Order lifecycle dengan transisi status tervalidasi\n- Dashboard per role\n- Redis-based Rate Limiting\n\n## Authentication\n\nEndpoint membutuhkan JWT Bearer token. Role dibaca dari tabel profiles di setiap request.\nInclude token in `Authorization: Bearer {token}` header.",
        version = "1.0.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub struct ApiDoc;

// Health check endpoint
async fn health_check(State(pool): State<sqlx::PgPool>) -> Json<HealthStatus> {
    let db_healthy = check_db_health(&pool).await;

    Json(HealthStatus {
        database: if db_healthy { "healthy" } else { "unhealthy" }.to_string(),
        overall: if db_healthy { "healthy" } else { "degraded" }.to_string(),
    })
}

// Buat router untuk order-service
pub fn create_router(state: AppState) -> Router {
    if state.config.is_production() {
        tracing::warn!("Running in PRODUCTION mode - strict validation enabled");
    } else {
        tracing::info!("Running in DEVELOPMENT mode");
    }

    let api_routes = build_public_api_routes(state.clone())
        .merge(build_api_routes_with_auth(state.clone()));

    let openapi = ApiDoc::openapi();

    Router::new()
        .route("/health", get(health_check).with_state(state.db.clone()))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
        .nest("/api", api_routes)
        .layer(axum::middleware::from_fn(security_headers_middleware))
}

// Route dengan token opsional
fn build_public_api_routes(state: AppState) -> Router {
    Router::new()
        .route("/guard", get(session::check_guard))
        // Layer terakhir paling luar: auth dulu, baru rate limit per user/IP
        .layer(axum::middleware::from_fn_with_state(state.clone(), rate_limit_middleware))
        .layer(axum::middleware::from_fn_with_state(state.clone(), optional_auth_middleware))
        .with_state(state)
}

// Route yang membutuhkan JWT, role dicek di extractor handler
fn build_api_routes_with_auth(state: AppState) -> Router {
    Router::new()
        .route("/session", get(session::get_session))

        // Products
        .route("/products", get(products::list_products))
        .route("/products/{id}", get(products::get_product))

        // Dealer
        .route("/dealer/dashboard", get(dealer::get_dealer_dashboard))
        .route("/dealer/orders", get(dealer::get_dealer_orders).post(dealer::create_order))
        .route("/dealer/orders/history", get(dealer::get_dealer_order_history))
        .route("/dealer/orders/{id}", get(dealer::get_dealer_order))

        // Vendor
        .route("/vendor/orders", get(vendor::get_vendor_orders))
        .route("/vendor/orders/{id}", put(vendor::update_vendor_order))

        // Admin
        .route("/admin/dashboard", get(admin::get_admin_dashboard))
        .layer(axum::middleware::from_fn_with_state(state.clone(), rate_limit_middleware))
        .layer(axum::middleware::from_fn_with_state(state.clone(), jwt_auth_middleware))
        .with_state(state)
}

// Security Headers Middleware untuk HTTP security
async fn security_headers_middleware(
    request: axum::extract::Request,
    next: axum::middleware::Next,
) -> axum::response::Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    let csp = std::env::var("CSP_POLICY")
        .ok()
        .and_then(|policy| HeaderValue::from_str(&policy).ok())
        .unwrap_or_else(|| {
            HeaderValue::from_static(
                "default-src 'self'; script-src 'self' 'unsafe-inline'; style-src 'self' 'unsafe-inline'; img-src 'self' data: https:; frame-ancestors 'none'",
            )
        });
    headers.insert(header::CONTENT_SECURITY_POLICY, csp);

    let env = std::env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string());

    match env.as_str() {
        "production" => {
            headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
            headers.insert(
                header::REFERRER_POLICY,
                HeaderValue::from_static("strict-origin-when-cross-origin"),
            );
        }
        _ => {
            headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("SAMEORIGIN"));
        }
    }
    headers.insert(header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));

    // Dashboard selalu re-fetch, jangan di-cache
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("no-store, no-cache, must-revalidate, private"),
    );
    headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));

    if let Ok(version) = HeaderValue::from_str(env!("CARGO_PKG_VERSION")) {
        headers.insert("X-Order-Service-Version", version);
    }

    headers.remove(header::SERVER);

    response
}
