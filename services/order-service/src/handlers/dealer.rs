// API Handlers untuk dealer: dashboard, riwayat order, dan pembuatan order
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use uuid::Uuid;

use crate::{
    config::AppState,
    domain::{
        dashboard::DealerDashboardResponse,
        order::{OrderDetailResponse, OrderResponse},
        order_form::CreateOrderRequest,
        product::{ProductResponse, FEATURED_PRODUCT_LIMIT},
    },
    error::AppError,
    middleware::auth::AuthDealer,
    order_flow,
    repositories::{
        order_repo::{self, PgOrderStore},
        product_repo,
    },
};

// Dashboard dealer: order milik sendiri + produk unggulan
#[utoipa::path(
    get,
    path = "/api/dealer/dashboard",
    tag = "dealer",
    summary = "Dashboard dealer",
    description = "Semua order milik dealer (terbaru dulu), jumlah order, dan maksimal 6 produk untuk quick order",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Dashboard dealer", body = DealerDashboardResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Access denied")
    )
)]
pub async fn get_dealer_dashboard(
    State(state): State<AppState>,
    auth: AuthDealer,
) -> Result<Json<DealerDashboardResponse>, AppError> {
    let (orders, products) = tokio::try_join!(
        order_repo::find_orders_by_dealer(&state.db, auth.user_id),
        product_repo::find_active_products(&state.db, Some(FEATURED_PRODUCT_LIMIT)),
    )?;

    let orders: Vec<OrderResponse> = orders.into_iter().map(OrderResponse::from).collect();

    Ok(Json(DealerDashboardResponse {
        total_orders: orders.len(),
        orders,
        featured_products: products.into_iter().map(ProductResponse::from).collect(),
    }))
}

// Semua order milik dealer
#[utoipa::path(
    get,
    path = "/api/dealer/orders",
    tag = "dealer",
    summary = "Order milik dealer",
    description = "Semua order milik dealer yang login, urut created_at terbaru",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Daftar order", body = Vec<OrderResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Access denied")
    )
)]
pub async fn get_dealer_orders(
    State(state): State<AppState>,
    auth: AuthDealer,
) -> Result<Json<Vec<OrderResponse>>, AppError> {
    let orders = order_repo::find_orders_by_dealer(&state.db, auth.user_id).await?;

    Ok(Json(orders.into_iter().map(OrderResponse::from).collect()))
}

// Riwayat order yang sudah selesai (rejected, not in stock, delivered)
#[utoipa::path(
    get,
    path = "/api/dealer/orders/history",
    tag = "dealer",
    summary = "Riwayat order dealer",
    description = "Order milik dealer yang sudah berada di bucket completed",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Riwayat order", body = Vec<OrderResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Access denied")
    )
)]
pub async fn get_dealer_order_history(
    State(state): State<AppState>,
    auth: AuthDealer,
) -> Result<Json<Vec<OrderResponse>>, AppError> {
    let orders = order_repo::find_dealer_order_history(&state.db, auth.user_id).await?;

    Ok(Json(orders.into_iter().map(OrderResponse::from).collect()))
}

// Detail order milik dealer beserta item
#[utoipa::path(
    get,
    path = "/api/dealer/orders/{id}",
    tag = "dealer",
    summary = "Detail order dealer",
    description = "Order milik dealer beserta item. Order dealer lain dianggap tidak ada",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = Uuid, Path, description = "ID order")
    ),
    responses(
        (status = 200, description = "Detail order", body = OrderDetailResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Access denied"),
        (status = 404, description = "Order tidak ditemukan")
    )
)]
pub async fn get_dealer_order(
    State(state): State<AppState>,
    auth: AuthDealer,
    Path(order_id): Path<Uuid>,
) -> Result<Json<OrderDetailResponse>, AppError> {
    let store = PgOrderStore::new(state.db.clone());

    let order = order_flow::find_dealer_order(&store, auth.user_id, order_id).await?;

    let items = order_repo::find_order_items(&state.db, order.id).await?;

    Ok(Json(OrderDetailResponse {
        order: OrderResponse::from(order),
        items,
    }))
}

// Buat order baru untuk satu produk
#[utoipa::path(
    post,
    path = "/api/dealer/orders",
    tag = "dealer",
    summary = "Buat order",
    description = "Dealer membuat order untuk satu produk. Produk dengan dimensi wajib mengisi width, height, dan unit; produk lain memakai quantity (default minimum quantity)",
    security(
        ("bearer_auth" = [])
    ),
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order berhasil dibuat", body = OrderDetailResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Access denied"),
        (status = 404, description = "Produk tidak ditemukan"),
        (status = 422, description = "Validasi form gagal")
    )
)]
pub async fn create_order(
    State(state): State<AppState>,
    auth: AuthDealer,
    Json(request): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderDetailResponse>), AppError> {
    let product = product_repo::find_active_product_by_id(&state.db, request.product_id)
        .await?
        .ok_or_else(|| AppError::not_found("Product not found"))?;

    let store = PgOrderStore::new(state.db.clone());
    let placed = order_flow::place_order(&store, auth.user_id, &product, &request).await?;

    tracing::debug!("Order {} dibuat oleh {}", placed.order.id, auth.email);

    Ok((StatusCode::CREATED, Json(OrderDetailResponse::from(placed))))
}
