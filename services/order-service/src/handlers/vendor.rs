// API Handlers untuk vendor: antrian order dan update status
use axum::{
    extract::{Path, State},
    response::Json,
};
use uuid::Uuid;

use crate::{
    config::AppState,
    domain::{
        dashboard::{OrderBuckets, VendorDashboardResponse},
        order::{OrderResponse, OrderWithDealerResponse, VendorUpdateRequest},
    },
    error::AppError,
    middleware::auth::AuthVendor,
    order_flow,
    repositories::order_repo::{self, PgOrderStore},
};

// Semua order dipartisi ke pending / active / completed
#[utoipa::path(
    get,
    path = "/api/vendor/orders",
    tag = "vendor",
    summary = "Antrian order vendor",
    description = "Semua order beserta nama dan perusahaan dealer, dipartisi per bucket status",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Order per bucket", body = VendorDashboardResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Access denied")
    )
)]
pub async fn get_vendor_orders(
    State(state): State<AppState>,
    _auth: AuthVendor,
) -> Result<Json<VendorDashboardResponse>, AppError> {
    let orders = order_repo::find_all_orders_with_dealer(&state.db).await?;

    let orders: Vec<OrderWithDealerResponse> =
        orders.into_iter().map(OrderWithDealerResponse::from).collect();
    let orders = OrderBuckets::partition(orders, |o: &OrderWithDealerResponse| o.order.status);

    Ok(Json(VendorDashboardResponse {
        total_orders: orders.total(),
        orders,
    }))
}

// Update status dan detail pengiriman
#[utoipa::path(
    put,
    path = "/api/vendor/orders/{id}",
    tag = "vendor",
    summary = "Update order",
    description = "Update status, komentar, kurir, dan nomor resi. Transisi status divalidasi; field kosong tidak menimpa nilai lama",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = Uuid, Path, description = "ID order")
    ),
    request_body = VendorUpdateRequest,
    responses(
        (status = 200, description = "Order berhasil diupdate", body = OrderResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Access denied"),
        (status = 404, description = "Order tidak ditemukan"),
        (status = 409, description = "Transisi status tidak valid atau status sudah berubah"),
        (status = 422, description = "Validasi gagal")
    )
)]
pub async fn update_vendor_order(
    State(state): State<AppState>,
    auth: AuthVendor,
    Path(order_id): Path<Uuid>,
    Json(request): Json<VendorUpdateRequest>,
) -> Result<Json<OrderResponse>, AppError> {
    let store = PgOrderStore::new(state.db.clone());

    let order = order_flow::update_order_status(&store, auth.user_id, order_id, &request).await?;

    Ok(Json(OrderResponse::from(order)))
}
