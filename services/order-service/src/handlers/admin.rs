// Handler dashboard admin
use axum::{extract::State, response::Json};

use crate::{
    config::AppState,
    domain::{
        dashboard::{AdminDashboardResponse, AdminStats, OrderBuckets},
        order::OrderWithDealerResponse,
        profile::Role,
    },
    error::AppError,
    middleware::auth::AuthAdmin,
    repositories::{order_repo, profile_repo},
};

// Overview semua order + statistik
#[utoipa::path(
    get,
    path = "/api/admin/dashboard",
    tag = "admin",
    summary = "Dashboard admin",
    description = "Statistik order per bucket, jumlah delivered, jumlah dealer, dan semua order per bucket",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Dashboard admin", body = AdminDashboardResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Access denied")
    )
)]
pub async fn get_admin_dashboard(
    State(state): State<AppState>,
    _auth: AuthAdmin,
) -> Result<Json<AdminDashboardResponse>, AppError> {
    let (orders, total_dealers) = tokio::try_join!(
        order_repo::find_all_orders_with_dealer(&state.db),
        profile_repo::count_profiles_by_role(&state.db, Role::Dealer),
    )?;

    let stats = AdminStats::from_statuses(orders.iter().map(|o| o.order.status), total_dealers);

    let orders: Vec<OrderWithDealerResponse> =
        orders.into_iter().map(OrderWithDealerResponse::from).collect();
    let orders = OrderBuckets::partition(orders, |o: &OrderWithDealerResponse| o.order.status);

    Ok(Json(AdminDashboardResponse { stats, orders }))
}
