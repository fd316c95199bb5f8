// Flow create order (dealer) dan update status order (vendor)
use uuid::Uuid;
use validator::Validate;

use crate::{
    domain::{
        order::{Order, PlacedOrder, VendorUpdate, VendorUpdateRequest},
        order_form::{CreateOrderRequest, OrderDraft},
        product::Product,
    },
    error::AppError,
    repositories::order_repo::OrderStore,
};

/// Validasi form lalu simpan order + item. Gagal validasi berarti tidak ada write sama sekali.
pub async fn place_order<S: OrderStore + ?Sized>(
    store: &S,
    dealer_id: Uuid,
    product: &Product,
    request: &CreateOrderRequest,
) -> Result<PlacedOrder, AppError> {
    request.validate()?;

    let draft = OrderDraft::build(product, request)?;

    let placed = store.create_order_with_item(dealer_id, &draft).await?;

    tracing::info!(
        "Order placed - order: {}, dealer: {}, product: {}, total_items: {}",
        placed.order.order_number,
        dealer_id,
        product.id,
        placed.order.total_items
    );

    Ok(placed)
}

/// Order milik dealer. Order dealer lain diperlakukan sama dengan order yang tidak ada.
pub async fn find_dealer_order<S: OrderStore + ?Sized>(
    store: &S,
    dealer_id: Uuid,
    order_id: Uuid,
) -> Result<Order, AppError> {
    let order = store
        .find_order_by_id(order_id)
        .await?
        .ok_or_else(|| AppError::not_found("Order not found"))?;

    if order.dealer_id != dealer_id {
        tracing::warn!(
            "Dealer {} mencoba membuka order {} milik dealer lain",
            dealer_id,
            order_id
        );
        return Err(AppError::not_found("Order not found"));
    }

    Ok(order)
}

/// Update status + detail pengiriman oleh vendor, transisi divalidasi sebelum write
pub async fn update_order_status<S: OrderStore + ?Sized>(
    store: &S,
    vendor_id: Uuid,
    order_id: Uuid,
    request: &VendorUpdateRequest,
) -> Result<Order, AppError> {
    request.validate()?;

    let current = store
        .find_order_by_id(order_id)
        .await?
        .ok_or_else(|| AppError::not_found("Order not found"))?;

    current.status.validate_transition(request.status)?;

    let update = VendorUpdate::from(request);

    let updated = store
        .update_order_if_status(order_id, current.status, &update)
        .await?
        .ok_or_else(|| {
            AppError::conflict("Order status was changed by someone else, please reload")
        })?;

    tracing::info!(
        "Order {} updated by vendor {}: {} -> {}",
        updated.order_number,
        vendor_id,
        current.status,
        updated.status
    );

    Ok(updated)
}
