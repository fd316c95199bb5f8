use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::{
    domain::{
        order::{
            format_order_number, Order, OrderItem, OrderStatus, OrderWithDealer, PlacedOrder,
            StatusBucket, VendorUpdate,
        },
        order_form::OrderDraft,
    },
    error::AppError,
};

const ORDER_NUMBER_ATTEMPTS: usize = 5;

/// Operasi write order yang dipakai flow create dan update status.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Insert order + satu order item dalam satu transaksi
    async fn create_order_with_item(
        &self,
        dealer_id: Uuid,
        draft: &OrderDraft,
    ) -> Result<PlacedOrder, AppError>;

    async fn find_order_by_id(&self, id: Uuid) -> Result<Option<Order>, AppError>;

    /// Update hanya jika status masih `expected`, None jika status sudah berubah
    async fn update_order_if_status(
        &self,
        id: Uuid,
        expected: OrderStatus,
        update: &VendorUpdate,
    ) -> Result<Option<Order>, AppError>;
}

// Implementasi OrderStore di atas PostgreSQL
#[derive(Clone)]
pub struct PgOrderStore {
    pool: PgPool,
}

impl PgOrderStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Insert order, baris tidak dikembalikan jika order_number bentrok
const INSERT_ORDER_SQL: &str = "INSERT INTO orders (order_number, dealer_id, status, total_items, notes)
     VALUES ($1, $2, $3, $4, $5)
     ON CONFLICT (order_number) DO NOTHING
     RETURNING *";

// Insert order dengan order number acak, retry jika nomor sudah dipakai
async fn insert_order_with_unique_number(
    conn: &mut PgConnection,
    dealer_id: Uuid,
    draft: &OrderDraft,
) -> Result<Order, AppError> {
    for attempt in 1..=ORDER_NUMBER_ATTEMPTS {
        let order_number = format_order_number(chrono::Utc::now(), rand::random::<u16>());

        let inserted: Option<Order> = sqlx::query_as(INSERT_ORDER_SQL)
            .bind(&order_number)
            .bind(dealer_id)
            .bind(OrderStatus::Pending)
            .bind(draft.total_items)
            .bind(&draft.notes)
            .fetch_optional(&mut *conn)
            .await?;

        match inserted {
            Some(order) => return Ok(order),
            None => tracing::warn!(
                "Order number {} sudah dipakai (attempt {}/{})",
                order_number,
                attempt,
                ORDER_NUMBER_ATTEMPTS
            ),
        }
    }

    Err(AppError::internal("Failed to generate a unique order number"))
}

#[async_trait]
impl OrderStore for PgOrderStore {
    async fn create_order_with_item(
        &self,
        dealer_id: Uuid,
        draft: &OrderDraft,
    ) -> Result<PlacedOrder, AppError> {
        // Order dan item harus masuk bersama, rollback otomatis jika tx di-drop
        let mut tx = self.pool.begin().await?;

        let order = insert_order_with_unique_number(&mut *tx, dealer_id, draft).await?;

        let item: OrderItem = sqlx::query_as(
            "INSERT INTO order_items (order_id, product_id, quantity)
             VALUES ($1, $2, $3)
             RETURNING *"
        )
        .bind(order.id)
        .bind(draft.product_id)
        .bind(draft.item_quantity)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(PlacedOrder { order, item })
    }

    async fn find_order_by_id(&self, id: Uuid) -> Result<Option<Order>, AppError> {
        let order = sqlx::query_as("SELECT * FROM orders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(order)
    }

    async fn update_order_if_status(
        &self,
        id: Uuid,
        expected: OrderStatus,
        update: &VendorUpdate,
    ) -> Result<Option<Order>, AppError> {
        let order = sqlx::query_as(
            "UPDATE orders
             SET status = $3,
                 vendor_comments = CASE WHEN $4 THEN $5 ELSE vendor_comments END,
                 courier_details = CASE WHEN $6 THEN $7 ELSE courier_details END,
                 tracking_number = CASE WHEN $8 THEN $9 ELSE tracking_number END,
                 updated_at = NOW()
             WHERE id = $1 AND status = $2
             RETURNING *"
        )
        .bind(id)
        .bind(expected)
        .bind(update.status)
        .bind(update.vendor_comments.touches())
        .bind(update.vendor_comments.value())
        .bind(update.courier_details.touches())
        .bind(update.courier_details.value())
        .bind(update.tracking_number.touches())
        .bind(update.tracking_number.value())
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }
}

// Semua order milik dealer, terbaru dulu
pub async fn find_orders_by_dealer(
    pool: &PgPool,
    dealer_id: Uuid,
) -> Result<Vec<Order>, AppError> {
    let orders = sqlx::query_as(
        "SELECT * FROM orders
         WHERE dealer_id = $1
         ORDER BY created_at DESC"
    )
    .bind(dealer_id)
    .fetch_all(pool)
    .await?;

    Ok(orders)
}

// Status yang masuk riwayat dealer
pub fn dealer_history_statuses() -> &'static [OrderStatus] {
    StatusBucket::Completed.statuses()
}

// Nilai enum sebagai text untuk filter ANY($n)
fn status_filter(statuses: &[OrderStatus]) -> Vec<String> {
    statuses.iter().map(|s| s.as_str().to_string()).collect()
}

// Order milik dealer dengan status tertentu
pub async fn find_orders_by_dealer_and_statuses(
    pool: &PgPool,
    dealer_id: Uuid,
    statuses: &[OrderStatus],
) -> Result<Vec<Order>, AppError> {
    let statuses = status_filter(statuses);

    let orders = sqlx::query_as(
        "SELECT * FROM orders
         WHERE dealer_id = $1 AND status::text = ANY($2)
         ORDER BY created_at DESC"
    )
    .bind(dealer_id)
    .bind(statuses)
    .fetch_all(pool)
    .await?;

    Ok(orders)
}

// Riwayat dealer: hanya order di bucket completed
pub async fn find_dealer_order_history(
    pool: &PgPool,
    dealer_id: Uuid,
) -> Result<Vec<Order>, AppError> {
    find_orders_by_dealer_and_statuses(pool, dealer_id, dealer_history_statuses()).await
}

// Semua order beserta nama dealer, untuk dashboard vendor dan admin
pub async fn find_all_orders_with_dealer(
    pool: &PgPool,
) -> Result<Vec<OrderWithDealer>, AppError> {
    let orders = sqlx::query_as(
        "SELECT o.*,
                p.full_name AS dealer_full_name,
                p.company_name AS dealer_company_name
         FROM orders o
         LEFT JOIN profiles p ON p.id = o.dealer_id
         ORDER BY o.created_at DESC"
    )
    .fetch_all(pool)
    .await?;

    Ok(orders)
}

// Item untuk satu order
pub async fn find_order_items(
    pool: &PgPool,
    order_id: Uuid,
) -> Result<Vec<OrderItem>, AppError> {
    let items = sqlx::query_as(
        "SELECT * FROM order_items
         WHERE order_id = $1
         ORDER BY created_at ASC"
    )
    .bind(order_id)
    .fetch_all(pool)
    .await?;

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dealer_history_is_completed_bucket_only() {
        let statuses = dealer_history_statuses();
        assert_eq!(statuses, StatusBucket::Completed.statuses());
        assert!(statuses
            .iter()
            .all(|s| s.bucket() == StatusBucket::Completed));
        assert!(!statuses.contains(&OrderStatus::Pending));
        assert!(!statuses.contains(&OrderStatus::Accepted));
        assert!(!statuses.contains(&OrderStatus::Dispatched));

        let mut filter = status_filter(statuses);
        filter.sort();
        assert_eq!(filter, vec!["delivered", "not_in_stock", "rejected"]);
    }

    #[test]
    fn test_order_insert_tolerates_number_collision() {
        // Bentrok order_number tidak boleh jadi unique violation (500)
        assert!(INSERT_ORDER_SQL.contains("ON CONFLICT (order_number) DO NOTHING"));
        assert!(INSERT_ORDER_SQL.contains("RETURNING *"));
        assert!(ORDER_NUMBER_ATTEMPTS > 1);
    }

    #[test]
    fn test_status_filter_matches_enum_text() {
        assert_eq!(
            status_filter(&[OrderStatus::NotInStock, OrderStatus::Pending]),
            vec!["not_in_stock", "pending"]
        );
        assert!(status_filter(&[]).is_empty());
    }
}
