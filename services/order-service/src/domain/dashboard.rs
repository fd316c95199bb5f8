use serde::Serialize;
use utoipa::ToSchema;

use super::order::{OrderResponse, OrderStatus, OrderWithDealerResponse, StatusBucket};
use super::product::ProductResponse;

// Order yang sudah dipartisi per bucket untuk tab dashboard
#[derive(Debug, Serialize, ToSchema)]
pub struct OrderBuckets<T> {
    pub pending: Vec<T>,
    pub active: Vec<T>,
    pub completed: Vec<T>,
}

impl<T> OrderBuckets<T> {
    /// Partisi order berdasarkan status saja, urutan input dipertahankan
    pub fn partition<F>(items: Vec<T>, status_of: F) -> Self
    where
        F: Fn(&T) -> OrderStatus,
    {
        let mut buckets = Self {
            pending: Vec::new(),
            active: Vec::new(),
            completed: Vec::new(),
        };

        for item in items {
            match status_of(&item).bucket() {
                StatusBucket::Pending => buckets.pending.push(item),
                StatusBucket::Active => buckets.active.push(item),
                StatusBucket::Completed => buckets.completed.push(item),
            }
        }

        buckets
    }

    pub fn total(&self) -> usize {
        self.pending.len() + self.active.len() + self.completed.len()
    }
}

pub type VendorOrderBuckets = OrderBuckets<OrderWithDealerResponse>;

// Statistik agregat untuk admin dashboard
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AdminStats {
    pub total_orders: i64,
    pub pending_orders: i64,
    pub active_orders: i64,
    pub completed_orders: i64,
    pub delivered_orders: i64,
    pub total_dealers: i64,
}

impl AdminStats {
    pub fn from_statuses<I>(statuses: I, total_dealers: i64) -> Self
    where
        I: IntoIterator<Item = OrderStatus>,
    {
        let mut stats = Self {
            total_orders: 0,
            pending_orders: 0,
            active_orders: 0,
            completed_orders: 0,
            delivered_orders: 0,
            total_dealers,
        };

        for status in statuses {
            stats.total_orders += 1;
            match status.bucket() {
                StatusBucket::Pending => stats.pending_orders += 1,
                StatusBucket::Active => stats.active_orders += 1,
                StatusBucket::Completed => stats.completed_orders += 1,
            }
            if status == OrderStatus::Delivered {
                stats.delivered_orders += 1;
            }
        }

        stats
    }
}

// Response GET /api/dealer/dashboard
#[derive(Debug, Serialize, ToSchema)]
pub struct DealerDashboardResponse {
    pub total_orders: usize,
    pub orders: Vec<OrderResponse>,
    pub featured_products: Vec<ProductResponse>,
}

// Response GET /api/vendor/orders
#[derive(Debug, Serialize, ToSchema)]
pub struct VendorDashboardResponse {
    pub total_orders: usize,
    pub orders: VendorOrderBuckets,
}

// Response GET /api/admin/dashboard
#[derive(Debug, Serialize, ToSchema)]
pub struct AdminDashboardResponse {
    pub stats: AdminStats,
    pub orders: VendorOrderBuckets,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_keeps_every_order_once() {
        let statuses: Vec<OrderStatus> = OrderStatus::ALL
            .iter()
            .chain(OrderStatus::ALL.iter())
            .copied()
            .collect();

        let buckets = OrderBuckets::partition(statuses.clone(), |s| *s);
        assert_eq!(buckets.total(), statuses.len());
        assert_eq!(buckets.pending, vec![OrderStatus::Pending; 2]);
        assert!(buckets.active.iter().all(|s| s.bucket() == StatusBucket::Active));
        assert_eq!(buckets.active.len(), 4);
        assert!(buckets.completed.iter().all(|s| s.bucket() == StatusBucket::Completed));
        assert_eq!(buckets.completed.len(), 6);
    }

    #[test]
    fn test_partition_preserves_order() {
        let input = vec![
            (1, OrderStatus::Accepted),
            (2, OrderStatus::Pending),
            (3, OrderStatus::Dispatched),
        ];
        let buckets = OrderBuckets::partition(input, |(_, s)| *s);
        let active_ids: Vec<i32> = buckets.active.iter().map(|(id, _)| *id).collect();
        assert_eq!(active_ids, vec![1, 3]);
    }

    #[test]
    fn test_admin_stats() {
        let stats = AdminStats::from_statuses(
            vec![
                OrderStatus::Pending,
                OrderStatus::Pending,
                OrderStatus::Accepted,
                OrderStatus::Delivered,
                OrderStatus::Rejected,
            ],
            7,
        );

        assert_eq!(
            stats,
            AdminStats {
                total_orders: 5,
                pending_orders: 2,
                active_orders: 1,
                completed_orders: 2,
                delivered_orders: 1,
                total_dealers: 7,
            }
        );
    }

    #[test]
    fn test_admin_stats_empty() {
        let stats = AdminStats::from_statuses(Vec::new(), 0);
        assert_eq!(stats.total_orders, 0);
        assert_eq!(stats.delivered_orders, 0);
    }
}
