use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::utils::validation::normalize_optional_text;
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Status order, di-mapping ke postgres enum `order_status`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "order_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Accepted,
    Rejected,
    NotInStock,
    Dispatched,
    Delivered,
}

// Bucket untuk tab dashboard / history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum StatusBucket {
    Pending,
    Active,
    Completed,
}

impl StatusBucket {
    pub fn statuses(&self) -> &'static [OrderStatus] {
        match self {
            StatusBucket::Pending => &[OrderStatus::Pending],
            StatusBucket::Active => &[OrderStatus::Accepted, OrderStatus::Dispatched],
            StatusBucket::Completed => &[
                OrderStatus::Delivered,
                OrderStatus::Rejected,
                OrderStatus::NotInStock,
            ],
        }
    }
}

// Error transisi status, di-map ke HTTP 409
#[derive(Debug, Error, PartialEq)]
pub enum TransitionError {
    #[error("Order is already {status} and can no longer change status")]
    Terminal { status: OrderStatus },

    #[error("Cannot change order status from {from} to {to}")]
    NotAllowed { from: OrderStatus, to: OrderStatus },
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::Pending,
        OrderStatus::Accepted,
        OrderStatus::Rejected,
        OrderStatus::NotInStock,
        OrderStatus::Dispatched,
        OrderStatus::Delivered,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Accepted => "accepted",
            OrderStatus::Rejected => "rejected",
            OrderStatus::NotInStock => "not_in_stock",
            OrderStatus::Dispatched => "dispatched",
            OrderStatus::Delivered => "delivered",
        }
    }

    /// Label untuk ditampilkan ("not_in_stock" -> "not in stock")
    pub fn label(&self) -> String {
        self.as_str().replace('_', " ")
    }

    pub fn bucket(&self) -> StatusBucket {
        match self {
            OrderStatus::Pending => StatusBucket::Pending,
            OrderStatus::Accepted | OrderStatus::Dispatched => StatusBucket::Active,
            OrderStatus::Rejected | OrderStatus::NotInStock | OrderStatus::Delivered => {
                StatusBucket::Completed
            }
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.next_statuses().is_empty()
    }

    /// Tabel transisi lifecycle
    pub fn next_statuses(&self) -> &'static [OrderStatus] {
        match self {
            OrderStatus::Pending => &[
                OrderStatus::Accepted,
                OrderStatus::Rejected,
                OrderStatus::NotInStock,
            ],
            OrderStatus::Accepted => &[OrderStatus::Dispatched],
            OrderStatus::Dispatched => &[OrderStatus::Delivered],
            OrderStatus::Rejected | OrderStatus::NotInStock | OrderStatus::Delivered => &[],
        }
    }

    /// Validasi transisi. Target sama dengan status sekarang berarti update detail saja.
    pub fn validate_transition(&self, target: OrderStatus) -> Result<(), TransitionError> {
        if *self == target || self.next_statuses().contains(&target) {
            return Ok(());
        }

        if self.is_terminal() {
            Err(TransitionError::Terminal { status: *self })
        } else {
            Err(TransitionError::NotAllowed {
                from: *self,
                to: target,
            })
        }
    }
}

// Implement Display untuk logging dan pesan error
impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// Generate order number yang human readable
pub fn format_order_number(now: DateTime<Utc>, suffix: u16) -> String {
    format!("ORD-{}-{:04}", now.format("%Y%m%d%H%M%S"), suffix % 10_000)
}

// Model utama Order dari database
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Order {
    pub id: Uuid,
    pub order_number: String,
    pub dealer_id: Uuid,
    pub status: OrderStatus,
    pub total_items: i32,
    pub notes: Option<String>,
    pub vendor_comments: Option<String>,
    pub courier_details: Option<String>,
    pub tracking_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Line item order
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
}

// Order + info dealer (LEFT JOIN profiles) untuk dashboard vendor/admin
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OrderWithDealer {
    #[sqlx(flatten)]
    pub order: Order,
    pub dealer_full_name: Option<String>,
    pub dealer_company_name: Option<String>,
}

// Order yang baru dibuat beserta item-nya
#[derive(Debug, Clone)]
pub struct PlacedOrder {
    pub order: Order,
    pub item: OrderItem,
}

// Request update order dari vendor
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct VendorUpdateRequest {
    #[schema(example = "dispatched")]
    pub status: OrderStatus,
    #[validate(length(max = 2000))]
    #[schema(example = "Packed and ready")]
    pub vendor_comments: Option<String>,
    #[validate(length(max = 255))]
    #[schema(example = "Blue Dart")]
    pub courier_details: Option<String>,
    #[validate(length(max = 100))]
    #[schema(example = "BD123456789")]
    pub tracking_number: Option<String>,
}

/// Perubahan satu field detail pengiriman.
///
/// Field yang tidak dikirim dipertahankan, string kosong menghapus nilai lama.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldUpdate {
    Keep,
    Clear,
    Set(String),
}

impl FieldUpdate {
    pub fn from_input(raw: Option<&str>) -> Self {
        match raw {
            None => FieldUpdate::Keep,
            Some(text) => match normalize_optional_text(Some(text)) {
                Some(value) => FieldUpdate::Set(value),
                None => FieldUpdate::Clear,
            },
        }
    }

    // true jika kolom harus ditulis (Set atau Clear)
    pub fn touches(&self) -> bool {
        !matches!(self, FieldUpdate::Keep)
    }

    // Nilai baru untuk kolom, None untuk Keep dan Clear
    pub fn value(&self) -> Option<&str> {
        match self {
            FieldUpdate::Set(value) => Some(value),
            FieldUpdate::Keep | FieldUpdate::Clear => None,
        }
    }
}

// Update vendor yang sudah dinormalisasi
#[derive(Debug, Clone, PartialEq)]
pub struct VendorUpdate {
    pub status: OrderStatus,
    pub vendor_comments: FieldUpdate,
    pub courier_details: FieldUpdate,
    pub tracking_number: FieldUpdate,
}

impl From<&VendorUpdateRequest> for VendorUpdate {
    fn from(request: &VendorUpdateRequest) -> Self {
        Self {
            status: request.status,
            vendor_comments: FieldUpdate::from_input(request.vendor_comments.as_deref()),
            courier_details: FieldUpdate::from_input(request.courier_details.as_deref()),
            tracking_number: FieldUpdate::from_input(request.tracking_number.as_deref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_buckets_are_disjoint_and_exhaustive() {
        let buckets = [StatusBucket::Pending, StatusBucket::Active, StatusBucket::Completed];
        let mut seen = HashSet::new();

        for bucket in buckets {
            for status in bucket.statuses() {
                assert!(seen.insert(*status), "{} muncul di lebih dari satu bucket", status);
                assert_eq!(status.bucket(), bucket);
            }
        }

        assert_eq!(seen.len(), OrderStatus::ALL.len());
        for status in OrderStatus::ALL {
            assert!(seen.contains(&status));
        }
    }

    #[test]
    fn test_lifecycle_transitions() {
        use OrderStatus::*;

        assert!(Pending.validate_transition(Accepted).is_ok());
        assert!(Pending.validate_transition(Rejected).is_ok());
        assert!(Pending.validate_transition(NotInStock).is_ok());
        assert!(Accepted.validate_transition(Dispatched).is_ok());
        assert!(Dispatched.validate_transition(Delivered).is_ok());

        assert_eq!(
            Pending.validate_transition(Delivered),
            Err(TransitionError::NotAllowed { from: Pending, to: Delivered })
        );
        assert_eq!(
            Dispatched.validate_transition(Pending),
            Err(TransitionError::NotAllowed { from: Dispatched, to: Pending })
        );
    }

    #[test]
    fn test_terminal_statuses_never_reopen() {
        for status in [OrderStatus::Rejected, OrderStatus::NotInStock, OrderStatus::Delivered] {
            assert!(status.is_terminal());
            for target in OrderStatus::ALL {
                if target == status {
                    assert!(status.validate_transition(target).is_ok());
                } else {
                    assert_eq!(
                        status.validate_transition(target),
                        Err(TransitionError::Terminal { status })
                    );
                }
            }
        }
    }

    #[test]
    fn test_no_transition_back_to_pending() {
        for status in OrderStatus::ALL {
            if status != OrderStatus::Pending {
                assert!(status.validate_transition(OrderStatus::Pending).is_err());
            }
        }
    }

    #[test]
    fn test_status_label_and_serde() {
        assert_eq!(OrderStatus::NotInStock.label(), "not in stock");
        assert_eq!(
            serde_json::to_string(&OrderStatus::NotInStock).unwrap(),
            "\"not_in_stock\""
        );
        let parsed: OrderStatus = serde_json::from_str("\"dispatched\"").unwrap();
        assert_eq!(parsed, OrderStatus::Dispatched);
    }

    #[test]
    fn test_format_order_number() {
        let now = DateTime::parse_from_rfc3339("2025-03-04T05:06:07Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(format_order_number(now, 42), "ORD-20250304050607-0042");
        assert_eq!(format_order_number(now, 12_345), "ORD-20250304050607-2345");
    }

    #[test]
    fn test_vendor_update_keep_clear_and_set() {
        let request = VendorUpdateRequest {
            status: OrderStatus::Dispatched,
            vendor_comments: Some("   ".to_string()),
            courier_details: Some(" FedEx ".to_string()),
            tracking_number: None,
        };

        let update = VendorUpdate::from(&request);
        assert_eq!(update.status, OrderStatus::Dispatched);
        assert_eq!(update.vendor_comments, FieldUpdate::Clear);
        assert_eq!(update.courier_details, FieldUpdate::Set("FedEx".to_string()));
        assert_eq!(update.tracking_number, FieldUpdate::Keep);
    }

    #[test]
    fn test_field_update_column_write() {
        let cleared = FieldUpdate::from_input(Some(""));
        assert!(cleared.touches());
        assert_eq!(cleared.value(), None);

        let kept = FieldUpdate::from_input(None);
        assert!(!kept.touches());

        let set = FieldUpdate::from_input(Some("BD123"));
        assert!(set.touches());
        assert_eq!(set.value(), Some("BD123"));
    }

    #[test]
    fn test_vendor_update_request_length_limits() {
        let request = VendorUpdateRequest {
            status: OrderStatus::Accepted,
            vendor_comments: None,
            courier_details: None,
            tracking_number: Some("X".repeat(101)),
        };
        assert!(request.validate().is_err());
    }
}
