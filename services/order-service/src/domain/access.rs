//! Role guard: keputusan akses per halaman berdasarkan identity + role.
//!
//! Dipakai oleh extractor `AuthDealer` / `AuthVendor` / `AuthAdmin` sebelum
//! handler melakukan query yang mengasumsikan scope role tertentu, dan oleh
//! endpoint `GET /api/guard` untuk navigasi di frontend.

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::profile::Role;

pub const LOGIN_ROUTE: &str = "/auth";
pub const ACCESS_DENIED_NOTICE: &str = "Access denied";

// Identity yang sudah di-resolve: user id dari token, role dari tabel profiles
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub user_id: Uuid,
    pub role: Option<Role>,
}

// Hasil role guard
#[derive(Debug, Clone, PartialEq)]
pub enum GuardDecision {
    RedirectToLogin,
    AccessDenied { redirect_to: &'static str },
    Authorized,
}

/// Tentukan akses identity ke resource yang membutuhkan `required` role.
pub fn guard(identity: Option<&Identity>, required: Role) -> GuardDecision {
    match identity {
        None => GuardDecision::RedirectToLogin,
        Some(identity) if identity.role == Some(required) => GuardDecision::Authorized,
        Some(_) => GuardDecision::AccessDenied {
            redirect_to: LOGIN_ROUTE,
        },
    }
}

// Browser route yang dikenal aplikasi
#[derive(Debug, Clone, PartialEq)]
pub enum Page {
    Landing,
    Login,
    DealerDashboard,
    DealerNewOrder,
    DealerProductOrder { product_id: String },
    DealerPastOrders,
    VendorDashboard,
    AdminDashboard,
}

impl Page {
    /// Parse path browser, None jika route tidak dikenal
    pub fn from_path(path: &str) -> Option<Self> {
        let trimmed = path.trim();
        let normalized = if trimmed.len() > 1 {
            trimmed.trim_end_matches('/')
        } else {
            trimmed
        };

        match normalized {
            "/" | "" => Some(Page::Landing),
            "/auth" => Some(Page::Login),
            "/dealer" => Some(Page::DealerDashboard),
            "/dealer/new-order" => Some(Page::DealerNewOrder),
            "/dealer/past-orders" => Some(Page::DealerPastOrders),
            "/vendor" => Some(Page::VendorDashboard),
            "/admin" => Some(Page::AdminDashboard),
            other => other
                .strip_prefix("/dealer/order/")
                .filter(|id| !id.is_empty() && !id.contains('/'))
                .map(|id| Page::DealerProductOrder {
                    product_id: id.to_string(),
                }),
        }
    }

    /// Role yang dibutuhkan, None untuk halaman publik
    pub fn required_role(&self) -> Option<Role> {
        match self {
            Page::Landing | Page::Login => None,
            Page::DealerDashboard
            | Page::DealerNewOrder
            | Page::DealerProductOrder { .. }
            | Page::DealerPastOrders => Some(Role::Dealer),
            Page::VendorDashboard => Some(Role::Vendor),
            Page::AdminDashboard => Some(Role::Admin),
        }
    }

    /// Guard untuk halaman, halaman publik selalu authorized
    pub fn check(&self, identity: Option<&Identity>) -> GuardDecision {
        match self.required_role() {
            None => GuardDecision::Authorized,
            Some(role) => guard(identity, role),
        }
    }
}

// Response untuk GET /api/guard
#[derive(Debug, Serialize, ToSchema)]
pub struct GuardResponse {
    #[schema(example = "access_denied")]
    pub decision: String,
    #[schema(example = "/auth")]
    pub redirect_to: Option<String>,
    #[schema(example = "Access denied")]
    pub notice: Option<String>,
}

impl From<GuardDecision> for GuardResponse {
    fn from(decision: GuardDecision) -> Self {
        match decision {
            GuardDecision::RedirectToLogin => Self {
                decision: "redirect_to_login".to_string(),
                redirect_to: Some(LOGIN_ROUTE.to_string()),
                notice: None,
            },
            GuardDecision::AccessDenied { redirect_to } => Self {
                decision: "access_denied".to_string(),
                redirect_to: Some(redirect_to.to_string()),
                notice: Some(ACCESS_DENIED_NOTICE.to_string()),
            },
            GuardDecision::Authorized => Self {
                decision: "authorized".to_string(),
                redirect_to: None,
                notice: None,
            },
        }
    }
}
