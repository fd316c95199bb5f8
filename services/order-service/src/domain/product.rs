use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

// Keyword produk yang paling sering dipesan dealer
const POPULAR_KEYWORDS: [&str; 4] = ["business cards", "pens", "t-shirts", "banners"];

// Batas jumlah produk unggulan di dashboard dealer
pub const FEATURED_PRODUCT_LIMIT: i64 = 6;

// Model product dari database (read-only dari sisi ordering)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub category: Option<String>,
    pub sku: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub unit_type: Option<String>,
    pub min_quantity: Option<i32>,
    pub requires_dimensions: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Minimum quantity efektif, default 1
    pub fn effective_min_quantity(&self) -> i32 {
        self.min_quantity.unwrap_or(1).max(1)
    }

    pub fn is_popular(&self) -> bool {
        let name = self.name.to_lowercase();
        POPULAR_KEYWORDS.iter().any(|keyword| name.contains(keyword))
    }
}

// Query parameters untuk katalog produk
#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductQueryParams {
    /// Jumlah maksimum produk (1-100), kosong berarti semua
    pub limit: Option<i64>,
}

// Response untuk product
#[derive(Debug, Serialize, ToSchema)]
pub struct ProductResponse {
    pub id: Uuid,
    #[schema(example = "Business Cards")]
    pub name: String,
    pub category: Option<String>,
    pub sku: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    #[schema(example = "pack")]
    pub unit_type: Option<String>,
    #[schema(example = 100)]
    pub min_quantity: i32,
    pub requires_dimensions: bool,
    pub is_popular: bool,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        let min_quantity = product.effective_min_quantity();
        let is_popular = product.is_popular();

        Self {
            id: product.id,
            name: product.name,
            category: product.category,
            sku: product.sku,
            description: product.description,
            image_url: product.image_url,
            unit_type: product.unit_type,
            min_quantity,
            requires_dimensions: product.requires_dimensions,
            is_popular,
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn product(name: &str, requires_dimensions: bool, min_quantity: Option<i32>) -> Product {
        Product {
            id: Uuid::new_v4(),
            name: name.to_string(),
            category: Some("Print".to_string()),
            sku: None,
            description: None,
            image_url: None,
            unit_type: None,
            min_quantity,
            requires_dimensions,
            is_active: true,
            created_at: Utc::now(),
        }
    }
}
