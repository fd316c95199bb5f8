// Validasi form order dealer dan pembentukan draft sebelum insert
use serde::{Deserialize, Serialize};
use shared::utils::validation::{normalize_optional_text, parse_decimal};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::product::Product;

// Satuan dimensi untuk produk custom size
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DimensionUnit {
    #[default]
    Feet,
    Cm,
    Inch,
}

impl DimensionUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            DimensionUnit::Feet => "feet",
            DimensionUnit::Cm => "cm",
            DimensionUnit::Inch => "inch",
        }
    }
}

// Request create order dari dealer
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateOrderRequest {
    pub product_id: Uuid,
    #[schema(example = 100)]
    pub quantity: Option<i32>,
    #[schema(example = "10")]
    pub width: Option<String>,
    #[schema(example = "5")]
    pub height: Option<String>,
    pub unit: Option<DimensionUnit>,
    #[validate(length(max = 2000))]
    #[schema(example = "Deliver before Friday")]
    pub notes: Option<String>,
}

// Error validasi form, semua terjadi sebelum write apapun
#[derive(Debug, Error, PartialEq)]
pub enum OrderFormError {
    #[error("Please enter dimensions")]
    MissingDimensions,

    #[error("Dimensions must be valid numbers")]
    InvalidDimensions,

    #[error("Dimensions must be greater than 0")]
    NonPositiveDimensions,

    #[error("Minimum quantity is {min}")]
    BelowMinimum { min: i32 },
}

// Draft order yang sudah tervalidasi dan siap di-insert
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDraft {
    pub product_id: Uuid,
    pub total_items: i32,
    pub item_quantity: i32,
    pub notes: Option<String>,
}

impl OrderDraft {
    pub fn build(product: &Product, request: &CreateOrderRequest) -> Result<Self, OrderFormError> {
        let extra_notes = normalize_optional_text(request.notes.as_deref());

        if product.requires_dimensions {
            let (width, height) = match (
                normalize_optional_text(request.width.as_deref()),
                normalize_optional_text(request.height.as_deref()),
            ) {
                (Some(w), Some(h)) => (w, h),
                _ => return Err(OrderFormError::MissingDimensions),
            };

            let (w, h) = match (parse_decimal(&width), parse_decimal(&height)) {
                (Some(w), Some(h)) => (w, h),
                _ => return Err(OrderFormError::InvalidDimensions),
            };

            if w <= 0.0 || h <= 0.0 {
                return Err(OrderFormError::NonPositiveDimensions);
            }

            let unit = request.unit.unwrap_or_default();
            let mut notes = format!("Dimensions: {} x {} {}", width, height, unit.as_str());
            if let Some(extra) = extra_notes {
                notes.push('\n');
                notes.push_str(&extra);
            }

            return Ok(Self {
                product_id: product.id,
                total_items: 1,
                item_quantity: 1,
                notes: Some(notes),
            });
        }

        let min = product.effective_min_quantity();
        let quantity = request.quantity.unwrap_or(min);
        if quantity < min {
            return Err(OrderFormError::BelowMinimum { min });
        }

        Ok(Self {
            product_id: product.id,
            total_items: quantity,
            item_quantity: quantity,
            notes: extra_notes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::product::fixtures::product;

    fn request(product: &Product) -> CreateOrderRequest {
        CreateOrderRequest {
            product_id: product.id,
            quantity: None,
            width: None,
            height: None,
            unit: None,
            notes: None,
        }
    }

    #[test]
    fn test_dimensioned_product_synthesizes_notes() {
        let banner = product("Vinyl Banner", true, None);
        let mut req = request(&banner);
        req.width = Some("10".to_string());
        req.height = Some("5".to_string());
        req.unit = Some(DimensionUnit::Feet);

        let draft = OrderDraft::build(&banner, &req).unwrap();
        assert_eq!(draft.total_items, 1);
        assert_eq!(draft.item_quantity, 1);
        assert!(draft.notes.as_deref().unwrap().starts_with("Dimensions: 10 x 5 feet"));
    }

    #[test]
    fn test_dimension_notes_append_dealer_notes() {
        let banner = product("Vinyl Banner", true, None);
        let mut req = request(&banner);
        req.width = Some("2.5".to_string());
        req.height = Some("1".to_string());
        req.unit = Some(DimensionUnit::Cm);
        req.notes = Some("Glossy finish".to_string());

        let draft = OrderDraft::build(&banner, &req).unwrap();
        assert_eq!(
            draft.notes.as_deref(),
            Some("Dimensions: 2.5 x 1 cm\nGlossy finish")
        );
    }

    #[test]
    fn test_unit_defaults_to_feet() {
        let banner = product("Vinyl Banner", true, None);
        let mut req = request(&banner);
        req.width = Some("3".to_string());
        req.height = Some("4".to_string());

        let draft = OrderDraft::build(&banner, &req).unwrap();
        assert_eq!(draft.notes.as_deref(), Some("Dimensions: 3 x 4 feet"));
    }

    #[test]
    fn test_missing_or_zero_dimensions_rejected() {
        let banner = product("Vinyl Banner", true, None);

        let cases = [
            (None, Some("5"), OrderFormError::MissingDimensions),
            (Some("10"), None, OrderFormError::MissingDimensions),
            (Some(""), Some("5"), OrderFormError::MissingDimensions),
            (Some("0"), Some("5"), OrderFormError::NonPositiveDimensions),
            (Some("10"), Some("0"), OrderFormError::NonPositiveDimensions),
            (Some("0.0"), Some("0"), OrderFormError::NonPositiveDimensions),
            (Some("ten"), Some("5"), OrderFormError::InvalidDimensions),
            (Some("-2"), Some("5"), OrderFormError::InvalidDimensions),
        ];

        for (width, height, expected) in cases {
            let mut req = request(&banner);
            req.width = width.map(str::to_string);
            req.height = height.map(str::to_string);
            assert_eq!(OrderDraft::build(&banner, &req), Err(expected));
        }
    }

    #[test]
    fn test_quantity_below_minimum_rejected() {
        let pens = product("Pens", false, Some(5));
        let mut req = request(&pens);
        req.quantity = Some(3);

        assert_eq!(
            OrderDraft::build(&pens, &req),
            Err(OrderFormError::BelowMinimum { min: 5 })
        );
        assert_eq!(
            OrderFormError::BelowMinimum { min: 5 }.to_string(),
            "Minimum quantity is 5"
        );
    }

    #[test]
    fn test_quantity_order_uses_quantity_as_total_items() {
        let pens = product("Pens", false, Some(5));
        let mut req = request(&pens);
        req.quantity = Some(12);
        req.notes = Some("  ".to_string());

        let draft = OrderDraft::build(&pens, &req).unwrap();
        assert_eq!(draft.total_items, 12);
        assert_eq!(draft.item_quantity, 12);
        assert_eq!(draft.notes, None);
        assert_eq!(draft.product_id, pens.id);
    }

    #[test]
    fn test_quantity_defaults_to_minimum() {
        let pens = product("Pens", false, Some(25));
        let draft = OrderDraft::build(&pens, &request(&pens)).unwrap();
        assert_eq!(draft.total_items, 25);

        let mugs = product("Mugs", false, None);
        let mut req = request(&mugs);
        req.quantity = Some(0);
        assert_eq!(
            OrderDraft::build(&mugs, &req),
            Err(OrderFormError::BelowMinimum { min: 1 })
        );
    }

    #[test]
    fn test_dimension_unit_serde() {
        let unit: DimensionUnit = serde_json::from_str("\"inch\"").unwrap();
        assert_eq!(unit, DimensionUnit::Inch);
        assert!(serde_json::from_str::<DimensionUnit>("\"meter\"").is_err());
    }
}
