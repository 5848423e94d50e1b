//! Cart models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::product::Product;

/// Per-user cart, created lazily on first access
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Cart {
    pub id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// One cart line
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CartItem {
    pub id: Uuid,
    pub cart_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub selected_color: String,
    pub selected_size: String,
}

/// Cart line joined with current product data, as returned by `GET /api/cart`
#[derive(Debug, Clone, Serialize)]
pub struct CartItemDetail {
    #[serde(flatten)]
    pub item: CartItem,
    pub product: Product,
}

/// Uniqueness key of a cart line: (product, color, size).
///
/// Absent color/size normalize to the empty string so that "no selection"
/// always hits the same line, regardless of how the client spelled it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VariantKey {
    pub product_id: Uuid,
    pub color: String,
    pub size: String,
}

impl VariantKey {
    pub fn new(product_id: Uuid, color: Option<&str>, size: Option<&str>) -> Self {
        Self {
            product_id,
            color: color.unwrap_or_default().to_string(),
            size: size.unwrap_or_default().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_color_and_size_normalize_to_empty() {
        let product_id = Uuid::new_v4();
        let a = VariantKey::new(product_id, None, None);
        let b = VariantKey::new(product_id, Some(""), Some(""));
        assert_eq!(a, b);
    }

    #[test]
    fn distinct_variants_are_distinct_keys() {
        let product_id = Uuid::new_v4();
        let ivory_m = VariantKey::new(product_id, Some("Ivory"), Some("M"));
        let ivory_l = VariantKey::new(product_id, Some("Ivory"), Some("L"));
        assert_ne!(ivory_m, ivory_l);
    }
}
