//! Product catalog models
//!
//! Products are read-only from the cart/order subsystem's point of view;
//! this service never mutates the catalog.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;

/// A color variant of a product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductColor {
    pub name: String,
    pub hex: String,
    /// Per-color image set, when the storefront has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
}

/// A size variant of a product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductSize {
    pub size: String,
    pub in_stock: bool,
}

/// Catalog product row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category: String,
    pub material: Option<String>,
    pub featured: bool,
    pub is_new: bool,
    pub image_url: Option<String>,
    pub hover_image_url: Option<String>,
    pub colors: Json<Vec<ProductColor>>,
    pub sizes: Json<Vec<ProductSize>>,
    pub stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The slice of a product the cart logic needs: existence and stock.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRef {
    pub id: Uuid,
    pub stock: i32,
}
