//! Order creation
//!
//! Converts a submitted cart snapshot into a durable order. Line items are
//! persisted exactly as the caller snapshot supplied them (price/name are not
//! re-fetched from the catalog), but totals are recomputed server-side, and
//! the order row, line items and cart clear commit in one transaction.

use rand::RngCore;
use rand::rngs::OsRng;
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::orders::{self, NewOrder, NewOrderLine};
use crate::error::{AppError, AppResult};
use crate::models::order::Order;

/// Storefront prefix on every order number.
const ORDER_PREFIX: &str = "NC";

/// Accepted drift between client-computed and server-recomputed amounts.
/// One cent absorbs client-side float rounding; anything beyond is rejected.
const TOTALS_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

const DEFAULT_COUNTRY: &str = "United States";

/// `POST /api/orders` body
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub cart_items: Vec<OrderLineInput>,
    pub shipping_info: ShippingInfo,
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

/// Caller-supplied snapshot of one cart line
#[derive(Debug, Clone, Deserialize)]
pub struct OrderLineInput {
    pub product_id: Uuid,
    pub product_name: String,
    pub product_price: Decimal,
    pub quantity: i32,
    #[serde(default)]
    pub selected_color: Option<String>,
    #[serde(default)]
    pub selected_size: Option<String>,
}

/// Shipping form as submitted by the checkout page. Everything is optional at
/// the serde level; requiredness is enforced in [`validate_order`] so missing
/// fields come back as proper validation errors.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingInfo {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub apartment: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip_code: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

impl ShippingInfo {
    /// Recipient name: the full name when given, else "first last".
    fn name(&self) -> AppResult<String> {
        if let Some(full) = non_empty(self.full_name.as_deref()) {
            return Ok(full.to_string());
        }
        match (
            non_empty(self.first_name.as_deref()),
            non_empty(self.last_name.as_deref()),
        ) {
            (Some(first), Some(last)) => Ok(format!("{first} {last}")),
            _ => Err(AppError::validation("Shipping name is required")),
        }
    }

    /// Street address with the apartment/suite appended when present.
    fn street(&self) -> AppResult<String> {
        let address = non_empty(self.address.as_deref())
            .ok_or_else(|| AppError::validation("Shipping address is required"))?;
        Ok(match non_empty(self.apartment.as_deref()) {
            Some(apartment) => format!("{address}, {apartment}"),
            None => address.to_string(),
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn required(value: Option<&str>, what: &str) -> AppResult<String> {
    non_empty(value)
        .map(str::to_string)
        .ok_or_else(|| AppError::validation(format!("Shipping {what} is required")))
}

/// Generate a human-legible, probabilistically-unique order number:
/// `NC-<millis base36>-<64-bit random base36>`, upper-case throughout.
/// The suffix comes from the OS random source; the unique index on
/// `order_number` backstops the (negligible) collision probability.
pub fn generate_order_number() -> String {
    order_number_at(chrono::Utc::now().timestamp_millis())
}

fn order_number_at(now_ms: i64) -> String {
    let mut bytes = [0u8; 8];
    OsRng.fill_bytes(&mut bytes);
    let suffix = u64::from_be_bytes(bytes);
    format!(
        "{ORDER_PREFIX}-{}-{}",
        base36(now_ms.max(0) as u64),
        base36(suffix)
    )
}

fn base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    if n == 0 {
        return "0".into();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap()
}

/// Validate the request and assemble the rows to persist. Pure; no storage.
pub fn validate_order(
    user_id: Uuid,
    req: &CreateOrderRequest,
) -> AppResult<(NewOrder, Vec<NewOrderLine>)> {
    if req.cart_items.is_empty() {
        return Err(AppError::validation("Cart is empty"));
    }

    let mut lines = Vec::with_capacity(req.cart_items.len());
    let mut computed_subtotal = Decimal::ZERO;
    for item in &req.cart_items {
        if item.quantity < 1 {
            return Err(AppError::validation("Item quantity must be at least 1"));
        }
        if item.product_price < Decimal::ZERO {
            return Err(AppError::validation("Item price must not be negative"));
        }
        let line_subtotal = item.product_price * Decimal::from(item.quantity);
        computed_subtotal += line_subtotal;
        lines.push(NewOrderLine {
            product_id: item.product_id,
            product_name: item.product_name.clone(),
            product_price: item.product_price,
            quantity: item.quantity,
            selected_color: item.selected_color.clone().unwrap_or_default(),
            selected_size: item.selected_size.clone().unwrap_or_default(),
            subtotal: line_subtotal,
        });
    }

    if req.shipping < Decimal::ZERO || req.tax < Decimal::ZERO {
        return Err(AppError::validation("Shipping and tax must not be negative"));
    }
    if (req.subtotal - computed_subtotal).abs() > TOTALS_TOLERANCE {
        return Err(AppError::validation(
            "Submitted subtotal does not match cart items",
        ));
    }
    if (req.total - (req.subtotal + req.shipping + req.tax)).abs() > TOTALS_TOLERANCE {
        return Err(AppError::validation(
            "Submitted total does not match subtotal, shipping and tax",
        ));
    }

    let info = &req.shipping_info;
    let order = NewOrder {
        user_id,
        order_number: generate_order_number(),
        subtotal: req.subtotal,
        shipping: req.shipping,
        tax: req.tax,
        total: req.total,
        shipping_name: info.name()?,
        shipping_email: required(info.email.as_deref(), "email")?,
        shipping_address: info.street()?,
        shipping_city: required(info.city.as_deref(), "city")?,
        shipping_state: required(info.state.as_deref(), "state")?,
        shipping_zip: required(info.zip_code.as_deref(), "zip code")?,
        shipping_country: non_empty(info.country.as_deref())
            .unwrap_or(DEFAULT_COUNTRY)
            .to_string(),
    };

    Ok((order, lines))
}

/// Validate and persist: order row + line-item snapshots + cart clear, all in
/// one transaction.
pub async fn create_order(
    pool: &PgPool,
    user_id: Uuid,
    req: CreateOrderRequest,
) -> AppResult<Order> {
    let (order, lines) = validate_order(user_id, &req)?;
    let created = orders::create(pool, &order, &lines).await?;
    tracing::info!(
        order_number = %created.order_number,
        lines = lines.len(),
        "order created"
    );
    Ok(created)
}
