//! Order persistence
//!
//! Order creation is a single transaction: the order row, its line-item
//! snapshots, and the cart clear commit together or not at all.

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::order::{Order, OrderItem, OrderItemDetail, OrderStatus, OrderWithItems};
use crate::models::product::Product;

/// Fully-validated order ready to persist.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: Uuid,
    pub order_number: String,
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub shipping_name: String,
    pub shipping_email: String,
    pub shipping_address: String,
    pub shipping_city: String,
    pub shipping_state: String,
    pub shipping_zip: String,
    pub shipping_country: String,
}

/// One line-item snapshot to persist alongside the order.
#[derive(Debug, Clone)]
pub struct NewOrderLine {
    pub product_id: Uuid,
    pub product_name: String,
    pub product_price: Decimal,
    pub quantity: i32,
    pub selected_color: String,
    pub selected_size: String,
    pub subtotal: Decimal,
}

/// Insert the order with its line items and clear the user's cart, all in
/// one transaction.
pub async fn create(
    pool: &PgPool,
    order: &NewOrder,
    lines: &[NewOrderLine],
) -> Result<Order, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let created: Order = sqlx::query_as(
        r#"
        INSERT INTO orders (
            user_id, order_number, status, subtotal, shipping, tax, total,
            shipping_name, shipping_email, shipping_address, shipping_city,
            shipping_state, shipping_zip, shipping_country
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
        RETURNING *
        "#,
    )
    .bind(order.user_id)
    .bind(&order.order_number)
    .bind(OrderStatus::Pending)
    .bind(order.subtotal)
    .bind(order.shipping)
    .bind(order.tax)
    .bind(order.total)
    .bind(&order.shipping_name)
    .bind(&order.shipping_email)
    .bind(&order.shipping_address)
    .bind(&order.shipping_city)
    .bind(&order.shipping_state)
    .bind(&order.shipping_zip)
    .bind(&order.shipping_country)
    .fetch_one(&mut *tx)
    .await?;

    let order_ids: Vec<Uuid> = lines.iter().map(|_| created.id).collect();
    let product_ids: Vec<Uuid> = lines.iter().map(|l| l.product_id).collect();
    let names: Vec<String> = lines.iter().map(|l| l.product_name.clone()).collect();
    let prices: Vec<Decimal> = lines.iter().map(|l| l.product_price).collect();
    let quantities: Vec<i32> = lines.iter().map(|l| l.quantity).collect();
    let colors: Vec<String> = lines.iter().map(|l| l.selected_color.clone()).collect();
    let sizes: Vec<String> = lines.iter().map(|l| l.selected_size.clone()).collect();
    let subtotals: Vec<Decimal> = lines.iter().map(|l| l.subtotal).collect();

    sqlx::query(
        r#"
        INSERT INTO order_items (
            order_id, product_id, product_name, product_price,
            quantity, selected_color, selected_size, subtotal
        )
        SELECT * FROM UNNEST(
            $1::uuid[], $2::uuid[], $3::text[], $4::numeric[],
            $5::integer[], $6::text[], $7::text[], $8::numeric[]
        )
        "#,
    )
    .bind(&order_ids)
    .bind(&product_ids)
    .bind(&names)
    .bind(&prices)
    .bind(&quantities)
    .bind(&colors)
    .bind(&sizes)
    .bind(&subtotals)
    .execute(&mut *tx)
    .await?;

    // Clear the originating cart within the same transaction.
    sqlx::query(
        r#"
        DELETE FROM cart_items
        USING carts
        WHERE cart_items.cart_id = carts.id AND carts.user_id = $1
        "#,
    )
    .bind(order.user_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(created)
}

/// The caller's orders newest-first, each with its nested line items. Every
/// item carries the live product row alongside the frozen snapshot, when the
/// product still exists.
pub async fn list_for_user(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<OrderWithItems>, sqlx::Error> {
    let orders: Vec<Order> =
        sqlx::query_as("SELECT * FROM orders WHERE user_id = $1 ORDER BY created_at DESC")
            .bind(user_id)
            .fetch_all(pool)
            .await?;

    if orders.is_empty() {
        return Ok(Vec::new());
    }

    let order_ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
    let items: Vec<OrderItem> =
        sqlx::query_as("SELECT * FROM order_items WHERE order_id = ANY($1)")
            .bind(&order_ids)
            .fetch_all(pool)
            .await?;

    let product_ids: Vec<Uuid> = items.iter().map(|i| i.product_id).collect();
    let products: Vec<Product> = sqlx::query_as("SELECT * FROM products WHERE id = ANY($1)")
        .bind(&product_ids)
        .fetch_all(pool)
        .await?;
    let products_by_id: std::collections::HashMap<Uuid, Product> =
        products.into_iter().map(|p| (p.id, p)).collect();

    let mut grouped: std::collections::HashMap<Uuid, Vec<OrderItemDetail>> =
        std::collections::HashMap::new();
    for item in items {
        let product = products_by_id.get(&item.product_id).cloned();
        grouped
            .entry(item.order_id)
            .or_default()
            .push(OrderItemDetail { item, product });
    }

    Ok(orders
        .into_iter()
        .map(|order| {
            let items = grouped.remove(&order.id).unwrap_or_default();
            OrderWithItems { order, items }
        })
        .collect())
}
