//! PostgreSQL-backed cart store
//!
//! The merge primitive is a single upsert against the
//! (cart_id, product_id, selected_color, selected_size) unique constraint, so
//! two simultaneous adds for the same variant can never lose an increment or
//! create a duplicate line.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::products;
use crate::error::AppError;
use crate::models::cart::{Cart, CartItem, CartItemDetail, VariantKey};
use crate::models::product::{Product, ProductRef};

use super::CartStore;

#[derive(Clone)]
pub struct PgCartStore {
    pool: PgPool,
}

impl PgCartStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CartStore for PgCartStore {
    async fn cart_for_user(&self, user_id: Uuid) -> Result<Cart, AppError> {
        // Upsert keyed on user_id; the no-op DO UPDATE makes RETURNING yield
        // the existing row instead of nothing.
        let cart = sqlx::query_as(
            r#"
            INSERT INTO carts (user_id)
            VALUES ($1)
            ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
            RETURNING *
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(cart)
    }

    async fn product_ref(&self, product_id: Uuid) -> Result<Option<ProductRef>, AppError> {
        Ok(products::find_ref(&self.pool, product_id).await?)
    }

    async fn items_with_products(&self, cart_id: Uuid) -> Result<Vec<CartItemDetail>, AppError> {
        let items: Vec<CartItem> = sqlx::query_as("SELECT * FROM cart_items WHERE cart_id = $1")
            .bind(cart_id)
            .fetch_all(&self.pool)
            .await?;

        if items.is_empty() {
            return Ok(Vec::new());
        }

        let product_ids: Vec<Uuid> = items.iter().map(|i| i.product_id).collect();
        let products: Vec<Product> = sqlx::query_as("SELECT * FROM products WHERE id = ANY($1)")
            .bind(&product_ids)
            .fetch_all(&self.pool)
            .await?;
        let by_id: std::collections::HashMap<Uuid, Product> =
            products.into_iter().map(|p| (p.id, p)).collect();

        // A line whose product row vanished is dropped from the view rather
        // than failing the whole cart read.
        Ok(items
            .into_iter()
            .filter_map(|item| {
                let product = by_id.get(&item.product_id).cloned()?;
                Some(CartItemDetail { item, product })
            })
            .collect())
    }

    async fn merge_line(
        &self,
        cart_id: Uuid,
        key: &VariantKey,
        quantity: i32,
        stock: i32,
    ) -> Result<Option<CartItem>, AppError> {
        // No row back means the stock cap rejected either path; prior state
        // is untouched in both cases.
        let line = sqlx::query_as(
            r#"
            INSERT INTO cart_items (cart_id, product_id, quantity, selected_color, selected_size)
            SELECT $1::uuid, $2::uuid, $3::integer, $4::text, $5::text
            WHERE $3::integer <= $6::integer
            ON CONFLICT (cart_id, product_id, selected_color, selected_size)
            DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity
            WHERE cart_items.quantity + EXCLUDED.quantity <= $6
            RETURNING *
            "#,
        )
        .bind(cart_id)
        .bind(key.product_id)
        .bind(quantity)
        .bind(&key.color)
        .bind(&key.size)
        .bind(stock)
        .fetch_optional(&self.pool)
        .await?;
        Ok(line)
    }

    async fn find_line(&self, cart_id: Uuid, item_id: Uuid) -> Result<Option<CartItem>, AppError> {
        let line = sqlx::query_as("SELECT * FROM cart_items WHERE id = $1 AND cart_id = $2")
            .bind(item_id)
            .bind(cart_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(line)
    }

    async fn set_line_quantity(
        &self,
        cart_id: Uuid,
        item_id: Uuid,
        quantity: i32,
    ) -> Result<Option<CartItem>, AppError> {
        let line = sqlx::query_as(
            "UPDATE cart_items SET quantity = $1 WHERE id = $2 AND cart_id = $3 RETURNING *",
        )
        .bind(quantity)
        .bind(item_id)
        .bind(cart_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(line)
    }

    async fn remove_line(&self, cart_id: Uuid, item_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM cart_items WHERE id = $1 AND cart_id = $2")
            .bind(item_id)
            .bind(cart_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
