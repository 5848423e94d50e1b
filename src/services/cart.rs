//! Cart reconciliation
//!
//! Maintains the authoritative per-user cart: one line per
//! (product, color, size) variant, quantities accumulated on repeat adds,
//! every mutation capped by the product's current stock. Written once against
//! [`CartStore`], so the persisted and local cart modes share the semantics.

use serde::Serialize;
use uuid::Uuid;

use crate::cart::CartStore;
use crate::error::{AppError, AppResult};
use crate::models::cart::{Cart, CartItem, CartItemDetail, VariantKey};

/// The caller's cart plus its lines, as returned by `GET /api/cart`.
#[derive(Debug, Serialize)]
pub struct CartView {
    pub cart: Cart,
    pub items: Vec<CartItemDetail>,
}

/// Outcome of a quantity update: updated line, or removed when the requested
/// quantity dropped to zero or below.
#[derive(Debug)]
pub enum UpdateOutcome {
    Updated(CartItem),
    Removed,
}

pub struct CartService<S> {
    store: S,
}

impl<S: CartStore> CartService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Fetch (lazily creating) the caller's cart with all lines joined to
    /// current product data.
    pub async fn get_cart(&self, user_id: Uuid) -> AppResult<CartView> {
        let cart = self.store.cart_for_user(user_id).await?;
        let items = self.store.items_with_products(cart.id).await?;
        Ok(CartView { cart, items })
    }

    /// Add a variant to the cart, merging into an existing line when the
    /// (product, color, size) key matches.
    pub async fn add_item(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        quantity: i32,
        color: Option<&str>,
        size: Option<&str>,
    ) -> AppResult<CartItem> {
        if quantity <= 0 {
            return Err(AppError::validation("Quantity must be a positive integer"));
        }
        let product = self
            .store
            .product_ref(product_id)
            .await?
            .ok_or(AppError::NotFound("Product"))?;

        let cart = self.store.cart_for_user(user_id).await?;
        let key = VariantKey::new(product_id, color, size);

        self.store
            .merge_line(cart.id, &key, quantity, product.stock)
            .await?
            .ok_or(AppError::OutOfStock {
                available: product.stock,
            })
    }

    /// Set a line's quantity; zero or below removes the line. The line must
    /// belong to the caller's cart, otherwise "not found".
    pub async fn update_item(
        &self,
        user_id: Uuid,
        item_id: Uuid,
        quantity: i32,
    ) -> AppResult<UpdateOutcome> {
        let cart = self.store.cart_for_user(user_id).await?;
        let line = self
            .store
            .find_line(cart.id, item_id)
            .await?
            .ok_or(AppError::NotFound("Cart item"))?;

        if quantity <= 0 {
            self.store.remove_line(cart.id, item_id).await?;
            return Ok(UpdateOutcome::Removed);
        }

        let product = self
            .store
            .product_ref(line.product_id)
            .await?
            .ok_or(AppError::NotFound("Product"))?;
        if quantity > product.stock {
            return Err(AppError::OutOfStock {
                available: product.stock,
            });
        }

        let updated = self
            .store
            .set_line_quantity(cart.id, item_id, quantity)
            .await?
            .ok_or(AppError::NotFound("Cart item"))?;
        Ok(UpdateOutcome::Updated(updated))
    }

    /// Remove a line from the caller's cart. Unknown and foreign ids both
    /// report "not found".
    pub async fn remove_item(&self, user_id: Uuid, item_id: Uuid) -> AppResult<()> {
        let cart = self.store.cart_for_user(user_id).await?;
        if !self.store.remove_line(cart.id, item_id).await? {
            return Err(AppError::NotFound("Cart item"));
        }
        Ok(())
    }
}
