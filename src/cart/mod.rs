//! Cart persistence behind one abstract capability
//!
//! The storefront has two cart modes: the persisted per-user cart served over
//! HTTP, and a local in-memory cart. Both share the same merge-by-variant-key
//! semantics, so the reconciliation logic is written once against [`CartStore`]
//! (see `crate::services::cart`) and each backend only supplies the
//! primitives.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::cart::{Cart, CartItem, CartItemDetail, VariantKey};
use crate::models::product::ProductRef;

pub use memory::MemoryCartStore;
pub use postgres::PgCartStore;

/// Storage primitives for one user's cart.
///
/// All line operations are scoped by `cart_id`, so a foreign item id simply
/// does not match; ownership checks fall out of the scoping.
#[async_trait]
pub trait CartStore: Send + Sync {
    /// The user's cart, created empty on first access.
    async fn cart_for_user(&self, user_id: Uuid) -> Result<Cart, AppError>;

    /// Existence and stock of a product, if it exists.
    async fn product_ref(&self, product_id: Uuid) -> Result<Option<ProductRef>, AppError>;

    /// All lines of a cart, joined with current product data.
    async fn items_with_products(&self, cart_id: Uuid) -> Result<Vec<CartItemDetail>, AppError>;

    /// Atomic insert-or-increment on the variant key.
    ///
    /// At most one line per key exists at any time; adding to an existing key
    /// accumulates its quantity. Returns `None` (leaving prior state
    /// unchanged) when the resulting quantity would exceed `stock`.
    async fn merge_line(
        &self,
        cart_id: Uuid,
        key: &VariantKey,
        quantity: i32,
        stock: i32,
    ) -> Result<Option<CartItem>, AppError>;

    /// A line by id, only if it belongs to this cart.
    async fn find_line(&self, cart_id: Uuid, item_id: Uuid) -> Result<Option<CartItem>, AppError>;

    /// Overwrite a line's quantity. `None` when the line is not in this cart.
    async fn set_line_quantity(
        &self,
        cart_id: Uuid,
        item_id: Uuid,
        quantity: i32,
    ) -> Result<Option<CartItem>, AppError>;

    /// Delete a line. `false` when the line is not in this cart.
    async fn remove_line(&self, cart_id: Uuid, item_id: Uuid) -> Result<bool, AppError>;
}
