//! In-memory cart store
//!
//! Test double for the reconciliation service, modeling the local
//! (not-signed-in) cart mode. Same merge semantics as the Postgres store,
//! behind a single mutex.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::cart::{Cart, CartItem, CartItemDetail, VariantKey};
use crate::models::product::{Product, ProductRef};

use super::CartStore;

#[derive(Default)]
struct Inner {
    products: HashMap<Uuid, Product>,
    carts: HashMap<Uuid, Cart>,
    lines: HashMap<Uuid, Vec<CartItem>>,
}

#[derive(Default)]
pub struct MemoryCartStore {
    inner: Mutex<Inner>,
}

impl MemoryCartStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
        let store = Self::new();
        {
            let mut inner = store.inner.lock().unwrap();
            for p in products {
                inner.products.insert(p.id, p);
            }
        }
        store
    }

    /// Replace a product row (catalog edits happen outside the cart subsystem).
    pub fn put_product(&self, product: Product) {
        self.inner.lock().unwrap().products.insert(product.id, product);
    }
}

#[async_trait]
impl CartStore for MemoryCartStore {
    async fn cart_for_user(&self, user_id: Uuid) -> Result<Cart, AppError> {
        let mut inner = self.inner.lock().unwrap();
        let cart = inner.carts.entry(user_id).or_insert_with(|| Cart {
            id: Uuid::new_v4(),
            user_id,
            created_at: Utc::now(),
        });
        Ok(cart.clone())
    }

    async fn product_ref(&self, product_id: Uuid) -> Result<Option<ProductRef>, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.products.get(&product_id).map(|p| ProductRef {
            id: p.id,
            stock: p.stock,
        }))
    }

    async fn items_with_products(&self, cart_id: Uuid) -> Result<Vec<CartItemDetail>, AppError> {
        let inner = self.inner.lock().unwrap();
        let items = inner.lines.get(&cart_id).cloned().unwrap_or_default();
        Ok(items
            .into_iter()
            .filter_map(|item| {
                let product = inner.products.get(&item.product_id).cloned()?;
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
        let mut inner = self.inner.lock().unwrap();
        let lines = inner.lines.entry(cart_id).or_default();

        if let Some(line) = lines.iter_mut().find(|l| {
            l.product_id == key.product_id
                && l.selected_color == key.color
                && l.selected_size == key.size
        }) {
            if line.quantity + quantity > stock {
                return Ok(None);
            }
            line.quantity += quantity;
            return Ok(Some(line.clone()));
        }

        if quantity > stock {
            return Ok(None);
        }
        let line = CartItem {
            id: Uuid::new_v4(),
            cart_id,
            product_id: key.product_id,
            quantity,
            selected_color: key.color.clone(),
            selected_size: key.size.clone(),
        };
        lines.push(line.clone());
        Ok(Some(line))
    }

    async fn find_line(&self, cart_id: Uuid, item_id: Uuid) -> Result<Option<CartItem>, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .lines
            .get(&cart_id)
            .and_then(|lines| lines.iter().find(|l| l.id == item_id).cloned()))
    }

    async fn set_line_quantity(
        &self,
        cart_id: Uuid,
        item_id: Uuid,
        quantity: i32,
    ) -> Result<Option<CartItem>, AppError> {
        let mut inner = self.inner.lock().unwrap();
        let Some(lines) = inner.lines.get_mut(&cart_id) else {
            return Ok(None);
        };
        let Some(line) = lines.iter_mut().find(|l| l.id == item_id) else {
            return Ok(None);
        };
        line.quantity = quantity;
        Ok(Some(line.clone()))
    }

    async fn remove_line(&self, cart_id: Uuid, item_id: Uuid) -> Result<bool, AppError> {
        let mut inner = self.inner.lock().unwrap();
        let Some(lines) = inner.lines.get_mut(&cart_id) else {
            return Ok(false);
        };
        let before = lines.len();
        lines.retain(|l| l.id != item_id);
        Ok(lines.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::product::{Product, ProductColor, ProductSize};
    use rust_decimal_macros::dec;
    use sqlx::types::Json;

    fn product(stock: i32) -> Product {
        Product {
            id: Uuid::new_v4(),
            slug: "linen-set".into(),
            name: "Linen Set".into(),
            description: "Two-piece linen set".into(),
            price: dec!(85.00),
            category: "sets".into(),
            material: Some("linen".into()),
            featured: false,
            is_new: true,
            image_url: None,
            hover_image_url: None,
            colors: Json(vec![ProductColor {
                name: "Sand".into(),
                hex: "#d8c7a8".into(),
                images: None,
            }]),
            sizes: Json(vec![ProductSize {
                size: "S".into(),
                in_stock: true,
            }]),
            stock,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn cart_is_created_once_per_user() {
        let store = MemoryCartStore::new();
        let user = Uuid::new_v4();
        let a = store.cart_for_user(user).await.unwrap();
        let b = store.cart_for_user(user).await.unwrap();
        assert_eq!(a.id, b.id);
    }

    #[tokio::test]
    async fn catalog_edits_show_through_the_cart_view() {
        // The cart view joins current product data; only order snapshots
        // are frozen.
        let mut p = product(5);
        let store = MemoryCartStore::with_products(vec![p.clone()]);
        let cart = store.cart_for_user(Uuid::new_v4()).await.unwrap();
        let key = VariantKey::new(p.id, Some("Sand"), Some("S"));
        store.merge_line(cart.id, &key, 1, 5).await.unwrap().unwrap();

        p.name = "Linen Set (renamed)".into();
        p.price = dec!(95.00);
        store.put_product(p.clone());

        let view = store.items_with_products(cart.id).await.unwrap();
        assert_eq!(view[0].product.name, "Linen Set (renamed)");
        assert_eq!(view[0].product.price, dec!(95.00));
    }

    #[tokio::test]
    async fn merge_respects_the_cap_on_both_paths() {
        let p = product(2);
        let store = MemoryCartStore::with_products(vec![p.clone()]);
        let cart = store.cart_for_user(Uuid::new_v4()).await.unwrap();
        let key = VariantKey::new(p.id, None, None);

        // Fresh insert over the cap.
        assert!(store.merge_line(cart.id, &key, 3, 2).await.unwrap().is_none());
        // Within the cap, then increment over it.
        assert!(store.merge_line(cart.id, &key, 2, 2).await.unwrap().is_some());
        assert!(store.merge_line(cart.id, &key, 1, 2).await.unwrap().is_none());

        let view = store.items_with_products(cart.id).await.unwrap();
        assert_eq!(view[0].item.quantity, 2);
    }
}
