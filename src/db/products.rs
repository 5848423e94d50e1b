//! Product catalog queries (read-only)

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::product::{Product, ProductRef};

/// Maximum rows returned by a substring search.
const SEARCH_LIMIT: i64 = 10;

/// Optional catalog filters; `None` fields are not applied.
#[derive(Debug, Default, Clone)]
pub struct CatalogFilter {
    pub category: Option<String>,
    pub featured: Option<bool>,
    pub is_new: Option<bool>,
}

pub async fn list(pool: &PgPool, filter: &CatalogFilter) -> Result<Vec<Product>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT * FROM products
        WHERE ($1::text IS NULL OR category = $1)
          AND ($2::boolean IS NULL OR featured = $2)
          AND ($3::boolean IS NULL OR is_new = $3)
        ORDER BY created_at DESC
        "#,
    )
    .bind(filter.category.as_deref())
    .bind(filter.featured)
    .bind(filter.is_new)
    .fetch_all(pool)
    .await
}

pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Product>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM products WHERE slug = $1")
        .bind(slug)
        .fetch_optional(pool)
        .await
}

/// Case-insensitive unanchored substring match over name, description and
/// material, capped at a small result count. No ranking.
pub async fn search(pool: &PgPool, term: &str) -> Result<Vec<Product>, sqlx::Error> {
    let pattern = format!("%{}%", term);
    sqlx::query_as(
        r#"
        SELECT * FROM products
        WHERE name ILIKE $1 OR description ILIKE $1 OR material ILIKE $1
        LIMIT $2
        "#,
    )
    .bind(&pattern)
    .bind(SEARCH_LIMIT)
    .fetch_all(pool)
    .await
}

/// Existence + stock lookup used by the cart logic.
pub async fn find_ref(pool: &PgPool, product_id: Uuid) -> Result<Option<ProductRef>, sqlx::Error> {
    let row: Option<(Uuid, i32)> = sqlx::query_as("SELECT id, stock FROM products WHERE id = $1")
        .bind(product_id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|(id, stock)| ProductRef { id, stock }))
}
