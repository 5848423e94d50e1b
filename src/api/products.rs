//! Catalog endpoints: list, detail by slug, substring search

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;

use crate::db::products::{self, CatalogFilter};
use crate::error::{AppError, AppResult};
use crate::models::product::Product;
use crate::state::AppState;

/// GET /api/products
///
/// `?category=` is ignored when absent or `all`; `?featured=true` and
/// `?new=true` narrow to the matching flags.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub category: Option<String>,
    pub featured: Option<String>,
    #[serde(rename = "new")]
    pub is_new: Option<String>,
}

fn flag(value: &Option<String>) -> Option<bool> {
    matches!(value.as_deref(), Some("true")).then_some(true)
}

pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Product>>> {
    let filter = CatalogFilter {
        category: query.category.filter(|c| c != "all"),
        featured: flag(&query.featured),
        is_new: flag(&query.is_new),
    };
    let list = products::list(&state.pool, &filter).await?;
    Ok(Json(list))
}

/// GET /api/products/{slug}
pub async fn get_product(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<Product>> {
    let product = products::find_by_slug(&state.pool, &slug)
        .await?
        .ok_or(AppError::NotFound("Product"))?;
    Ok(Json(product))
}

/// GET /api/products/search?q=
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

pub async fn search_products(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let term = query.q.as_deref().map(str::trim).unwrap_or_default();
    if term.is_empty() {
        return Ok(Json(serde_json::json!({ "products": [] })));
    }
    let found = products::search(&state.pool, term).await?;
    Ok(Json(serde_json::json!({ "products": found })))
}
