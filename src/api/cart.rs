//! Cart endpoints
//!
//! Thin HTTP shims over `CartService<PgCartStore>`; all semantics live in the
//! service so the local cart mode shares them.

use axum::extract::{Extension, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::UserIdentity;
use crate::cart::PgCartStore;
use crate::error::AppResult;
use crate::models::cart::CartItem;
use crate::services::cart::{CartService, CartView, UpdateOutcome};
use crate::state::AppState;

fn service(state: &AppState) -> CartService<PgCartStore> {
    CartService::new(PgCartStore::new(state.pool.clone()))
}

/// GET /api/cart
pub async fn get_cart(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
) -> AppResult<Json<CartView>> {
    let view = service(&state).get_cart(identity.user_id).await?;
    Ok(Json(view))
}

/// POST /api/cart
#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub product_id: Uuid,
    pub quantity: i32,
    #[serde(default)]
    pub selected_color: Option<String>,
    #[serde(default)]
    pub selected_size: Option<String>,
}

pub async fn add_item(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Json(req): Json<AddItemRequest>,
) -> AppResult<Json<CartItem>> {
    let line = service(&state)
        .add_item(
            identity.user_id,
            req.product_id,
            req.quantity,
            req.selected_color.as_deref(),
            req.selected_size.as_deref(),
        )
        .await?;
    Ok(Json(line))
}

/// PATCH /api/cart
#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    pub item_id: Uuid,
    pub quantity: i32,
}

pub async fn update_item(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Json(req): Json<UpdateItemRequest>,
) -> AppResult<Response> {
    let outcome = service(&state)
        .update_item(identity.user_id, req.item_id, req.quantity)
        .await?;
    Ok(match outcome {
        UpdateOutcome::Updated(line) => Json(line).into_response(),
        UpdateOutcome::Removed => Json(serde_json::json!({ "success": true })).into_response(),
    })
}

/// DELETE /api/cart?item_id=
#[derive(Debug, Deserialize)]
pub struct RemoveItemQuery {
    pub item_id: Uuid,
}

pub async fn remove_item(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Query(query): Query<RemoveItemQuery>,
) -> AppResult<Json<serde_json::Value>> {
    service(&state)
        .remove_item(identity.user_id, query.item_id)
        .await?;
    Ok(Json(serde_json::json!({ "success": true })))
}
