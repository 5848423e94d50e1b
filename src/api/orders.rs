//! Order endpoints: create from a cart snapshot, list history

use axum::Json;
use axum::extract::{Extension, State};

use crate::auth::UserIdentity;
use crate::db::orders;
use crate::error::AppResult;
use crate::models::order::OrderWithItems;
use crate::services::orders::{self as order_service, CreateOrderRequest};
use crate::state::AppState;

/// POST /api/orders
pub async fn create_order(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Json(req): Json<CreateOrderRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let order = order_service::create_order(&state.pool, identity.user_id, req).await?;
    let order_number = order.order_number.clone();
    Ok(Json(serde_json::json!({
        "order": order,
        "orderNumber": order_number,
    })))
}

/// GET /api/orders
pub async fn list_orders(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
) -> AppResult<Json<Vec<OrderWithItems>>> {
    let list = orders::list_for_user(&state.pool, identity.user_id).await?;
    Ok(Json(list))
}
