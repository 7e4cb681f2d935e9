//! Order CRUD endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use order_store::{NewOrder, NewOrderItem, Order, OrderStore};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Status assigned to every newly created order. The wire contract carries
/// no status field on creation.
const NEW_ORDER_STATUS: &str = "NEW";

/// Shared application state accessible from all handlers.
pub struct AppState<S: OrderStore> {
    pub store: S,
}

// -- Request types --

/// Body of `POST /orders`.
///
/// Fields are optional so that a missing one surfaces as a typed
/// invalid-input error instead of a deserialization rejection.
#[derive(Deserialize)]
pub struct CreateOrderRequest {
    pub customer_email: Option<String>,
    pub cart_items: Option<Vec<CartItemRequest>>,
}

#[derive(Deserialize)]
pub struct CartItemRequest {
    pub game_id: i64,
    pub quantity: i64,
}

/// Body of `PATCH /orders/{order_id}`. Without a `status` field the update
/// is a no-op that still succeeds.
#[derive(Deserialize)]
pub struct UpdateOrderRequest {
    pub status: Option<String>,
}

// -- Response envelope --

/// Success envelope: the payload sits under `data`.
#[derive(Serialize)]
pub struct DataResponse<T> {
    pub data: T,
}

/// List payload: orders sit under `data.orders`.
#[derive(Serialize)]
pub struct OrderList {
    pub orders: Vec<Order>,
}

// -- Handlers --

/// GET /orders — list every order with its nested items.
#[tracing::instrument(skip(state))]
pub async fn list<S: OrderStore>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<DataResponse<OrderList>>, ApiError> {
    metrics::counter!("orders_list_requests").increment(1);

    let orders = state
        .store
        .list_all()
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    if orders.is_empty() {
        return Err(ApiError::NoOrders);
    }

    Ok(Json(DataResponse {
        data: OrderList { orders },
    }))
}

/// GET /orders/{order_id} — load one order by primary key.
#[tracing::instrument(skip(state))]
pub async fn get<S: OrderStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(order_id): Path<i64>,
) -> Result<Json<DataResponse<Order>>, ApiError> {
    metrics::counter!("orders_get_requests").increment(1);

    let order = state
        .store
        .find_by_id(order_id)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .ok_or(ApiError::OrderNotFound)?;

    Ok(Json(DataResponse { data: order }))
}

/// POST /orders — create a new order from the cart payload.
///
/// Required fields are checked before the store is touched; validation
/// failures and store failures both render as the creation-failure envelope.
#[tracing::instrument(skip(state, payload))]
pub async fn create<S: OrderStore>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<DataResponse<Order>>), ApiError> {
    metrics::counter!("orders_create_requests").increment(1);

    let Json(req) = payload.map_err(|e| ApiError::InvalidCreatePayload(e.body_text()))?;

    let customer_email = req
        .customer_email
        .ok_or_else(|| ApiError::InvalidCreatePayload("customer_email is required".to_string()))?;
    let cart_items = req
        .cart_items
        .ok_or_else(|| ApiError::InvalidCreatePayload("cart_items is required".to_string()))?;

    let items = cart_items
        .into_iter()
        .map(|item| NewOrderItem {
            game_id: item.game_id,
            quantity: item.quantity,
        })
        .collect();

    let order = state
        .store
        .create(NewOrder {
            customer_email,
            status: NEW_ORDER_STATUS.to_string(),
            items,
        })
        .await
        .map_err(ApiError::CreateFailed)?;

    metrics::counter!("orders_created_total").increment(1);

    Ok((StatusCode::CREATED, Json(DataResponse { data: order })))
}

/// PATCH /orders/{order_id} — overwrite the order's status.
///
/// The order id is resolved before the body matters: a missing order is 404
/// no matter what the body holds. An absent or unparseable body behaves as a
/// request without a `status` field, i.e. a no-op update.
#[tracing::instrument(skip(state, payload))]
pub async fn update<S: OrderStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(order_id): Path<i64>,
    payload: Result<Json<UpdateOrderRequest>, JsonRejection>,
) -> Result<Json<DataResponse<Order>>, ApiError> {
    metrics::counter!("orders_update_requests").increment(1);

    let status = payload.ok().and_then(|Json(req)| req.status);

    let order = state
        .store
        .update_status(order_id, status)
        .await
        .map_err(ApiError::UpdateFailed)?
        .ok_or(ApiError::UpdateTargetMissing(order_id))?;

    Ok(Json(DataResponse { data: order }))
}
