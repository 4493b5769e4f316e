use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State as AxumState},
    http::StatusCode,
    response::IntoResponse,
};
use domain::{
    cakes::{Cake, CakeSummary},
    orders::{NewOrder, Order, OrderView, Status, StatusUpdate},
    pricing,
    users::{User, UserSummary},
};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::{
    auth::{AdminUser, AuthUser},
    error::AppError,
    repository::Database,
    state::State,
    utils::{AppJson, new_id, now},
};

const ORDER_NOT_FOUND: &str = "Order not found";

#[derive(Debug, Default, Deserialize)]
pub struct OrderQuery {
    pub status: Option<String>,
}

async fn populate(db: &Database, order: Order) -> Result<OrderView, AppError> {
    let cake = db.find::<Cake>(&order.cake_id).await?;
    let user = db.find::<User>(&order.user_id).await?;

    Ok(OrderView {
        cake: cake.as_ref().map(CakeSummary::from),
        user: user.as_ref().map(UserSummary::from),
        order,
    })
}

async fn load_order(db: &Database, id: &str) -> Result<Order, AppError> {
    db.find::<Order>(id)
        .await?
        .ok_or(AppError::NotFound(ORDER_NOT_FOUND))
}

/// Own orders for users, every order for admins.
pub async fn list_orders_handler(
    AxumState(state): AxumState<Arc<State>>,
    AuthUser(user): AuthUser,
    Query(query): Query<OrderQuery>,
) -> Result<impl IntoResponse, AppError> {
    // An unknown status filter matches nothing rather than failing.
    let wanted = query
        .status
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<Status>().ok());

    let mut orders: Vec<Order> = state
        .db
        .find_all::<Order>()
        .await?
        .into_iter()
        .filter(|order| user.is_admin() || order.is_owned_by(&user.id))
        .filter(|order| wanted.is_none_or(|status| status == Some(order.status)))
        .collect();
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let mut views = Vec::with_capacity(orders.len());
    for order in orders {
        views.push(populate(&state.db, order).await?);
    }

    Ok(Json(json!({
        "count": views.len(),
        "orders": views,
    })))
}

pub async fn get_order_handler(
    AxumState(state): AxumState<Arc<State>>,
    requester: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let order = load_order(&state.db, &id).await?;

    if !requester.may_access(&order.user_id) {
        return Err(AppError::Forbidden("Not authorized to view this order"));
    }

    Ok(Json(json!({ "order": populate(&state.db, order).await? })))
}

pub async fn create_order_handler(
    AxumState(state): AxumState<Arc<State>>,
    AuthUser(user): AuthUser,
    AppJson(payload): AppJson<NewOrder>,
) -> Result<impl IntoResponse, AppError> {
    let request = payload.validate()?;

    let cake = state
        .db
        .find::<Cake>(&request.cake_id)
        .await?
        .ok_or(AppError::NotFound("Cake not found"))?;

    if pricing::listed_multiplier(&request.customization.size).is_none() {
        debug!(
            "Size '{}' has no multiplier, pricing at base",
            request.customization.size
        );
    }

    let order = request.place(new_id(), user.id.clone(), cake.price, now());
    state.db.save(&order).await?;

    info!(
        "Order {} placed by {} for {} x{} = {}",
        order.id, user.email, cake.name, order.quantity, order.total_price
    );

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Order placed successfully",
            "order": populate(&state.db, order).await?,
        })),
    ))
}

pub async fn update_order_handler(
    AxumState(state): AxumState<Arc<State>>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
    AppJson(payload): AppJson<StatusUpdate>,
) -> Result<impl IntoResponse, AppError> {
    let status = payload.status()?;

    let mut previous = status;
    let order = state
        .db
        .modify::<Order, AppError, _>(&id, |mut stored| {
            previous = stored.status;
            stored.status = status;
            stored.updated_at = now();
            Ok(stored)
        })
        .await?
        .ok_or(AppError::NotFound(ORDER_NOT_FOUND))?;

    if previous.advances_to(status) {
        info!(
            "Order {} moved {} -> {} by {}",
            order.id, previous, status, admin.email
        );
    } else {
        warn!(
            "Order {} moved off the usual path {} -> {} by {}",
            order.id, previous, status, admin.email
        );
    }

    Ok(Json(json!({
        "message": "Order status updated",
        "order": populate(&state.db, order).await?,
    })))
}

/// Cancels by removing the order. Owners may only do so while it is pending.
pub async fn delete_order_handler(
    AxumState(state): AxumState<Arc<State>>,
    requester: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let order = load_order(&state.db, &id).await?;

    if !requester.0.is_admin() {
        if !order.is_owned_by(&requester.0.id) {
            return Err(AppError::Forbidden("Not authorized to cancel this order"));
        }
        if !order.status.owner_can_cancel() {
            return Err(AppError::Validation("Can only cancel pending orders".into()));
        }
    }

    state.db.remove::<Order>(&order.id).await?;
    info!("Order {} cancelled by {}", order.id, requester.0.email);

    Ok(Json(json!({ "message": "Order cancelled successfully" })))
}
