use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State as AxumState},
    http::StatusCode,
    response::IntoResponse,
};
use domain::cakes::{Cake, CakePatch, NewCake};
use serde_json::json;
use tracing::info;

use crate::{
    auth::AdminUser,
    error::AppError,
    search::CakeQuery,
    state::State,
    utils::{AppJson, new_id, now},
};

const CAKE_NOT_FOUND: &str = "Cake not found";

pub async fn list_cakes_handler(
    AxumState(state): AxumState<Arc<State>>,
    Query(query): Query<CakeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let cakes = query.apply(state.db.find_all::<Cake>().await?);

    Ok(Json(json!({
        "count": cakes.len(),
        "cakes": cakes,
    })))
}

pub async fn get_cake_handler(
    AxumState(state): AxumState<Arc<State>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let cake = state
        .db
        .find::<Cake>(&id)
        .await?
        .ok_or(AppError::NotFound(CAKE_NOT_FOUND))?;

    Ok(Json(json!({ "cake": cake })))
}

pub async fn create_cake_handler(
    AxumState(state): AxumState<Arc<State>>,
    AdminUser(admin): AdminUser,
    AppJson(payload): AppJson<NewCake>,
) -> Result<impl IntoResponse, AppError> {
    let cake = payload.into_cake(new_id(), now())?;
    state.db.save(&cake).await?;

    info!("Cake {} '{}' created by {}", cake.id, cake.name, admin.email);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Cake created successfully",
            "cake": cake,
        })),
    ))
}

pub async fn update_cake_handler(
    AxumState(state): AxumState<Arc<State>>,
    AdminUser(_): AdminUser,
    Path(id): Path<String>,
    AppJson(patch): AppJson<CakePatch>,
) -> Result<impl IntoResponse, AppError> {
    let updated = state
        .db
        .modify::<Cake, AppError, _>(&id, |cake| Ok(patch.clone().apply(&cake, now())?))
        .await?
        .ok_or(AppError::NotFound(CAKE_NOT_FOUND))?;

    Ok(Json(json!({
        "message": "Cake updated successfully",
        "cake": updated,
    })))
}

pub async fn delete_cake_handler(
    AxumState(state): AxumState<Arc<State>>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if !state.db.remove::<Cake>(&id).await? {
        return Err(AppError::NotFound(CAKE_NOT_FOUND));
    }

    info!("Cake {id} deleted by {}", admin.email);

    Ok(Json(json!({ "message": "Cake deleted successfully" })))
}
