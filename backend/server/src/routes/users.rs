use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State as AxumState},
    response::IntoResponse,
};
use domain::users::{ProfileUpdate, PublicUser, RoleUpdate, User};
use serde_json::json;
use tracing::info;

use crate::{
    auth::{AdminUser, AuthUser},
    error::AppError,
    state::State,
    utils::{AppJson, now},
};

const USER_NOT_FOUND: &str = "User not found";

pub async fn list_users_handler(
    AxumState(state): AxumState<Arc<State>>,
    AdminUser(_): AdminUser,
) -> Result<impl IntoResponse, AppError> {
    let mut users = state.db.find_all::<User>().await?;
    users.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let users: Vec<PublicUser> = users.iter().map(PublicUser::from).collect();

    Ok(Json(json!({
        "count": users.len(),
        "users": users,
    })))
}

pub async fn get_user_handler(
    AxumState(state): AxumState<Arc<State>>,
    AdminUser(_): AdminUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let user = state
        .db
        .find::<User>(&id)
        .await?
        .ok_or(AppError::NotFound(USER_NOT_FOUND))?;

    Ok(Json(json!({ "user": PublicUser::from(&user) })))
}

pub async fn update_profile_handler(
    AxumState(state): AxumState<Arc<State>>,
    AuthUser(user): AuthUser,
    AppJson(update): AppJson<ProfileUpdate>,
) -> Result<impl IntoResponse, AppError> {
    let user = state
        .db
        .modify::<User, AppError, _>(&user.id, |mut stored| {
            update.clone().apply(&mut stored, now());
            Ok(stored)
        })
        .await?
        .ok_or(AppError::NotFound(USER_NOT_FOUND))?;

    Ok(Json(json!({
        "message": "Profile updated successfully",
        "user": PublicUser::from(&user),
    })))
}

pub async fn update_role_handler(
    AxumState(state): AxumState<Arc<State>>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
    AppJson(update): AppJson<RoleUpdate>,
) -> Result<impl IntoResponse, AppError> {
    let role = update.role()?;

    let mut previous = role;
    let user = state
        .db
        .modify::<User, AppError, _>(&id, |mut stored| {
            previous = stored.role;
            stored.role = role;
            stored.updated_at = now();
            Ok(stored)
        })
        .await?
        .ok_or(AppError::NotFound(USER_NOT_FOUND))?;

    info!(
        "Role of {} changed {} -> {} by {}",
        user.email, previous, role, admin.email
    );

    Ok(Json(json!({
        "message": "User role updated",
        "user": PublicUser::from(&user),
    })))
}

pub async fn delete_user_handler(
    AxumState(state): AxumState<Arc<State>>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let user = state
        .db
        .find::<User>(&id)
        .await?
        .ok_or(AppError::NotFound(USER_NOT_FOUND))?;

    if user.id == admin.id {
        return Err(AppError::Validation("Cannot delete your own account".into()));
    }

    state.db.remove_user(&user).await?;
    info!("User {} deleted by {}", user.email, admin.email);

    Ok(Json(json!({ "message": "User deleted successfully" })))
}
