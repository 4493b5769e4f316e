use std::sync::Arc;

use axum::{Json, extract::State as AxumState, http::StatusCode, response::IntoResponse};
use domain::users::{Credentials, PublicUser, Role, Signup, User};
use serde_json::json;
use tracing::info;

use crate::{
    auth::{AuthUser, hash_password, verify_password},
    error::AppError,
    state::State,
    utils::{AppJson, new_id, now},
};

const INVALID_LOGIN: &str = "Invalid email or password";

pub async fn signup_handler(
    AxumState(state): AxumState<Arc<State>>,
    AppJson(payload): AppJson<Signup>,
) -> Result<impl IntoResponse, AppError> {
    let signup = payload.validate()?;

    if state.db.find_user_by_email(&signup.email).await?.is_some() {
        return Err(AppError::Validation(
            "User already exists with this email".into(),
        ));
    }

    let created = now();
    let user = User {
        id: new_id(),
        name: signup.name,
        email: signup.email,
        password_hash: hash_password(signup.password, state.config.bcrypt_cost).await?,
        role: Role::User,
        phone: None,
        address: None,
        created_at: created,
        updated_at: created,
    };

    if !state.db.insert_user(&user).await? {
        return Err(AppError::Validation(
            "User already exists with this email".into(),
        ));
    }

    info!("New account {} ({})", user.id, user.email);
    let token = state.tokens.issue(&user)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Account created successfully",
            "token": token,
            "user": PublicUser::from(&user),
        })),
    ))
}

pub async fn login_handler(
    AxumState(state): AxumState<Arc<State>>,
    AppJson(payload): AppJson<Credentials>,
) -> Result<impl IntoResponse, AppError> {
    let (email, password) = payload.validate()?;

    let Some(user) = state.db.find_user_by_email(&email).await? else {
        return Err(AppError::Unauthorized(INVALID_LOGIN));
    };

    if !verify_password(password, user.password_hash.clone()).await? {
        return Err(AppError::Unauthorized(INVALID_LOGIN));
    }

    let token = state.tokens.issue(&user)?;

    Ok(Json(json!({
        "message": "Logged in successfully",
        "token": token,
        "user": PublicUser::from(&user),
    })))
}

pub async fn me_handler(AuthUser(user): AuthUser) -> impl IntoResponse {
    Json(json!({ "user": PublicUser::from(&user) }))
}
