use axum::extract::FromRequest;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::AppError;

/// `Json` with the rejection turned into a 400 `{ message }` body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Lowercased, whitespace-collapsed form used for catalog search.
pub fn fold(input: &str) -> String {
    input
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
