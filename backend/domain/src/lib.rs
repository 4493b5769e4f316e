//! # Bakery Domain
//!
//! Records shared by the API server and the seeding tool.
//!
//! ## Documents
//!
//! - [`cakes::Cake`]: catalog item, created and edited by admins only
//! - [`users::User`]: account with a bcrypt hash and a role
//! - [`orders::Order`]: one cake, one customization, a quantity and a frozen total
//!
//! Every document serializes with camelCase keys and an `_id` string so the
//! storefront client can read them as-is.
//!
//! ## Pricing
//!
//! Totals are computed once, when the order is placed, by [`pricing::total_price`].
//! Later price edits on the cake never touch existing orders.
use thiserror::Error;

pub mod cakes;
pub mod orders;
pub mod pricing;
pub mod serde_helpers;
pub mod users;

/// Rejected input, carrying the message shown to the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

pub(crate) fn check_max_chars(
    value: &str,
    max: usize,
    message: &'static str,
) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        return Err(ValidationError::new(message));
    }

    Ok(())
}

/// Trims and drops empty strings, the way optional form fields arrive.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
