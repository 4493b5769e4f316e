//! # Orders
//!
//! ## Lifecycle
//!
//! ```text
//! pending -> confirmed -> preparing -> ready -> delivered
//!    \           \            \          \
//!     +-----------+------------+----------+--> cancelled
//! ```
//!
//! Admins may set any status; moves off this path are allowed but logged.
//! Owners can only cancel (delete) while the order is still pending.
use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    ValidationError, cakes::CakeSummary, check_max_chars, non_blank, pricing, serde_helpers,
    users::{Address, UserSummary},
};

const MAX_MESSAGE_CHARS: usize = 100;
const MAX_NOTES_CHARS: usize = 500;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Pending,
    Confirmed,
    Preparing,
    Ready,
    Delivered,
    Cancelled,
}

impl Status {
    pub const ALL: [Status; 6] = [
        Status::Pending,
        Status::Confirmed,
        Status::Preparing,
        Status::Ready,
        Status::Delivered,
        Status::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::Confirmed => "confirmed",
            Status::Preparing => "preparing",
            Status::Ready => "ready",
            Status::Delivered => "delivered",
            Status::Cancelled => "cancelled",
        }
    }

    /// Next step of the happy path, `None` once terminal.
    pub fn next(self) -> Option<Status> {
        match self {
            Status::Pending => Some(Status::Confirmed),
            Status::Confirmed => Some(Status::Preparing),
            Status::Preparing => Some(Status::Ready),
            Status::Ready => Some(Status::Delivered),
            Status::Delivered | Status::Cancelled => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Status::Delivered | Status::Cancelled)
    }

    /// Whether moving to `to` follows the lifecycle: one step forward, or a
    /// cancellation before the order is done.
    pub fn advances_to(self, to: Status) -> bool {
        if self.is_terminal() {
            return false;
        }

        to == Status::Cancelled || self.next() == Some(to)
    }

    /// Whether a non-admin owner may still cancel.
    pub fn owner_can_cancel(self) -> bool {
        self == Status::Pending
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::ALL
            .into_iter()
            .find(|status| status.as_str() == s.trim())
            .ok_or_else(|| {
                let allowed: Vec<&str> = Status::ALL.iter().map(|s| s.as_str()).collect();
                ValidationError::new(format!(
                    "Invalid status. Must be one of: {}",
                    allowed.join(", ")
                ))
            })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Customization {
    pub size: String,
    pub flavor: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    pub cake_id: String,
    pub customization: Customization,
    pub quantity: u32,
    pub total_price: f64,
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}

/// An order as returned by the API, with the referenced cake and user
/// filled in when they still exist.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OrderView {
    #[serde(flatten)]
    pub order: Order,
    pub cake: Option<CakeSummary>,
    pub user: Option<UserSummary>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CustomizationInput {
    pub size: Option<String>,
    pub flavor: Option<String>,
    pub message: Option<String>,
}

/// Body of `POST /api/orders`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub cake_id: Option<String>,
    pub customization: Option<CustomizationInput>,
    pub quantity: Option<i64>,
    #[serde(default, deserialize_with = "serde_helpers::flexible_date")]
    pub delivery_date: Option<DateTime<Utc>>,
    pub delivery_address: Option<Address>,
    pub notes: Option<String>,
}

/// A checked order request, waiting for the cake's price.
#[derive(Debug)]
pub struct OrderRequest {
    pub cake_id: String,
    pub customization: Customization,
    pub quantity: u32,
    pub delivery_date: Option<DateTime<Utc>>,
    pub delivery_address: Option<Address>,
    pub notes: Option<String>,
}

impl NewOrder {
    pub fn validate(self) -> Result<OrderRequest, ValidationError> {
        let customization = self.customization.unwrap_or_default();

        let (Some(cake_id), Some(size), Some(flavor)) = (
            non_blank(self.cake_id),
            non_blank(customization.size),
            non_blank(customization.flavor),
        ) else {
            return Err(ValidationError::new(
                "Please provide cakeId and customization (size, flavor)",
            ));
        };

        let message = non_blank(customization.message);
        if let Some(message) = &message {
            check_max_chars(
                message,
                MAX_MESSAGE_CHARS,
                "Message cannot exceed 100 characters",
            )?;
        }

        let notes = non_blank(self.notes);
        if let Some(notes) = &notes {
            check_max_chars(notes, MAX_NOTES_CHARS, "Notes cannot exceed 500 characters")?;
        }

        let quantity = match self.quantity {
            None => 1,
            Some(quantity) => u32::try_from(quantity)
                .ok()
                .filter(|q| *q >= 1)
                .ok_or_else(|| ValidationError::new("Quantity must be at least 1"))?,
        };

        Ok(OrderRequest {
            cake_id,
            customization: Customization {
                size,
                flavor,
                message,
            },
            quantity,
            delivery_date: self.delivery_date,
            delivery_address: self.delivery_address,
            notes,
        })
    }
}

impl OrderRequest {
    /// Freezes the total from the cake's current price.
    pub fn place(self, id: String, user_id: String, base_price: f64, now: DateTime<Utc>) -> Order {
        let total_price =
            pricing::total_price(base_price, &self.customization.size, self.quantity);

        Order {
            id,
            user_id,
            cake_id: self.cake_id,
            customization: self.customization,
            quantity: self.quantity,
            total_price,
            status: Status::Pending,
            delivery_date: self.delivery_date,
            delivery_address: self.delivery_address,
            notes: self.notes,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Body of `PUT /api/orders/{id}`.
#[derive(Debug, Default, Deserialize)]
pub struct StatusUpdate {
    pub status: Option<String>,
}

impl StatusUpdate {
    pub fn status(&self) -> Result<Status, ValidationError> {
        match non_blank(self.status.clone()) {
            None => Err(ValidationError::new("Please provide status")),
            Some(status) => status.parse(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn request(size: &str, quantity: Option<i64>) -> NewOrder {
        NewOrder {
            cake_id: Some("cake-1".into()),
            customization: Some(CustomizationInput {
                size: Some(size.into()),
                flavor: Some("Vanilla".into()),
                message: None,
            }),
            quantity,
            ..Default::default()
        }
    }

    #[test]
    fn test_place_prices_once() {
        let order = request("10 inch", Some(2))
            .validate()
            .unwrap()
            .place("o1".into(), "u1".into(), 50.0, Utc::now());

        assert_eq!(order.total_price, 160.0);
        assert_eq!(order.status, Status::Pending);
        assert_eq!(order.quantity, 2);
    }

    #[test]
    fn test_quantity_defaults_to_one() {
        let valid = request("6 inch", None).validate().unwrap();
        assert_eq!(valid.quantity, 1);
    }

    #[test]
    fn test_quantity_below_one() {
        for bad in [0, -3] {
            let err = request("6 inch", Some(bad)).validate().unwrap_err();
            assert_eq!(err.0, "Quantity must be at least 1");
        }
    }

    #[test]
    fn test_missing_customization() {
        let mut missing = request("8 inch", None);
        missing.customization = None;
        assert!(missing.validate().is_err());

        let mut no_flavor = request("8 inch", None);
        if let Some(c) = no_flavor.customization.as_mut() {
            c.flavor = Some(" ".into());
        }
        assert!(no_flavor.validate().is_err());
    }

    #[test]
    fn test_message_limit() {
        let mut long = request("8 inch", None);
        if let Some(c) = long.customization.as_mut() {
            c.message = Some("a".repeat(101));
        }
        assert!(long.validate().is_err());
    }

    #[test]
    fn test_progression() {
        let mut status = Status::Pending;
        let mut seen = vec![status];
        while let Some(next) = status.next() {
            status = next;
            seen.push(status);
        }

        assert_eq!(seen, Status::ALL[..5].to_vec());
        assert!(Status::Delivered.is_terminal());
        assert!(Status::Cancelled.is_terminal());
        assert!(Status::Cancelled.next().is_none());
    }

    #[test]
    fn test_advances_to() {
        assert!(Status::Pending.advances_to(Status::Confirmed));
        assert!(Status::Ready.advances_to(Status::Delivered));
        assert!(Status::Preparing.advances_to(Status::Cancelled));

        assert!(!Status::Pending.advances_to(Status::Ready));
        assert!(!Status::Ready.advances_to(Status::Confirmed));
        assert!(!Status::Pending.advances_to(Status::Pending));
        assert!(!Status::Delivered.advances_to(Status::Cancelled));
        assert!(!Status::Cancelled.advances_to(Status::Pending));
    }

    #[test]
    fn test_only_pending_cancellable_by_owner() {
        for status in Status::ALL {
            assert_eq!(status.owner_can_cancel(), status == Status::Pending);
        }
    }

    #[test]
    fn test_status_update_messages() {
        assert_eq!(
            StatusUpdate { status: None }.status().unwrap_err().0,
            "Please provide status"
        );
        assert!(
            StatusUpdate {
                status: Some("shipped".into())
            }
            .status()
            .unwrap_err()
            .0
            .contains("pending, confirmed, preparing, ready, delivered, cancelled")
        );
    }

    #[test]
    fn test_delivery_date_formats() {
        let body = r#"{
            "cakeId": "c1",
            "customization": {"size": "8 inch", "flavor": "Lemon"},
            "deliveryDate": "2025-09-01"
        }"#;
        let parsed: NewOrder = serde_json::from_str(body).unwrap();
        assert!(parsed.delivery_date.is_some());

        let without: NewOrder = serde_json::from_str(r#"{"cakeId": "c1"}"#).unwrap();
        assert!(without.delivery_date.is_none());
    }

    #[test]
    fn test_view_flattens() {
        let order = request("8 inch", None)
            .validate()
            .unwrap()
            .place("o1".into(), "u1".into(), 10.0, Utc::now());
        let json = serde_json::to_value(OrderView {
            order,
            cake: None,
            user: None,
        })
        .unwrap();

        assert_eq!(json["_id"], "o1");
        assert_eq!(json["userId"], "u1");
        assert_eq!(json["status"], "pending");
        assert!(json["cake"].is_null());
    }
}
