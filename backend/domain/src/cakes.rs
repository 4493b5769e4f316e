//! # Cakes
//!
//! Catalog items. Only admins create, edit or delete them, and every write
//! goes through the same field checks:
//!
//! - name: required, trimmed, at most 100 characters
//! - description: required, at most 500 characters
//! - price: required, non-negative
//! - category: one of [`Category::ALL`]
use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ValidationError, check_max_chars, non_blank};

pub const DEFAULT_IMAGE: &str = "/placeholder-cake.jpg";

const MAX_NAME_CHARS: usize = 100;
const MAX_DESCRIPTION_CHARS: usize = 500;

const MISSING_FIELDS: &str = "Please provide name, description, price, and category";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Birthday,
    Wedding,
    Custom,
    Seasonal,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Birthday,
        Category::Wedding,
        Category::Custom,
        Category::Seasonal,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Birthday => "birthday",
            Category::Wedding => "wedding",
            Category::Custom => "custom",
            Category::Seasonal => "seasonal",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == s.trim())
            .ok_or_else(|| {
                let allowed: Vec<&str> = Category::ALL.iter().map(|c| c.as_str()).collect();
                ValidationError::new(format!(
                    "Invalid category. Must be one of: {}",
                    allowed.join(", ")
                ))
            })
    }
}

fn default_sizes() -> Vec<String> {
    ["6 inch", "8 inch", "10 inch"].map(String::from).to_vec()
}

fn default_flavors() -> Vec<String> {
    ["Vanilla", "Chocolate", "Strawberry"]
        .map(String::from)
        .to_vec()
}

fn default_true() -> bool {
    true
}

/// What a customer may pick when ordering. Missing keys fall back to the
/// house defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomizableOptions {
    #[serde(default = "default_sizes")]
    pub sizes: Vec<String>,
    #[serde(default = "default_flavors")]
    pub flavors: Vec<String>,
    #[serde(default = "default_true")]
    pub can_add_message: bool,
}

impl Default for CustomizableOptions {
    fn default() -> Self {
        Self {
            sizes: default_sizes(),
            flavors: default_flavors(),
            can_add_message: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cake {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub image: String,
    pub category: Category,
    pub customizable_options: CustomizableOptions,
    pub featured: bool,
    pub available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The slice of a cake embedded in order responses.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CakeSummary {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub price: f64,
    pub image: String,
}

impl From<&Cake> for CakeSummary {
    fn from(cake: &Cake) -> Self {
        Self {
            id: cake.id.clone(),
            name: cake.name.clone(),
            price: cake.price,
            image: cake.image.clone(),
        }
    }
}

/// Body of `POST /api/cakes`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCake {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub customizable_options: Option<CustomizableOptions>,
    pub featured: Option<bool>,
    pub available: Option<bool>,
}

impl NewCake {
    pub fn into_cake(self, id: String, now: DateTime<Utc>) -> Result<Cake, ValidationError> {
        let (Some(name), Some(description), Some(price), Some(category)) = (
            non_blank(self.name),
            non_blank(self.description),
            self.price,
            non_blank(self.category),
        ) else {
            return Err(ValidationError::new(MISSING_FIELDS));
        };

        Ok(Cake {
            id,
            name: validate_name(name)?,
            description: validate_description(description)?,
            price: validate_price(price)?,
            image: non_blank(self.image).unwrap_or_else(|| DEFAULT_IMAGE.to_string()),
            category: category.parse()?,
            customizable_options: self.customizable_options.unwrap_or_default(),
            featured: self.featured.unwrap_or(false),
            available: self.available.unwrap_or(true),
            created_at: now,
            updated_at: now,
        })
    }
}

/// Body of `PUT /api/cakes/{id}`. Absent fields are left alone.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CakePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub customizable_options: Option<CustomizableOptions>,
    pub featured: Option<bool>,
    pub available: Option<bool>,
}

impl CakePatch {
    /// Returns the patched copy; `cake` itself is only read.
    pub fn apply(self, cake: &Cake, now: DateTime<Utc>) -> Result<Cake, ValidationError> {
        let mut updated = cake.clone();

        if let Some(name) = self.name {
            updated.name = validate_name(name)?;
        }
        if let Some(description) = self.description {
            updated.description = validate_description(description)?;
        }
        if let Some(price) = self.price {
            updated.price = validate_price(price)?;
        }
        if let Some(image) = self.image {
            updated.image = non_blank(Some(image)).unwrap_or_else(|| DEFAULT_IMAGE.to_string());
        }
        if let Some(category) = self.category {
            updated.category = category.parse()?;
        }
        if let Some(options) = self.customizable_options {
            updated.customizable_options = options;
        }
        if let Some(featured) = self.featured {
            updated.featured = featured;
        }
        if let Some(available) = self.available {
            updated.available = available;
        }

        updated.updated_at = now;
        Ok(updated)
    }
}

fn validate_name(name: String) -> Result<String, ValidationError> {
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(ValidationError::new("Cake name is required"));
    }
    check_max_chars(&name, MAX_NAME_CHARS, "Name cannot exceed 100 characters")?;

    Ok(name)
}

fn validate_description(description: String) -> Result<String, ValidationError> {
    if description.trim().is_empty() {
        return Err(ValidationError::new("Description is required"));
    }
    check_max_chars(
        &description,
        MAX_DESCRIPTION_CHARS,
        "Description cannot exceed 500 characters",
    )?;

    Ok(description)
}

fn validate_price(price: f64) -> Result<f64, ValidationError> {
    if !price.is_finite() || price < 0.0 {
        return Err(ValidationError::new("Price cannot be negative"));
    }

    Ok(price)
}
