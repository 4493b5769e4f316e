//! Size-based pricing.
//!
//! | Size    | Multiplier |
//! |---------|------------|
//! | 8 inch  | 1.3        |
//! | 10 inch | 1.6        |
//! | 12 inch | 2          |
//! | 3 tier  | 1          |
//! | 4 tier  | 1.3        |
//! | 5 tier  | 1.6        |
//!
//! Anything else, including the default "6 inch", prices at 1.

pub const DEFAULT_MULTIPLIER: f64 = 1.0;

pub const SIZE_MULTIPLIERS: [(&str, f64); 6] = [
    ("8 inch", 1.3),
    ("10 inch", 1.6),
    ("12 inch", 2.0),
    ("3 tier", 1.0),
    ("4 tier", 1.3),
    ("5 tier", 1.6),
];

pub fn listed_multiplier(size: &str) -> Option<f64> {
    SIZE_MULTIPLIERS
        .iter()
        .find(|(label, _)| *label == size)
        .map(|(_, multiplier)| *multiplier)
}

pub fn size_multiplier(size: &str) -> f64 {
    listed_multiplier(size).unwrap_or(DEFAULT_MULTIPLIER)
}

pub fn total_price(base_price: f64, size: &str, quantity: u32) -> f64 {
    base_price * size_multiplier(size) * f64::from(quantity)
}
