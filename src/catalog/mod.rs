//! Vehicle catalog model
//!
//! A catalog entry is immutable once seeded: reviews and favorites reference
//! vehicles but never alter their fields. Tags are free-form category labels
//! with no duplicates; the storage layer persists them as a JSON text column
//! and always hands this module a proper list.

pub mod seed;

use serde::{Deserialize, Serialize};

/// A single catalog entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    /// Stable identifier, unique and never reused
    pub id: i64,
    pub title: String,
    pub brand: String,
    pub model: String,
    pub year: i32,
    /// Price in integer currency units (rubles)
    pub price: i64,
    /// Enumerated body category ("SUV", "sedan", ...)
    pub body_type: String,
    pub mileage: i64,
    pub fuel_type: String,
    pub transmission: String,
    pub city: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Vehicle {
    /// Case-insensitive tag membership test
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}
