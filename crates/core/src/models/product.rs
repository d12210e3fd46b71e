//! Catalog models

use crate::{category_label, Price};
use serde::{Deserialize, Serialize};

/// Product as returned by `GET /products`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    #[serde(default)]
    pub category: String,
    /// Image reference; the server calls it `image_url`
    #[serde(default, alias = "image_url")]
    pub image: Option<String>,
}

impl Product {
    /// Human-readable category name
    pub fn category_label(&self) -> &str {
        category_label(&self.category)
    }
}
