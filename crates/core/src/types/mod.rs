//! Shared type definitions and newtypes

use serde::{Deserialize, Serialize};
use std::fmt;

/// Price in USD
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Price(pub f64);

impl Price {
    pub fn new(price: f64) -> Self {
        Price(price)
    }

    pub fn as_f64(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

/// Catalog categories known to the storefront
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Food,
    Toys,
    Aquarium,
    Hygiene,
    Accessories,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Food,
        Category::Toys,
        Category::Aquarium,
        Category::Hygiene,
        Category::Accessories,
    ];

    /// Value used in `?category=` and in product records
    pub fn slug(&self) -> &'static str {
        match self {
            Category::Food => "food",
            Category::Toys => "toys",
            Category::Aquarium => "aquarium",
            Category::Hygiene => "hygiene",
            Category::Accessories => "accessories",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Toys => "Toys",
            Category::Aquarium => "Aquariums",
            Category::Hygiene => "Hygiene",
            Category::Accessories => "Accessories",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.slug() == slug)
    }
}

/// Display label for a category slug; unknown slugs are shown as-is
pub fn category_label(slug: &str) -> &str {
    Category::from_slug(slug).map(|c| c.label()).unwrap_or(slug)
}
