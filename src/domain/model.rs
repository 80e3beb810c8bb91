use crate::utils::error::EtlError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// One decoded CSV data row, keyed by the verbatim header names.
pub type Row = HashMap<String, String>;

/// Event kind for classified listings.
pub const LISTING_KIND: u32 = 30402;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[serde(alias = "woo")]
    WooCommerce,
    Ebay,
    Shopify,
    Amazon,
}

impl Platform {
    pub const ALL: [Platform; 4] = [
        Platform::WooCommerce,
        Platform::Ebay,
        Platform::Shopify,
        Platform::Amazon,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::WooCommerce => "woocommerce",
            Platform::Ebay => "ebay",
            Platform::Shopify => "shopify",
            Platform::Amazon => "amazon",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = EtlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "woocommerce" | "woo" => Ok(Platform::WooCommerce),
            "ebay" => Ok(Platform::Ebay),
            "shopify" => Ok(Platform::Shopify),
            "amazon" => Ok(Platform::Amazon),
            _ => Err(EtlError::UnsupportedPlatform {
                name: s.to_string(),
            }),
        }
    }
}

/// Platform-independent product, one per retained source row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedProduct {
    pub id: String,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub currency: String,
    pub quantity: u64,
    pub images: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimension_unit: Option<String>,
}

/// Tagged listing event, the unit handed to a publisher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingEvent {
    pub kind: u32,
    pub created_at: i64,
    pub content: String,
    pub tags: Vec<Vec<String>>,
}

impl ListingEvent {
    /// 取得第一個指定名稱的標籤值
    pub fn tag_value(&self, name: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|tag| tag.first().map(String::as_str) == Some(name))
            .and_then(|tag| tag.get(1))
            .map(String::as_str)
    }

    /// The `d` tag: the product identifier this event is addressed by.
    pub fn identifier(&self) -> Option<&str> {
        self.tag_value("d")
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchOutput {
    pub products: Vec<NormalizedProduct>,
    pub rows_read: usize,
    pub rows_dropped: usize,
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub products: Vec<NormalizedProduct>,
    pub events: Vec<ListingEvent>,
    pub csv_output: String,
    pub rows_dropped: usize,
}

/// Logical product fields that carry an alias chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AliasField {
    Id,
    Title,
    Description,
    Price,
    Currency,
    Quantity,
    Images,
    Category,
    Weight,
    Dimensions,
}

/// Extra column aliases appended after a platform's built-in chain.
pub type ExtraAliases = HashMap<AliasField, Vec<String>>;

/// Per-event publish result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventOutcome {
    pub identifier: String,
    pub accepted_by: Vec<String>,
    pub errors: Vec<String>,
}

impl EventOutcome {
    pub fn is_published(&self) -> bool {
        !self.accepted_by.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishReport {
    pub outcomes: Vec<EventOutcome>,
}

impl PublishReport {
    pub fn published(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_published()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.published()
    }
}
