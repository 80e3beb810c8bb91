//! Product -> listing event encoding.
//!
//! Tag order is fixed: `d`, `title`, `price`, `type`, `visibility`,
//! `stock`, `summary`, then one `image` tag per image, then the optional
//! `t`, `weight` and `dim` tags.

use crate::domain::model::{ListingEvent, NormalizedProduct, LISTING_KIND};

/// Summary tag length, in characters.
pub const SUMMARY_CHARS: usize = 280;

fn tag<const N: usize>(parts: [&str; N]) -> Vec<String> {
    parts.iter().map(|part| part.to_string()).collect()
}

/// Plain decimal rendering: no exponent, no grouping, `20` not `20.0`.
pub fn format_number(value: f64) -> String {
    // f64 Display 不會使用科學記號
    format!("{}", value)
}

pub fn encode(product: &NormalizedProduct, created_at: i64) -> ListingEvent {
    let price = format_number(product.price);
    let stock = product.quantity.to_string();
    let summary: String = product.description.chars().take(SUMMARY_CHARS).collect();

    let mut tags = vec![
        tag(["d", product.id.as_str()]),
        tag(["title", product.title.as_str()]),
        tag(["price", price.as_str(), product.currency.as_str()]),
        tag(["type", "simple", "physical"]),
        tag(["visibility", "on-sale"]),
        tag(["stock", stock.as_str()]),
        tag(["summary", summary.as_str()]),
    ];

    for (idx, url) in product.images.iter().enumerate() {
        tags.push(tag(["image", url.as_str(), "", idx.to_string().as_str()]));
    }

    if let Some(category) = product.category.as_deref().filter(|c| !c.trim().is_empty()) {
        tags.push(tag(["t", category]));
    }

    let weight = product.weight.filter(|w| *w > 0.0);
    if let (Some(weight), Some(unit)) = (weight, non_empty(&product.weight_unit)) {
        tags.push(tag(["weight", format_number(weight).as_str(), unit]));
    }

    if let (Some(dimensions), Some(unit)) = (
        non_empty(&product.dimensions),
        non_empty(&product.dimension_unit),
    ) {
        tags.push(tag(["dim", dimensions, unit]));
    }

    ListingEvent {
        kind: LISTING_KIND,
        created_at,
        content: product.description.clone(),
        tags,
    }
}

/// [`encode`] stamped with the current time.
pub fn encode_now(product: &NormalizedProduct) -> ListingEvent {
    encode(product, chrono::Utc::now().timestamp())
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
