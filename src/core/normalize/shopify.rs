use super::table::{aliases, DimensionRule, ImageRule, PlatformTable, UnitRule, WeightRule};
use crate::domain::model::Platform;

/// Shopify product CSV. Weight is exported in grams and there are no
/// dimension columns.
pub fn table() -> PlatformTable {
    PlatformTable {
        platform: Platform::Shopify,
        id: aliases(&["Variant SKU", "Handle", "ID"]),
        title: aliases(&["Title"]),
        description: aliases(&["Body (HTML)", "Body HTML"]),
        price: aliases(&["Variant Price", "Price"]),
        currency: Vec::new(),
        default_currency: "USD".to_string(),
        quantity: aliases(&["Variant Inventory Qty", "Inventory Qty"]),
        images: ImageRule {
            split: aliases(&["Image Src"]),
            separators: vec![','],
            numbered: None,
        },
        category: aliases(&["Type", "Product Category"]),
        weight: WeightRule {
            aliases: aliases(&["Variant Grams"]),
            divisor: 1000.0,
            unit: UnitRule::fixed("kg"),
        },
        dimensions: DimensionRule::none("cm"),
    }
}
