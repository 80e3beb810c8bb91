use super::table::{aliases, DimensionRule, ImageRule, PlatformTable, UnitRule, WeightRule};
use crate::domain::model::Platform;

/// WooCommerce "Export products" CSV.
pub fn table() -> PlatformTable {
    PlatformTable {
        platform: Platform::WooCommerce,
        id: aliases(&["SKU", "sku", "ID"]),
        title: aliases(&["Name", "Title", "name"]),
        description: aliases(&["Description", "Short description", "description"]),
        price: aliases(&["Regular price", "Sale price", "Price", "price"]),
        currency: aliases(&["Currency"]),
        default_currency: "USD".to_string(),
        quantity: aliases(&["Stock", "Stock quantity", "Quantity"]),
        images: ImageRule {
            split: aliases(&["Images", "Image URL"]),
            separators: vec![',', '|'],
            numbered: None,
        },
        category: aliases(&["Categories", "Category"]),
        weight: WeightRule {
            aliases: aliases(&["Weight (kg)", "Weight"]),
            divisor: 1.0,
            unit: UnitRule::aliased(&["Weight unit"], "kg"),
        },
        dimensions: DimensionRule {
            combined: aliases(&["Dimensions"]),
            length: aliases(&["Length (cm)", "Length"]),
            width: aliases(&["Width (cm)", "Width"]),
            height: aliases(&["Height (cm)", "Height"]),
            unit: UnitRule::aliased(&["Dimension unit"], "cm"),
        },
    }
}
