use super::table::{
    aliases, DimensionRule, ImageRule, NumberedColumns, PlatformTable, UnitRule, WeightRule,
};
use crate::domain::model::Platform;

/// Highest `Picture URL N` column probed.
pub const MAX_PICTURE_COLUMNS: usize = 12;

/// eBay listing export (Seller Hub / File Exchange).
pub fn table() -> PlatformTable {
    PlatformTable {
        platform: Platform::Ebay,
        id: aliases(&["SKU", "Custom Label", "CustomLabel", "Item ID", "ItemID"]),
        title: aliases(&["Title"]),
        description: aliases(&["Description"]),
        price: aliases(&["Start Price", "StartPrice", "Price", "Buy It Now Price"]),
        currency: aliases(&["Currency"]),
        default_currency: "USD".to_string(),
        quantity: aliases(&["Quantity", "Available Quantity"]),
        images: ImageRule {
            split: aliases(&["PicURL", "Picture URL"]),
            separators: vec!['|'],
            numbered: Some(NumberedColumns {
                prefix: "Picture URL".to_string(),
                max: MAX_PICTURE_COLUMNS,
            }),
        },
        category: aliases(&["Category Name", "Category"]),
        weight: WeightRule {
            aliases: aliases(&["Package Weight", "WeightMajor"]),
            divisor: 1.0,
            unit: UnitRule::aliased(&["Weight Unit"], "kg"),
        },
        dimensions: DimensionRule {
            combined: Vec::new(),
            length: aliases(&["Package Length", "PackageLength", "Length"]),
            width: aliases(&["Package Width", "PackageWidth", "Width"]),
            height: aliases(&["Package Height", "PackageHeight", "Height"]),
            unit: UnitRule {
                aliases: Vec::new(),
                default: "cm".to_string(),
                measurement_system: aliases(&["Measurement System", "MeasurementSystem"]),
                english_unit: Some("in".to_string()),
            },
        },
    }
}
