use super::table::{aliases, DimensionRule, ImageRule, PlatformTable, UnitRule, WeightRule};
use crate::domain::model::Platform;

/// Amazon seller inventory report.
pub fn table() -> PlatformTable {
    PlatformTable {
        platform: Platform::Amazon,
        id: aliases(&["sku", "seller-sku", "asin", "asin1"]),
        title: aliases(&["item-name", "product-name"]),
        description: aliases(&["item-description", "product-description"]),
        price: aliases(&["price", "list-price"]),
        currency: aliases(&["currency"]),
        default_currency: "USD".to_string(),
        quantity: aliases(&["quantity"]),
        images: ImageRule {
            split: aliases(&["image-url", "main-image-url"]),
            separators: vec![','],
            numbered: None,
        },
        category: aliases(&["product-category"]),
        weight: WeightRule {
            aliases: aliases(&["item-weight"]),
            divisor: 1.0,
            unit: UnitRule::fixed("kg"),
        },
        dimensions: DimensionRule {
            combined: aliases(&["item-dimensions"]),
            ..DimensionRule::none("cm")
        },
    }
}

#[cfg(test)]
mod tests {
    use crate::core::normalize::test_support::row;
    use crate::core::normalize::{Normalizer, TableNormalizer};

    #[test]
    fn test_amazon_asin_fallback_and_combined_dimensions() {
        let normalizer = TableNormalizer::new(super::table());
        let product = normalizer
            .normalize(&row(&[
                ("asin", "B00TEST"),
                ("product-name", "Desk Fan"),
                ("list-price", "29.99"),
                ("quantity", "3"),
                ("item-weight", "1.2"),
                ("item-dimensions", "20 x 20 x 35"),
            ]))
            .unwrap()
            .unwrap();

        assert_eq!(product.id, "B00TEST");
        assert_eq!(product.title, "Desk Fan");
        assert_eq!(product.price, 29.99);
        assert_eq!(product.quantity, 3);
        assert_eq!(product.weight, Some(1.2));
        assert_eq!(product.dimensions.as_deref(), Some("20 x 20 x 35"));
        assert!(product.images.is_empty());
    }
}
