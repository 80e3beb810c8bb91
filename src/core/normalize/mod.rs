//! Row normalization: one alias table per platform, one shared normalizer.
//!
//! Numeric cells are decoded tolerantly. A malformed price, quantity or
//! weight becomes `0` instead of failing the row or the batch.

pub mod amazon;
pub mod ebay;
pub mod shopify;
pub mod table;
pub mod woocommerce;

use crate::core::resolver::{resolve, resolve_opt};
use crate::domain::model::{ExtraAliases, NormalizedProduct, Platform, Row};
use crate::utils::error::Result;
use regex::Regex;
use std::sync::LazyLock;
pub use table::PlatformTable;
use table::{DimensionRule, ImageRule, UnitRule};

pub trait Normalizer: Send + Sync {
    fn platform(&self) -> Platform;

    /// `Ok(None)` means the row is not a usable product and is dropped.
    fn normalize(&self, row: &Row) -> Result<Option<NormalizedProduct>>;
}

pub fn platform_table(platform: Platform) -> PlatformTable {
    match platform {
        Platform::WooCommerce => woocommerce::table(),
        Platform::Ebay => ebay::table(),
        Platform::Shopify => shopify::table(),
        Platform::Amazon => amazon::table(),
    }
}

pub fn normalizer_for(platform: Platform, extra: Option<&ExtraAliases>) -> TableNormalizer {
    let table = platform_table(platform);
    let table = match extra {
        Some(extra) => table.with_extra_aliases(extra),
        None => table,
    };
    TableNormalizer::new(table)
}

#[derive(Debug, Clone)]
pub struct TableNormalizer {
    table: PlatformTable,
}

impl TableNormalizer {
    pub fn new(table: PlatformTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &PlatformTable {
        &self.table
    }
}

impl Normalizer for TableNormalizer {
    fn platform(&self) -> Platform {
        self.table.platform
    }

    fn normalize(&self, row: &Row) -> Result<Option<NormalizedProduct>> {
        let t = &self.table;

        let id = resolve(row, &t.id, "").trim();
        let title = resolve(row, &t.title, "").trim();
        if id.is_empty() || title.is_empty() {
            return Ok(None);
        }

        // 重量為零視為未填寫
        let weight = resolve_opt(row, &t.weight.aliases)
            .map(|raw| parse_decimal(raw) / t.weight.divisor)
            .filter(|w| *w > 0.0);

        Ok(Some(NormalizedProduct {
            id: id.to_string(),
            title: title.to_string(),
            description: resolve(row, &t.description, "").to_string(),
            price: parse_decimal(resolve(row, &t.price, "0")),
            currency: resolve(row, &t.currency, &t.default_currency)
                .trim()
                .to_string(),
            quantity: parse_integer(resolve(row, &t.quantity, "0")),
            images: collect_images(row, &t.images),
            category: resolve_opt(row, &t.category).map(|c| c.trim().to_string()),
            weight,
            weight_unit: Some(resolve_unit(row, &t.weight.unit)),
            dimensions: assemble_dimensions(row, &t.dimensions),
            dimension_unit: Some(resolve_unit(row, &t.dimensions.unit)),
        }))
    }
}

fn collect_images(row: &Row, rule: &ImageRule) -> Vec<String> {
    let mut images: Vec<String> = Vec::new();

    if let Some(joined) = resolve_opt(row, &rule.split) {
        images.extend(
            joined
                .split(|c: char| rule.separators.contains(&c))
                .map(str::trim)
                .filter(|url| !url.is_empty())
                .map(str::to_string),
        );
    }

    if let Some(numbered) = &rule.numbered {
        for n in 1..=numbered.max {
            let column = format!("{} {}", numbered.prefix, n);
            if let Some(url) = row.get(&column).map(|v| v.trim()) {
                if !url.is_empty() {
                    images.push(url.to_string());
                }
            }
        }
    }

    images
}

fn assemble_dimensions(row: &Row, rule: &DimensionRule) -> Option<String> {
    if let Some(combined) = resolve_opt(row, &rule.combined) {
        let combined = combined.trim();
        if combined.contains(['x', 'X'])
            && combined
                .split(['x', 'X'])
                .all(|part| parse_decimal(part) == 0.0)
        {
            return None;
        }
        return Some(combined.to_string());
    }
    if !rule.has_components() {
        return None;
    }

    let parts = [&rule.length, &rule.width, &rule.height]
        .map(|aliases| resolve(row, aliases, "0").trim());

    // 全部為零 (例如 "0x0x0") 視為沒有尺寸
    if parts.iter().all(|part| parse_decimal(part) == 0.0) {
        return None;
    }
    Some(parts.join("x"))
}

fn resolve_unit(row: &Row, rule: &UnitRule) -> String {
    if let Some(unit) = resolve_opt(row, &rule.aliases) {
        return unit.trim().to_string();
    }
    if let Some(english) = &rule.english_unit {
        let system = resolve(row, &rule.measurement_system, "");
        if system.trim().eq_ignore_ascii_case("english") {
            return english.clone();
        }
    }
    rule.default.clone()
}

static DECIMAL_PREFIX: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?").ok());
static INTEGER_PREFIX: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[+-]?\d+").ok());

/// Longest leading numeric prefix, `parseFloat` style.
fn numeric_prefix<'a>(s: &'a str, pattern: &LazyLock<Option<Regex>>) -> &'a str {
    pattern
        .as_ref()
        .and_then(|re| re.find(s))
        .map_or("", |m| m.as_str())
}

/// Tolerant decimal decode; anything unusable or negative is `0`.
pub fn parse_decimal(raw: &str) -> f64 {
    numeric_prefix(raw.trim(), &DECIMAL_PREFIX)
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
        .unwrap_or(0.0)
}

/// Tolerant integer decode, `parseInt` style; anything unusable or negative is `0`.
pub fn parse_integer(raw: &str) -> u64 {
    numeric_prefix(raw.trim(), &INTEGER_PREFIX)
        .parse::<i64>()
        .ok()
        .and_then(|v| u64::try_from(v).ok())
        .unwrap_or(0)
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::domain::model::Row;

    pub fn row(pairs: &[(&str, &str)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::row;
    use super::*;

    #[test]
    fn test_parse_decimal_is_tolerant() {
        assert_eq!(parse_decimal("19.99"), 19.99);
        assert_eq!(parse_decimal(" 19.99 USD"), 19.99);
        assert_eq!(parse_decimal(".5"), 0.5);
        assert_eq!(parse_decimal("5."), 5.0);
        assert_eq!(parse_decimal("1e3"), 1000.0);
        assert_eq!(parse_decimal("2e"), 2.0);
        assert_eq!(parse_decimal("N/A"), 0.0);
        assert_eq!(parse_decimal("$5"), 0.0);
        assert_eq!(parse_decimal(""), 0.0);
        assert_eq!(parse_decimal("-4.5"), 0.0);
        assert_eq!(parse_decimal("1e999"), 0.0);
        assert_eq!(parse_decimal("1,299.00"), 1.0);
    }

    #[test]
    fn test_parse_integer_is_tolerant() {
        assert_eq!(parse_integer("12"), 12);
        assert_eq!(parse_integer("12.7"), 12);
        assert_eq!(parse_integer("+3 units"), 3);
        assert_eq!(parse_integer("-3"), 0);
        assert_eq!(parse_integer("many"), 0);
        assert_eq!(parse_integer("99999999999999999999999"), 0);
    }

    #[test]
    fn test_rows_without_id_or_title_are_dropped() {
        for platform in Platform::ALL {
            let normalizer = normalizer_for(platform, None);
            assert_eq!(normalizer.normalize(&row(&[])).unwrap(), None);
            assert_eq!(
                normalizer
                    .normalize(&row(&[("Title", "  "), ("SKU", " ")]))
                    .unwrap(),
                None
            );
        }
    }

    #[test]
    fn test_row_with_id_but_blank_title_is_dropped() {
        let normalizer = normalizer_for(Platform::Ebay, None);
        assert_eq!(
            normalizer
                .normalize(&row(&[("SKU", "E-1"), ("Title", "")]))
                .unwrap(),
            None
        );
        assert_eq!(
            normalizer
                .normalize(&row(&[("SKU", ""), ("Title", "Lamp")]))
                .unwrap(),
            None
        );
    }

    #[test]
    fn test_dimensions_without_any_number_are_absent() {
        let normalizer = normalizer_for(Platform::Ebay, None);
        for (length, width, height) in [("N/A", "", ""), ("0.0", "0", "0")] {
            let product = normalizer
                .normalize(&row(&[
                    ("SKU", "E-1"),
                    ("Title", "Lamp"),
                    ("Length", length),
                    ("Width", width),
                    ("Height", height),
                ]))
                .unwrap()
                .unwrap();
            assert_eq!(product.dimensions, None);
        }
    }

    #[test]
    fn test_malformed_price_is_zero() {
        let normalizer = normalizer_for(Platform::Shopify, None);
        let product = normalizer
            .normalize(&row(&[
                ("Handle", "h"),
                ("Title", "t"),
                ("Variant Price", "N/A"),
                ("Variant Inventory Qty", "lots"),
            ]))
            .unwrap()
            .unwrap();

        assert_eq!(product.price, 0.0);
        assert_eq!(product.quantity, 0);
    }

    #[test]
    fn test_extra_aliases_reach_the_normalizer() {
        let mut extra = ExtraAliases::new();
        extra.insert(
            crate::domain::model::AliasField::Title,
            vec!["Product Name".to_string()],
        );
        let normalizer = normalizer_for(Platform::WooCommerce, Some(&extra));
        let product = normalizer
            .normalize(&row(&[("SKU", "s"), ("Product Name", "Renamed")]))
            .unwrap()
            .unwrap();

        assert_eq!(product.title, "Renamed");
        assert_eq!(normalizer.platform(), Platform::WooCommerce);
    }
}
