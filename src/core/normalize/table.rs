use crate::domain::model::{AliasField, ExtraAliases, Platform};

pub(crate) fn aliases(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

/// Numbered columns such as `Picture URL 1` .. `Picture URL 12`.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberedColumns {
    pub prefix: String,
    pub max: usize,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ImageRule {
    /// Columns holding several URLs joined by one of `separators`.
    pub split: Vec<String>,
    pub separators: Vec<char>,
    pub numbered: Option<NumberedColumns>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnitRule {
    pub aliases: Vec<String>,
    pub default: String,
    /// Measurement-system columns; the value `English` selects `english_unit`.
    pub measurement_system: Vec<String>,
    pub english_unit: Option<String>,
}

impl UnitRule {
    pub fn fixed(unit: &str) -> Self {
        Self {
            aliases: Vec::new(),
            default: unit.to_string(),
            measurement_system: Vec::new(),
            english_unit: None,
        }
    }

    pub fn aliased(names: &[&str], default: &str) -> Self {
        Self {
            aliases: aliases(names),
            ..Self::fixed(default)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeightRule {
    pub aliases: Vec<String>,
    /// Source value is divided by this (grams -> kg is 1000).
    pub divisor: f64,
    pub unit: UnitRule,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DimensionRule {
    /// Columns already holding a complete dimension string.
    pub combined: Vec<String>,
    pub length: Vec<String>,
    pub width: Vec<String>,
    pub height: Vec<String>,
    pub unit: UnitRule,
}

impl DimensionRule {
    /// For platforms that never export dimensions.
    pub fn none(unit: &str) -> Self {
        Self {
            combined: Vec::new(),
            length: Vec::new(),
            width: Vec::new(),
            height: Vec::new(),
            unit: UnitRule::fixed(unit),
        }
    }

    pub fn has_components(&self) -> bool {
        !(self.length.is_empty() && self.width.is_empty() && self.height.is_empty())
    }
}

/// Column layout of one platform's product export.
#[derive(Debug, Clone, PartialEq)]
pub struct PlatformTable {
    pub platform: Platform,
    pub id: Vec<String>,
    pub title: Vec<String>,
    pub description: Vec<String>,
    pub price: Vec<String>,
    pub currency: Vec<String>,
    pub default_currency: String,
    pub quantity: Vec<String>,
    pub images: ImageRule,
    pub category: Vec<String>,
    pub weight: WeightRule,
    pub dimensions: DimensionRule,
}

impl PlatformTable {
    /// Appends configured aliases after the built-in chain of each field.
    pub fn with_extra_aliases(mut self, extra: &ExtraAliases) -> Self {
        for (field, names) in extra {
            let chain = match field {
                AliasField::Id => &mut self.id,
                AliasField::Title => &mut self.title,
                AliasField::Description => &mut self.description,
                AliasField::Price => &mut self.price,
                AliasField::Currency => &mut self.currency,
                AliasField::Quantity => &mut self.quantity,
                AliasField::Images => &mut self.images.split,
                AliasField::Category => &mut self.category,
                AliasField::Weight => &mut self.weight.aliases,
                AliasField::Dimensions => &mut self.dimensions.combined,
            };
            for name in names {
                if !chain.contains(name) {
                    chain.push(name.clone());
                }
            }
        }

        if extra.contains_key(&AliasField::Images) && self.images.separators.is_empty() {
            self.images.separators = vec![','];
        }
        self
    }
}
