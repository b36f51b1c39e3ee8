//! User-selected filter and sort criteria.
//!
//! The wire shape is forgiving: every field is optional,
//! selectors accept `"all"` or an empty string to mean "no filter", price
//! bounds may arrive as numbers or numeric strings, and unknown sort keys
//! fall back to sorting by name. Parsing never fails on content.

use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize, Serializer};

use super::fuel::FuelType;

/// Sort order for query results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortKey {
    /// Case-insensitive by station name.
    #[default]
    Name,
    /// Mean price, cheapest first.
    PriceLow,
    /// Mean price, dearest first.
    PriceHigh,
    /// Distance from the user, nearest first.
    Distance,
    /// Most recently updated first.
    Updated,
}

impl SortKey {
    /// Parse a sort key, falling back to [`SortKey::Name`] for anything unknown.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "price-low" | "price-asc" | "price-ascending" | "price" | "cheapest" => {
                SortKey::PriceLow
            }
            "price-high" | "price-desc" | "price-descending" => SortKey::PriceHigh,
            "distance" | "nearest" => SortKey::Distance,
            "updated" | "recently-updated" | "last-updated" | "recent" => SortKey::Updated,
            _ => SortKey::Name,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Name => "name",
            SortKey::PriceLow => "price-low",
            SortKey::PriceHigh => "price-high",
            SortKey::Distance => "distance",
            SortKey::Updated => "updated",
        }
    }
}

/// Inclusive price range in cents per litre. Absent bounds are open.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PriceRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl PriceRange {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self {
            min: min.filter(|v| v.is_finite()),
            max: max.filter(|v| v.is_finite()),
        }
    }

    /// Parse bounds from free text; anything non-numeric is unbounded.
    pub fn parse(min: Option<&str>, max: Option<&str>) -> Self {
        Self::new(min.and_then(parse_bound), max.and_then(parse_bound))
    }

    /// Whether at least one bound is set.
    pub fn is_bounded(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }

    /// Whether `value` lies within the range.
    pub fn contains(&self, value: f64) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }
}

fn parse_bound(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Normalise a selector: `None` for "all"/empty, lowercase otherwise.
fn selector(raw: Option<&str>) -> Option<String> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Filter and sort criteria for a station query.
///
/// Built from the wire form via serde or from individual strings via
/// [`FilterSpec::from_parts`]. Selector fields hold `None` for "all".
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "FilterSpecWire", into = "FilterSpecWire")]
pub struct FilterSpec {
    /// Trimmed, lowercased search term; empty means no text filter.
    pub search: String,
    pub fuel_type: Option<FuelType>,
    /// Lowercased brand selector.
    pub brand: Option<String>,
    /// Lowercased region id.
    pub region: Option<String>,
    pub price_range: PriceRange,
    pub sort_by: SortKey,
}

impl FilterSpec {
    /// Build from raw string inputs as they arrive from a form or query string.
    pub fn from_parts(
        search: Option<&str>,
        fuel_type: Option<&str>,
        brand: Option<&str>,
        region: Option<&str>,
        price_range: PriceRange,
        sort_by: Option<&str>,
    ) -> Self {
        Self {
            search: search.map(|s| s.trim().to_lowercase()).unwrap_or_default(),
            fuel_type: selector(fuel_type).map(|f| FuelType::parse(&f)),
            brand: selector(brand),
            region: selector(region),
            price_range,
            sort_by: sort_by.map(SortKey::parse).unwrap_or_default(),
        }
    }

    pub fn with_search(mut self, search: &str) -> Self {
        self.search = search.trim().to_lowercase();
        self
    }

    pub fn with_fuel_type(mut self, fuel: FuelType) -> Self {
        self.fuel_type = Some(fuel);
        self
    }

    pub fn with_brand(mut self, brand: &str) -> Self {
        self.brand = selector(Some(brand));
        self
    }

    pub fn with_region(mut self, region: &str) -> Self {
        self.region = selector(Some(region));
        self
    }

    pub fn with_price_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.price_range = PriceRange::new(min, max);
        self
    }

    pub fn with_sort(mut self, sort_by: SortKey) -> Self {
        self.sort_by = sort_by;
        self
    }

    /// Whether no filter is active (sorting may still apply).
    pub fn is_unfiltered(&self) -> bool {
        self.search.is_empty()
            && self.fuel_type.is_none()
            && self.brand.is_none()
            && self.region.is_none()
            && !self.price_range.is_bounded()
    }
}

/// A price bound as it may appear on the wire.
#[derive(Clone, Deserialize)]
#[serde(untagged)]
enum WireBound {
    Number(f64),
    Text(String),
    Ignored(IgnoredAny),
}

impl WireBound {
    fn value(&self) -> Option<f64> {
        match self {
            WireBound::Number(v) => Some(*v).filter(|v| v.is_finite()),
            WireBound::Text(s) => parse_bound(s),
            WireBound::Ignored(_) => None,
        }
    }
}

impl Serialize for WireBound {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.value() {
            Some(v) => serializer.serialize_f64(v),
            None => serializer.serialize_none(),
        }
    }
}

#[derive(Clone, Default, Serialize, Deserialize)]
struct PriceRangeWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    min: Option<WireBound>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max: Option<WireBound>,
}

/// A selector or search term as it may appear on the wire.
///
/// Anything that is not a string reads as unset.
#[derive(Clone, Deserialize)]
#[serde(untagged)]
enum WireText {
    Text(String),
    Ignored(IgnoredAny),
}

impl WireText {
    fn as_str(&self) -> Option<&str> {
        match self {
            WireText::Text(s) => Some(s.as_str()),
            WireText::Ignored(_) => None,
        }
    }
}

impl Serialize for WireText {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.as_str() {
            Some(s) => serializer.serialize_str(s),
            None => serializer.serialize_none(),
        }
    }
}

fn wire_text(field: &Option<WireText>) -> Option<&str> {
    field.as_ref().and_then(WireText::as_str)
}

#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FilterSpecWire {
    #[serde(default)]
    search: Option<WireText>,
    #[serde(default)]
    fuel_type: Option<WireText>,
    #[serde(default)]
    brand: Option<WireText>,
    #[serde(default)]
    region: Option<WireText>,
    #[serde(default)]
    price_range: Option<PriceRangeWire>,
    #[serde(default)]
    sort_by: Option<WireText>,
}

impl From<FilterSpecWire> for FilterSpec {
    fn from(wire: FilterSpecWire) -> Self {
        let range = wire.price_range.unwrap_or_default();
        let price_range = PriceRange::new(
            range.min.as_ref().and_then(WireBound::value),
            range.max.as_ref().and_then(WireBound::value),
        );

        FilterSpec::from_parts(
            wire_text(&wire.search),
            wire_text(&wire.fuel_type),
            wire_text(&wire.brand),
            wire_text(&wire.region),
            price_range,
            wire_text(&wire.sort_by),
        )
    }
}

impl From<FilterSpec> for FilterSpecWire {
    fn from(filter: FilterSpec) -> Self {
        let selector = |value: Option<String>| {
            Some(WireText::Text(value.unwrap_or_else(|| "all".to_string())))
        };
        FilterSpecWire {
            search: Some(WireText::Text(filter.search)),
            fuel_type: selector(filter.fuel_type.map(|f| f.as_str().to_string())),
            brand: selector(filter.brand),
            region: selector(filter.region),
            price_range: Some(PriceRangeWire {
                min: filter.price_range.min.map(WireBound::Number),
                max: filter.price_range.max.map(WireBound::Number),
            }),
            sort_by: Some(WireText::Text(filter.sort_by.as_str().to_string())),
        }
    }
}
