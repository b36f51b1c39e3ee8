//! Fuel types and per-station price entries.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A fuel grade sold at a station.
///
/// The set is open: upstream feeds occasionally carry grades we have no
/// name for, which are kept verbatim as [`FuelType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FuelType {
    Unleaded,
    Premium95,
    Premium98,
    Diesel,
    Lpg,
    Other(String),
}

impl FuelType {
    /// The conventional grades, in display order.
    pub const KNOWN: [FuelType; 5] = [
        FuelType::Unleaded,
        FuelType::Premium95,
        FuelType::Premium98,
        FuelType::Diesel,
        FuelType::Lpg,
    ];

    /// Parse a fuel label, accepting the aliases used by Australian feeds.
    ///
    /// Matching ignores case, whitespace, hyphens and underscores. Anything
    /// unrecognised becomes `Other` with the trimmed, lowercased label.
    ///
    /// # Examples
    ///
    /// ```
    /// use petrol_server::domain::FuelType;
    ///
    /// assert_eq!(FuelType::parse("ULP"), FuelType::Unleaded);
    /// assert_eq!(FuelType::parse("Premium 98"), FuelType::Premium98);
    /// assert_eq!(FuelType::parse("autogas"), FuelType::Lpg);
    /// assert_eq!(FuelType::parse("E85"), FuelType::Other("e85".to_string()));
    /// ```
    pub fn parse(label: &str) -> Self {
        let key: String = label
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();

        match key.as_str() {
            "unleaded" | "ulp" | "u91" | "unleaded91" | "regular" | "e10" => FuelType::Unleaded,
            "premium95" | "p95" | "u95" | "pulp" | "premium" | "premiumunleaded" => {
                FuelType::Premium95
            }
            "premium98" | "p98" | "u98" | "ultimate98" => FuelType::Premium98,
            "diesel" | "dsl" | "premiumdiesel" => FuelType::Diesel,
            "lpg" | "autogas" => FuelType::Lpg,
            _ => FuelType::Other(label.trim().to_lowercase()),
        }
    }

    /// Canonical wire label.
    pub fn as_str(&self) -> &str {
        match self {
            FuelType::Unleaded => "unleaded",
            FuelType::Premium95 => "premium95",
            FuelType::Premium98 => "premium98",
            FuelType::Diesel => "diesel",
            FuelType::Lpg => "lpg",
            FuelType::Other(label) => label,
        }
    }

    /// Human-readable label for cards and tables.
    pub fn display_name(&self) -> &str {
        match self {
            FuelType::Unleaded => "Unleaded 91",
            FuelType::Premium95 => "Premium 95",
            FuelType::Premium98 => "Premium 98",
            FuelType::Diesel => "Diesel",
            FuelType::Lpg => "LPG",
            FuelType::Other(label) => label,
        }
    }
}

impl fmt::Display for FuelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FuelType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FuelType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(FuelType::parse(&label))
    }
}

/// One fuel grade's price at a station, in cents per litre.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelPriceEntry {
    pub fuel_type: FuelType,
    #[serde(default)]
    pub price: Option<f64>,
}

impl FuelPriceEntry {
    pub fn new(fuel_type: FuelType, price: Option<f64>) -> Self {
        Self { fuel_type, price }
    }

    /// The price if it is usable data: finite and strictly positive.
    pub fn valid_price(&self) -> Option<f64> {
        self.price.filter(|p| p.is_finite() && *p > 0.0)
    }
}
