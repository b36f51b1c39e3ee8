//! Station and location types.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::fuel::FuelPriceEntry;

/// Error returned when a latitude/longitude pair is not a usable location.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid coordinates: {reason}")]
pub struct InvalidCoordinates {
    reason: &'static str,
}

/// A valid WGS84 latitude/longitude pair.
///
/// Upstream data uses `0` as a placeholder for "unknown", so a zero in
/// either component is rejected along with non-finite and out-of-range
/// values. Any `Coordinates` value can be placed on a map.
///
/// # Examples
///
/// ```
/// use petrol_server::domain::Coordinates;
///
/// let cbd = Coordinates::new(-37.8136, 144.9631).unwrap();
/// assert_eq!(cbd.latitude(), -37.8136);
///
/// // Zero is the upstream "no location" placeholder
/// assert!(Coordinates::new(0.0, 0.0).is_err());
///
/// // Out of range is rejected
/// assert!(Coordinates::new(-91.0, 144.0).is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinates", into = "RawCoordinates")]
pub struct Coordinates {
    lat: f64,
    lng: f64,
}

impl Coordinates {
    /// Validate and build a coordinate pair.
    pub fn new(lat: f64, lng: f64) -> Result<Self, InvalidCoordinates> {
        if !lat.is_finite() || !lng.is_finite() {
            return Err(InvalidCoordinates {
                reason: "must be finite numbers",
            });
        }

        if lat == 0.0 || lng == 0.0 {
            return Err(InvalidCoordinates {
                reason: "zero is not a location",
            });
        }

        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            return Err(InvalidCoordinates {
                reason: "latitude must be within ±90 and longitude within ±180",
            });
        }

        Ok(Self { lat, lng })
    }

    /// Build from optional components, discarding anything invalid.
    pub fn from_parts(lat: Option<f64>, lng: Option<f64>) -> Option<Self> {
        Self::new(lat?, lng?).ok()
    }

    pub fn latitude(&self) -> f64 {
        self.lat
    }

    pub fn longitude(&self) -> f64 {
        self.lng
    }
}

impl fmt::Debug for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coordinates({}, {})", self.lat, self.lng)
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5}, {:.5}", self.lat, self.lng)
    }
}

/// Wire form of [`Coordinates`].
#[derive(Clone, Copy, Serialize, Deserialize)]
struct RawCoordinates {
    lat: f64,
    lng: f64,
}

impl TryFrom<RawCoordinates> for Coordinates {
    type Error = InvalidCoordinates;

    fn try_from(raw: RawCoordinates) -> Result<Self, Self::Error> {
        Coordinates::new(raw.lat, raw.lng)
    }
}

impl From<Coordinates> for RawCoordinates {
    fn from(c: Coordinates) -> Self {
        RawCoordinates {
            lat: c.lat,
            lng: c.lng,
        }
    }
}

/// A petrol station in canonical form.
///
/// Produced once at the feed boundary by `feed::normalize_record`; the
/// query engine never looks at upstream field names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub suburb: String,
    #[serde(default)]
    pub postcode: String,
    #[serde(default)]
    pub location: Option<Coordinates>,
    #[serde(default)]
    pub fuel_prices: Vec<FuelPriceEntry>,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub review_count: Option<u32>,
}

impl Station {
    /// Create a station with only an id and name; everything else empty.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            brand: None,
            address: String::new(),
            suburb: String::new(),
            postcode: String::new(),
            location: None,
            fuel_prices: Vec::new(),
            last_updated: None,
            rating: None,
            review_count: None,
        }
    }

    /// Whether the station can be placed on a map.
    pub fn has_location(&self) -> bool {
        self.location.is_some()
    }

    /// Brand, or an empty string when unknown.
    pub fn brand_or_empty(&self) -> &str {
        self.brand.as_deref().unwrap_or("")
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Every in-range non-zero pair is accepted and round-trips
        #[test]
        fn valid_range_accepted(
            lat in (-90.0f64..90.0).prop_filter("non-zero", |v| *v != 0.0),
            lng in (-180.0f64..180.0).prop_filter("non-zero", |v| *v != 0.0),
        ) {
            let c = Coordinates::new(lat, lng).unwrap();
            prop_assert_eq!(c.latitude(), lat);
            prop_assert_eq!(c.longitude(), lng);
        }

        /// Latitudes beyond the poles are always rejected
        #[test]
        fn polar_overflow_rejected(lat in 90.0001f64..1000.0, lng in -180.0f64..180.0) {
            prop_assert!(Coordinates::new(lat, lng).is_err());
            prop_assert!(Coordinates::new(-lat, lng).is_err());
        }
    }
}
