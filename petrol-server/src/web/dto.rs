//! Data transfer objects for web requests and responses.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Coordinates, FilterSpec, FuelPriceEntry, PriceRange};
use crate::pricing::FuelStats;
use crate::query::{Pagination, QueryPage, StationMatch};
use crate::regions::Region;

/// Query string for `GET /api/stations` and the index page.
///
/// Every field is a raw string so that junk input degrades to "no filter"
/// instead of a rejected request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationsQuery {
    pub search: Option<String>,
    pub fuel_type: Option<String>,
    pub brand: Option<String>,
    pub region: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub sort_by: Option<String>,
    pub page: Option<String>,
    pub lat: Option<String>,
    pub lng: Option<String>,
}

impl StationsQuery {
    pub fn filter(&self) -> FilterSpec {
        FilterSpec::from_parts(
            self.search.as_deref(),
            self.fuel_type.as_deref(),
            self.brand.as_deref(),
            self.region.as_deref(),
            PriceRange::parse(self.min_price.as_deref(), self.max_price.as_deref()),
            self.sort_by.as_deref(),
        )
    }

    /// Requested page; anything unparsable is page 1.
    pub fn page(&self) -> usize {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(1)
    }

    /// The user's location, if both halves were supplied.
    ///
    /// Returns an error message when the pair is incomplete or invalid.
    pub fn user_location(&self) -> Result<Option<Coordinates>, String> {
        let lat = self.lat.as_deref().map(str::trim).filter(|s| !s.is_empty());
        let lng = self.lng.as_deref().map(str::trim).filter(|s| !s.is_empty());

        match (lat, lng) {
            (None, None) => Ok(None),
            (Some(lat), Some(lng)) => {
                let lat: f64 = lat.parse().map_err(|_| format!("invalid lat: {lat}"))?;
                let lng: f64 = lng.parse().map_err(|_| format!("invalid lng: {lng}"))?;
                Coordinates::new(lat, lng)
                    .map(Some)
                    .map_err(|e| e.to_string())
            }
            _ => Err("lat and lng must be given together".to_string()),
        }
    }
}

/// Body of `POST /api/stations/query`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryBody {
    #[serde(default)]
    pub filter: FilterSpec,
    #[serde(default)]
    pub page: Option<usize>,
    #[serde(default)]
    pub user_location: Option<Coordinates>,
}

/// The region a station was classified into.
#[derive(Debug, Clone, Serialize)]
pub struct RegionRef {
    pub id: String,
    pub name: String,
    pub color: String,
}

impl From<&Region> for RegionRef {
    fn from(region: &Region) -> Self {
        Self {
            id: region.id.clone(),
            name: region.name.clone(),
            color: region.color.clone(),
        }
    }
}

/// A station with its derived values.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StationView {
    pub id: String,
    pub name: String,
    pub brand: Option<String>,
    pub address: String,
    pub suburb: String,
    pub postcode: String,
    pub location: Option<Coordinates>,
    pub fuel_prices: Vec<FuelPriceEntry>,
    pub last_updated: Option<DateTime<Utc>>,
    pub rating: Option<f64>,
    pub review_count: Option<u32>,
    pub region: RegionRef,
    pub best_price: Option<f64>,
    pub average_price: Option<f64>,
    pub distance_km: Option<f64>,
}

impl StationView {
    pub fn from_match(m: &StationMatch<'_>) -> Self {
        let s = m.station;
        Self {
            id: s.id.clone(),
            name: s.name.clone(),
            brand: s.brand.clone(),
            address: s.address.clone(),
            suburb: s.suburb.clone(),
            postcode: s.postcode.clone(),
            location: s.location,
            fuel_prices: s.fuel_prices.clone(),
            last_updated: s.last_updated,
            rating: s.rating,
            review_count: s.review_count,
            region: RegionRef::from(m.region),
            best_price: m.prices.best,
            average_price: m.prices.mean,
            distance_km: m.distance_km,
        }
    }
}

/// One page of station results.
#[derive(Debug, Clone, Serialize)]
pub struct StationsResponse {
    pub stations: Vec<StationView>,
    pub pagination: Pagination,
    /// The filter as understood by the server.
    pub filter: FilterSpec,
}

impl StationsResponse {
    pub fn from_page(page: &QueryPage<'_>, filter: &FilterSpec) -> Self {
        Self {
            stations: page.matches.iter().map(StationView::from_match).collect(),
            pagination: page.pagination,
            filter: filter.clone(),
        }
    }
}

/// A region with the number of stations it currently holds.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub color: String,
    pub station_count: usize,
}

#[derive(Debug, Serialize)]
pub struct RegionsResponse {
    pub regions: Vec<RegionSummary>,
}

#[derive(Debug, Serialize)]
pub struct BrandsResponse {
    pub brands: Vec<String>,
}

/// Market-wide statistics.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub station_count: usize,
    /// Stations with at least one valid price.
    pub priced_station_count: usize,
    pub fuels: Vec<FuelStats>,
    pub generation: u64,
    pub loaded_at: DateTime<Utc>,
    /// Approximate number of query pages in the response cache.
    pub cached_pages: u64,
}

/// Body of `PUT /api/preferences/{key}`.
#[derive(Debug, Deserialize)]
pub struct PreferenceBody {
    pub value: String,
}

#[derive(Debug, Serialize)]
pub struct PreferenceResponse {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Serialize)]
pub struct PreferencesResponse {
    pub preferences: BTreeMap<String, String>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FuelType, SortKey};

    fn query(pairs: &[(&str, &str)]) -> StationsQuery {
        let object: serde_json::Map<String, serde_json::Value> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), serde_json::Value::String(v.to_string())))
            .collect();
        serde_json::from_value(serde_json::Value::Object(object)).unwrap()
    }

    #[test]
    fn filter_from_query_string() {
        let q = query(&[
            ("search", " Shell "),
            ("fuelType", "diesel"),
            ("brand", "all"),
            ("region", "CBD"),
            ("minPrice", "150"),
            ("maxPrice", "abc"),
            ("sortBy", "price-low"),
        ]);
        let filter = q.filter();

        assert_eq!(filter.search, "shell");
        assert_eq!(filter.fuel_type, Some(FuelType::Diesel));
        assert_eq!(filter.brand, None);
        assert_eq!(filter.region.as_deref(), Some("cbd"));
        assert_eq!(filter.price_range, PriceRange::new(Some(150.0), None));
        assert_eq!(filter.sort_by, SortKey::PriceLow);
    }

    #[test]
    fn page_parsing_is_lenient() {
        assert_eq!(query(&[]).page(), 1);
        assert_eq!(query(&[("page", "3")]).page(), 3);
        assert_eq!(query(&[("page", "-2")]).page(), 1);
        assert_eq!(query(&[("page", "two")]).page(), 1);
    }

    #[test]
    fn user_location_pairs() {
        assert_eq!(query(&[]).user_location(), Ok(None));
        assert_eq!(
            query(&[("lat", "-37.81"), ("lng", "144.96")]).user_location(),
            Ok(Coordinates::new(-37.81, 144.96).ok())
        );
        assert!(query(&[("lat", "-37.81")]).user_location().is_err());
        assert!(query(&[("lat", "x"), ("lng", "144.96")]).user_location().is_err());
        assert!(query(&[("lat", "0"), ("lng", "0")]).user_location().is_err());
    }

    #[test]
    fn query_body_defaults() {
        let body: QueryBody = serde_json::from_str("{}").unwrap();
        assert_eq!(body.filter, FilterSpec::default());
        assert_eq!(body.page, None);
        assert!(body.user_location.is_none());

        let body: QueryBody = serde_json::from_str(
            r#"{"filter": {"fuelType": "lpg"}, "page": 2, "userLocation": {"lat": -37.8, "lng": 144.9}}"#,
        )
        .unwrap();
        assert_eq!(body.filter.fuel_type, Some(FuelType::Lpg));
        assert_eq!(body.page, Some(2));
        assert!(body.user_location.is_some());
    }
}
