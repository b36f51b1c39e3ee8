//! Mapping upstream station rows onto the canonical [`Station`] shape.
//!
//! Rows come from a spreadsheet-style database, so the same value can
//! appear under several column names (`lat`, `latitude`, `Latitude`),
//! numbers can arrive as strings, link-row and single-select columns wrap
//! their value in `{ "id": .., "value": .. }` objects, and fuel prices may
//! be an array, a JSON string holding an array, a map, or one column per
//! fuel. All of that is resolved here, once.
//!
//! Normalisation is permissive: a missing field becomes empty or `None`
//! and the station is kept. Only rows that are not JSON objects are dropped.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::{Map, Value};
use tracing::warn;

use crate::domain::{Coordinates, FuelPriceEntry, FuelType, Station};

const ID_KEYS: &[&str] = &["id", "ID", "Id", "station_id", "stationId", "Station ID"];
const NAME_KEYS: &[&str] = &["name", "Name", "station_name", "stationName", "Station Name", "title"];
const BRAND_KEYS: &[&str] = &["brand", "Brand", "brand_name", "brandName", "Brand Name"];
const ADDRESS_KEYS: &[&str] = &[
    "address",
    "Address",
    "street",
    "Street",
    "street_address",
    "streetAddress",
    "Street Address",
];
const SUBURB_KEYS: &[&str] = &["suburb", "Suburb", "city", "City", "locality", "Locality"];
const POSTCODE_KEYS: &[&str] = &[
    "postcode",
    "Postcode",
    "postalCode",
    "postal_code",
    "Postal Code",
    "zip",
];
const LAT_KEYS: &[&str] = &["lat", "latitude", "Latitude", "Lat", "LAT"];
const LNG_KEYS: &[&str] = &["lng", "lon", "long", "longitude", "Longitude", "Lng", "Lon", "LNG"];
const LOCATION_KEYS: &[&str] = &["location", "Location", "coordinates", "geo"];
const PRICES_KEYS: &[&str] = &["fuelPrices", "fuel_prices", "prices", "Prices", "Fuel Prices"];
const FUEL_TYPE_KEYS: &[&str] = &["fuelType", "fuel_type", "type", "fuel", "Fuel Type", "name"];
const PRICE_KEYS: &[&str] = &["price", "Price", "cents", "value", "amount"];
const UPDATED_KEYS: &[&str] = &[
    "lastUpdated",
    "last_updated",
    "updatedAt",
    "updated_at",
    "Last Updated",
    "updated",
];
const RATING_KEYS: &[&str] = &["rating", "Rating", "stars"];
const REVIEW_COUNT_KEYS: &[&str] = &[
    "reviewCount",
    "review_count",
    "reviews",
    "Reviews",
    "user_ratings_total",
];

/// First non-null value present under any of `keys`.
fn field<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .find(|v| !v.is_null())
}

/// Unwrap Baserow's `{id, value}` objects and single-element link arrays.
fn unwrap_cell(value: &Value) -> Option<&Value> {
    match value {
        Value::Null => None,
        Value::Array(items) => items.iter().find_map(unwrap_cell),
        Value::Object(obj) => field(obj, &["value", "name"]).and_then(unwrap_cell),
        other => Some(other),
    }
}

fn as_text(value: &Value) -> Option<String> {
    match unwrap_cell(value)? {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match unwrap_cell(value)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s
            .trim()
            .trim_start_matches('$')
            .trim_end_matches(|c: char| !c.is_ascii_digit() && c != '.')
            .parse()
            .ok(),
        _ => None,
    }
    .filter(|v: &f64| v.is_finite())
}

fn as_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match unwrap_cell(value)? {
        Value::String(s) => {
            let s = s.trim();
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(dt.with_timezone(&Utc));
            }
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
                return Some(Utc.from_utc_datetime(&naive));
            }
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|naive| Utc.from_utc_datetime(&naive))
        }
        Value::Number(n) => {
            let raw = n.as_i64()?;
            // Epoch milliseconds are 13 digits for any recent date
            if raw > 100_000_000_000 {
                DateTime::from_timestamp_millis(raw)
            } else {
                DateTime::from_timestamp(raw, 0)
            }
        }
        _ => None,
    }
}

fn text_field(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    field(obj, keys).and_then(as_text)
}

fn number_field(obj: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    field(obj, keys).and_then(as_number)
}

fn location(obj: &Map<String, Value>) -> Option<Coordinates> {
    let direct = Coordinates::from_parts(number_field(obj, LAT_KEYS), number_field(obj, LNG_KEYS));
    if direct.is_some() {
        return direct;
    }

    match field(obj, LOCATION_KEYS)? {
        Value::Object(nested) => {
            Coordinates::from_parts(number_field(nested, LAT_KEYS), number_field(nested, LNG_KEYS))
        }
        // GeoJSON order: [lng, lat]
        Value::Array(pair) if pair.len() == 2 => {
            Coordinates::from_parts(as_number(&pair[1]), as_number(&pair[0]))
        }
        _ => None,
    }
}

fn price_entry(value: &Value) -> Option<FuelPriceEntry> {
    let obj = value.as_object()?;
    let label = text_field(obj, FUEL_TYPE_KEYS)?;
    Some(FuelPriceEntry::new(
        FuelType::parse(&label),
        number_field(obj, PRICE_KEYS),
    ))
}

fn price_list(value: &Value) -> Vec<FuelPriceEntry> {
    match value {
        Value::Array(items) => items.iter().filter_map(price_entry).collect(),
        // { "unleaded": 185.9, "diesel": "176.8" }
        Value::Object(map) => map
            .iter()
            .map(|(label, price)| FuelPriceEntry::new(FuelType::parse(label), as_number(price)))
            .collect(),
        // Long-text columns holding serialised JSON
        Value::String(s) => serde_json::from_str::<Value>(s)
            .ok()
            .filter(|inner| inner.is_array() || inner.is_object())
            .map(|inner| price_list(&inner))
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

/// One column per fuel, e.g. `"Unleaded Price": "185.9"` or `"diesel": 176.8`.
fn price_columns(obj: &Map<String, Value>) -> Vec<FuelPriceEntry> {
    obj.iter()
        .filter_map(|(key, value)| {
            let lower = key.trim().to_lowercase();
            let label = lower
                .strip_suffix("price")
                .unwrap_or(&lower)
                .trim_end_matches([' ', '_']);
            match FuelType::parse(label) {
                FuelType::Other(_) => None,
                fuel => Some(FuelPriceEntry::new(fuel, as_number(value))),
            }
        })
        .collect()
}

/// Normalise one upstream row.
///
/// `index` is the row's position in the feed and seeds an id when the row
/// carries none. Returns `None` only when `record` is not an object.
pub fn normalize_record(record: &Value, index: usize) -> Option<Station> {
    let obj = record.as_object()?;

    let id = text_field(obj, ID_KEYS).unwrap_or_else(|| format!("row-{index}"));
    let mut station = Station::new(id, text_field(obj, NAME_KEYS).unwrap_or_default());

    station.brand = text_field(obj, BRAND_KEYS);
    station.address = text_field(obj, ADDRESS_KEYS).unwrap_or_default();
    station.suburb = text_field(obj, SUBURB_KEYS).unwrap_or_default();
    station.postcode = text_field(obj, POSTCODE_KEYS).unwrap_or_default();
    station.location = location(obj);

    station.fuel_prices = match field(obj, PRICES_KEYS) {
        Some(prices) => price_list(prices),
        None => price_columns(obj),
    };

    station.last_updated = field(obj, UPDATED_KEYS).and_then(as_timestamp);
    station.rating = number_field(obj, RATING_KEYS).filter(|r| (0.0..=5.0).contains(r));
    station.review_count = number_field(obj, REVIEW_COUNT_KEYS)
        .filter(|n| *n >= 0.0 && *n <= f64::from(u32::MAX))
        .map(|n| n as u32);

    Some(station)
}

/// Result of normalising a whole feed.
#[derive(Debug, Default)]
pub struct Normalized {
    pub stations: Vec<Station>,
    /// Rows that were not objects.
    pub dropped: usize,
}

/// Normalise every row, keeping order.
pub fn normalize_all(records: &[Value]) -> Normalized {
    let mut out = Normalized::default();

    for (index, record) in records.iter().enumerate() {
        match normalize_record(record, index) {
            Some(station) => out.stations.push(station),
            None => out.dropped += 1,
        }
    }

    if out.dropped > 0 {
        warn!(dropped = out.dropped, "skipped non-object station rows");
    }

    out
}
