//! Stable comparators for query results.

use std::cmp::Ordering;

use crate::domain::SortKey;

use super::engine::StationMatch;

/// Order two optional values with `None` after every `Some`.
fn defined_first(a: Option<f64>, b: Option<f64>, descending: bool) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => {
            let ord = x.total_cmp(&y);
            if descending { ord.reverse() } else { ord }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Sort matches in place by `key`.
///
/// Every order is stable: ties keep their prior relative order. Stations
/// with no mean price, no distance, or no update time go last.
pub fn sort_matches(matches: &mut [StationMatch<'_>], key: SortKey) {
    match key {
        SortKey::Name => matches.sort_by_cached_key(|m| m.station.name.to_lowercase()),
        SortKey::PriceLow => {
            matches.sort_by(|a, b| defined_first(a.prices.mean, b.prices.mean, false))
        }
        SortKey::PriceHigh => {
            matches.sort_by(|a, b| defined_first(a.prices.mean, b.prices.mean, true))
        }
        SortKey::Distance => {
            matches.sort_by(|a, b| defined_first(a.distance_km, b.distance_km, false))
        }
        SortKey::Updated => matches.sort_by(|a, b| {
            match (a.station.last_updated, b.station.last_updated) {
                (Some(x), Some(y)) => y.cmp(&x),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defined_values_before_undefined() {
        assert_eq!(defined_first(Some(1.0), None, false), Ordering::Less);
        assert_eq!(defined_first(Some(1.0), None, true), Ordering::Less);
        assert_eq!(defined_first(None, Some(1.0), true), Ordering::Greater);
        assert_eq!(defined_first(None, None, false), Ordering::Equal);
    }

    #[test]
    fn direction() {
        assert_eq!(defined_first(Some(1.0), Some(2.0), false), Ordering::Less);
        assert_eq!(defined_first(Some(1.0), Some(2.0), true), Ordering::Greater);
        assert_eq!(defined_first(Some(2.0), Some(2.0), true), Ordering::Equal);
    }
}
