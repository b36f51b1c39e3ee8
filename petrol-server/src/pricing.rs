//! Per-station and market-wide price aggregation.
//!
//! Only valid prices (finite and strictly positive) take part. A station with
//! no valid price has an undefined best and mean price; the query engine
//! excludes such stations from bounded price filters and sorts them last
//! under both price orders.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::{FuelPriceEntry, FuelType, Station};

/// Best and mean price for one station.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceSummary {
    /// Lowest valid price across all fuel types.
    pub best: Option<f64>,
    /// Arithmetic mean of all valid prices.
    pub mean: Option<f64>,
}

/// Compute the best and mean price over a station's entries.
pub fn summarize(entries: &[FuelPriceEntry]) -> PriceSummary {
    let mut best: Option<f64> = None;
    let mut total = 0.0;
    let mut count = 0usize;

    for price in entries.iter().filter_map(FuelPriceEntry::valid_price) {
        best = Some(best.map_or(price, |b| b.min(price)));
        total += price;
        count += 1;
    }

    PriceSummary {
        best,
        mean: (count > 0).then(|| total / count as f64),
    }
}

/// Lowest valid price for one fuel type.
pub fn price_for(entries: &[FuelPriceEntry], fuel: &FuelType) -> Option<f64> {
    entries
        .iter()
        .filter(|e| &e.fuel_type == fuel)
        .filter_map(FuelPriceEntry::valid_price)
        .reduce(f64::min)
}

/// Market statistics for one fuel type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelStats {
    pub fuel_type: FuelType,
    pub min: f64,
    pub mean: f64,
    pub max: f64,
    /// Number of stations with a valid price for this fuel.
    pub station_count: usize,
}

/// Per-fuel statistics over a set of stations.
///
/// Each station contributes at most one price per fuel (its lowest), so a
/// duplicated entry does not skew the mean. Known fuels come first in their
/// conventional order, then other labels alphabetically.
pub fn fuel_statistics(stations: &[Station]) -> Vec<FuelStats> {
    let mut prices: BTreeMap<FuelType, Vec<f64>> = BTreeMap::new();

    for station in stations {
        let mut seen: Vec<&FuelType> = Vec::new();
        for entry in &station.fuel_prices {
            if seen.contains(&&entry.fuel_type) {
                continue;
            }
            if let Some(price) = price_for(&station.fuel_prices, &entry.fuel_type) {
                prices.entry(entry.fuel_type.clone()).or_default().push(price);
            }
            seen.push(&entry.fuel_type);
        }
    }

    prices
        .into_iter()
        .map(|(fuel_type, values)| {
            let min = values.iter().copied().fold(f64::INFINITY, f64::min);
            let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let mean = values.iter().sum::<f64>() / values.len() as f64;
            FuelStats {
                fuel_type,
                min,
                mean,
                max,
                station_count: values.len(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(fuel: FuelType, price: Option<f64>) -> FuelPriceEntry {
        FuelPriceEntry::new(fuel, price)
    }

    fn station(id: &str, prices: Vec<FuelPriceEntry>) -> Station {
        let mut s = Station::new(id, format!("Station {id}"));
        s.fuel_prices = prices;
        s
    }

    #[test]
    fn summary_of_valid_prices() {
        let summary = summarize(&[
            entry(FuelType::Unleaded, Some(180.0)),
            entry(FuelType::Diesel, Some(190.0)),
            entry(FuelType::Premium98, Some(200.0)),
        ]);
        assert_eq!(summary.best, Some(180.0));
        assert_eq!(summary.mean, Some(190.0));
    }

    #[test]
    fn invalid_prices_are_excluded() {
        let summary = summarize(&[
            entry(FuelType::Unleaded, Some(0.0)),
            entry(FuelType::Diesel, Some(-1.0)),
            entry(FuelType::Lpg, None),
            entry(FuelType::Premium95, Some(195.5)),
        ]);
        assert_eq!(summary.best, Some(195.5));
        assert_eq!(summary.mean, Some(195.5));
    }

    #[test]
    fn no_valid_prices_is_undefined() {
        assert_eq!(summarize(&[]), PriceSummary::default());
        let summary = summarize(&[entry(FuelType::Unleaded, Some(0.0))]);
        assert_eq!(summary.best, None);
        assert_eq!(summary.mean, None);
    }

    #[test]
    fn price_for_picks_lowest_valid() {
        let entries = [
            entry(FuelType::Diesel, Some(190.0)),
            entry(FuelType::Diesel, Some(185.0)),
            entry(FuelType::Diesel, Some(0.0)),
            entry(FuelType::Unleaded, Some(170.0)),
        ];
        assert_eq!(price_for(&entries, &FuelType::Diesel), Some(185.0));
        assert_eq!(price_for(&entries, &FuelType::Lpg), None);
    }

    #[test]
    fn statistics_per_fuel() {
        let stations = vec![
            station(
                "1",
                vec![
                    entry(FuelType::Unleaded, Some(180.0)),
                    entry(FuelType::Diesel, Some(190.0)),
                ],
            ),
            station(
                "2",
                vec![
                    entry(FuelType::Unleaded, Some(170.0)),
                    entry(FuelType::Unleaded, Some(175.0)),
                ],
            ),
            station("3", vec![entry(FuelType::Diesel, Some(0.0))]),
        ];

        let stats = fuel_statistics(&stations);
        assert_eq!(stats.len(), 2);

        assert_eq!(stats[0].fuel_type, FuelType::Unleaded);
        assert_eq!(stats[0].station_count, 2);
        assert_eq!(stats[0].min, 170.0);
        assert_eq!(stats[0].max, 180.0);
        assert_eq!(stats[0].mean, 175.0);

        assert_eq!(stats[1].fuel_type, FuelType::Diesel);
        assert_eq!(stats[1].station_count, 1);
    }

    #[test]
    fn statistics_order_known_before_other() {
        let stations = vec![station(
            "1",
            vec![
                entry(FuelType::Other("e85".into()), Some(160.0)),
                entry(FuelType::Lpg, Some(110.0)),
                entry(FuelType::Unleaded, Some(180.0)),
            ],
        )];
        let order: Vec<FuelType> = fuel_statistics(&stations)
            .into_iter()
            .map(|s| s.fuel_type)
            .collect();
        assert_eq!(
            order,
            vec![FuelType::Unleaded, FuelType::Lpg, FuelType::Other("e85".into())]
        );
    }
}
