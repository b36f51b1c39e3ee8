//! The filter/sort/paginate pipeline.

use tracing::{debug, trace};

use crate::domain::{Coordinates, FilterSpec, SortKey, Station};
use crate::geo::haversine_km;
use crate::pricing::{PriceSummary, summarize};
use crate::regions::{Region, RegionClassifier};

use super::page::{DEFAULT_PAGE_SIZE, Pagination, paginate};
use super::sort::sort_matches;

/// A station together with the values derived from it for this query.
///
/// The station itself is borrowed unchanged from the input.
#[derive(Debug, Clone)]
pub struct StationMatch<'a> {
    pub station: &'a Station,
    pub region: &'a Region,
    pub prices: PriceSummary,
    /// Distance from the user, when both locations are known.
    pub distance_km: Option<f64>,
}

/// Everything a query needs besides the station list.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRequest {
    pub filter: FilterSpec,
    pub user_location: Option<Coordinates>,
    /// 1-based; clamped into range.
    pub page: usize,
    pub page_size: usize,
}

impl QueryRequest {
    pub fn new(filter: FilterSpec) -> Self {
        Self {
            filter,
            user_location: None,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_user_location(mut self, location: Option<Coordinates>) -> Self {
        self.user_location = location;
        self
    }
}

/// One page of query results.
#[derive(Debug, Clone)]
pub struct QueryPage<'a> {
    pub matches: Vec<StationMatch<'a>>,
    pub pagination: Pagination,
}

impl<'a> QueryPage<'a> {
    /// The stations on this page, in order.
    pub fn stations(&self) -> impl Iterator<Item = &'a Station> + '_ {
        self.matches.iter().map(|m| m.station)
    }
}

/// Runs station queries against a region table.
#[derive(Debug, Clone, Copy)]
pub struct QueryEngine<'c> {
    classifier: &'c RegionClassifier,
}

impl<'c> QueryEngine<'c> {
    pub fn new(classifier: &'c RegionClassifier) -> Self {
        Self { classifier }
    }

    /// Derive region, prices and distance for one station.
    pub fn annotate<'s>(&self, station: &'s Station, origin: Option<&Coordinates>) -> StationMatch<'s>
    where
        'c: 's,
    {
        let distance_km = match (origin, station.location.as_ref()) {
            (Some(from), Some(to)) => Some(haversine_km(from, to)),
            _ => None,
        };

        let classifier: &'c RegionClassifier = self.classifier;
        StationMatch {
            station,
            region: classifier.classify_station(station),
            prices: summarize(&station.fuel_prices),
            distance_km,
        }
    }

    /// Run the filter stages and the sort, without paginating.
    pub fn filter_and_sort<'s>(
        &self,
        stations: &'s [Station],
        filter: &FilterSpec,
        origin: Option<&Coordinates>,
    ) -> Vec<StationMatch<'s>>
    where
        'c: 's,
    {
        let mut matches: Vec<StationMatch<'s>> =
            stations.iter().map(|s| self.annotate(s, origin)).collect();

        if let Some(region) = &filter.region {
            matches.retain(|m| &m.region.id == region);
            trace!(region = %region, remaining = matches.len(), "region filter");
        }

        if !filter.search.is_empty() {
            matches.retain(|m| matches_search(m.station, &filter.search));
            trace!(search = %filter.search, remaining = matches.len(), "text search");
        }

        if let Some(fuel) = &filter.fuel_type {
            matches.retain(|m| m.station.fuel_prices.iter().any(|e| &e.fuel_type == fuel));
            trace!(fuel = %fuel, remaining = matches.len(), "fuel filter");
        }

        if let Some(brand) = &filter.brand {
            matches.retain(|m| {
                m.station
                    .brand
                    .as_ref()
                    .is_some_and(|b| b.to_lowercase().contains(brand.as_str()))
            });
            trace!(brand = %brand, remaining = matches.len(), "brand filter");
        }

        let range = filter.price_range;
        if range.is_bounded() {
            matches.retain(|m| m.prices.mean.is_some_and(|mean| range.contains(mean)));
            trace!(
                min = ?range.min,
                max = ?range.max,
                remaining = matches.len(),
                "price filter"
            );
        }

        sort_matches(&mut matches, effective_sort(filter.sort_by, origin.is_some()));
        matches
    }

    /// Run the full pipeline and return the requested page.
    pub fn query<'s>(&self, stations: &'s [Station], request: &QueryRequest) -> QueryPage<'s>
    where
        'c: 's,
    {
        let matches =
            self.filter_and_sort(stations, &request.filter, request.user_location.as_ref());
        let (matches, pagination) = paginate(matches, request.page, request.page_size);

        debug!(
            input = stations.len(),
            matched = pagination.total_count,
            page = pagination.current_page,
            pages = pagination.total_pages,
            sort = request.filter.sort_by.as_str(),
            "station query"
        );

        QueryPage {
            matches,
            pagination,
        }
    }
}

/// Distance ordering needs an origin; without one, fall back to name order.
fn effective_sort(requested: SortKey, has_origin: bool) -> SortKey {
    match requested {
        SortKey::Distance if !has_origin => SortKey::Name,
        other => other,
    }
}

/// Case-insensitive substring match over the searchable fields.
///
/// `term` must already be lowercased.
fn matches_search(station: &Station, term: &str) -> bool {
    [
        station.name.as_str(),
        station.address.as_str(),
        station.suburb.as_str(),
        station.brand_or_empty(),
        station.postcode.as_str(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(term))
}
