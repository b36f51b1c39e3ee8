//! Askama templates for the web frontend.

use std::collections::BTreeMap;

use askama::Template;
use chrono::{DateTime, Utc};

use crate::domain::{FuelType, SortKey};
use crate::query::Pagination;

use super::dto::{RegionSummary, StationView};

// ============================================================================
// Page Templates (extend base.html)
// ============================================================================

/// Home page: filter form plus the first page of results.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub theme: String,
    pub search: String,
    pub min_price: String,
    pub max_price: String,
    pub fuels: Vec<SelectOption>,
    pub brands: Vec<SelectOption>,
    pub regions: Vec<SelectOption>,
    pub sorts: Vec<SelectOption>,
    pub stations: Vec<StationCardView>,
    pub pagination: PaginationView,
}

/// About page.
#[derive(Template)]
#[template(path = "about.html")]
pub struct AboutTemplate {
    pub theme: String,
    pub regions: Vec<RegionSummary>,
}

/// Error page.
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub theme: String,
    pub title: String,
    pub message: String,
}

// ============================================================================
// Fragment Templates (AJAX responses, no base.html)
// ============================================================================

/// Station list fragment (filter results).
#[derive(Template)]
#[template(path = "station_list.html")]
pub struct StationListTemplate {
    pub stations: Vec<StationCardView>,
    pub pagination: PaginationView,
}

// ============================================================================
// View Models (for templates)
// ============================================================================

/// An `<option>` in one of the filter selects.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

impl SelectOption {
    fn new(value: impl Into<String>, label: impl Into<String>, selected: bool) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            selected,
        }
    }
}

/// The known fuels, with `selected` marking the active filter.
pub fn fuel_options(selected: Option<&FuelType>) -> Vec<SelectOption> {
    FuelType::KNOWN
        .iter()
        .map(|fuel| {
            SelectOption::new(fuel.as_str(), fuel.display_name(), selected == Some(fuel))
        })
        .collect()
}

pub fn sort_options(selected: SortKey) -> Vec<SelectOption> {
    [
        (SortKey::Name, "Name"),
        (SortKey::PriceLow, "Price: low to high"),
        (SortKey::PriceHigh, "Price: high to low"),
        (SortKey::Distance, "Nearest first"),
        (SortKey::Updated, "Recently updated"),
    ]
    .into_iter()
    .map(|(key, label)| SelectOption::new(key.as_str(), label, key == selected))
    .collect()
}

/// Brand options; `selected` is the lowercased brand filter.
pub fn brand_options(brands: &[String], selected: Option<&str>) -> Vec<SelectOption> {
    brands
        .iter()
        .map(|b| {
            let is_selected = selected == Some(b.to_lowercase().as_str());
            SelectOption::new(b.as_str(), b.as_str(), is_selected)
        })
        .collect()
}

pub fn region_options(regions: &[RegionSummary], selected: Option<&str>) -> Vec<SelectOption> {
    regions
        .iter()
        .map(|r| {
            SelectOption::new(
                r.id.as_str(),
                format!("{} ({})", r.name, r.station_count),
                selected == Some(r.id.as_str()),
            )
        })
        .collect()
}

/// One fuel price line on a station card.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceView {
    pub label: String,
    pub price: String,
    pub is_best: bool,
}

/// Station card view model.
#[derive(Debug, Clone)]
pub struct StationCardView {
    pub id: String,
    pub name: String,
    pub brand: String,
    pub logo_url: Option<String>,
    pub address_line: String,
    pub region_name: String,
    pub region_color: String,
    pub prices: Vec<PriceView>,
    pub best_price: Option<String>,
    pub distance: Option<String>,
    pub updated: Option<String>,
    pub rating: Option<String>,
}

impl StationCardView {
    /// Build a card, looking up `brand-logo:<brand>` overrides in `prefs`.
    pub fn from_view(view: &StationView, prefs: &BTreeMap<String, String>) -> Self {
        let brand = view.brand.clone().unwrap_or_default();
        let logo_url = (!brand.is_empty())
            .then(|| prefs.get(&format!("brand-logo:{}", brand.to_lowercase())))
            .flatten()
            .cloned();

        let address_line = [view.address.as_str(), view.suburb.as_str(), view.postcode.as_str()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ");

        let prices = view
            .fuel_prices
            .iter()
            .map(|entry| {
                let valid = entry.valid_price();
                PriceView {
                    label: entry.fuel_type.display_name().to_string(),
                    price: valid.map(format_price).unwrap_or_else(|| "n/a".to_string()),
                    is_best: valid.is_some() && valid == view.best_price,
                }
            })
            .collect();

        let rating = view.rating.map(|r| match view.review_count {
            Some(n) => format!("{r:.1} ({n})"),
            None => format!("{r:.1}"),
        });

        Self {
            id: view.id.clone(),
            name: view.name.clone(),
            brand,
            logo_url,
            address_line,
            region_name: view.region.name.clone(),
            region_color: view.region.color.clone(),
            prices,
            best_price: view.best_price.map(format_price),
            distance: view.distance_km.map(format_distance),
            updated: view.last_updated.map(format_updated),
            rating,
        }
    }
}

/// Pager state for the station list.
#[derive(Debug, Clone, PartialEq)]
pub struct PaginationView {
    pub current: usize,
    pub total_pages: usize,
    pub total_count: usize,
    pub previous: Option<usize>,
    pub next: Option<usize>,
    /// Page links to show, at most two either side of the current page.
    pub pages: Vec<PageLink>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLink {
    pub number: usize,
    pub is_current: bool,
}

impl From<&Pagination> for PaginationView {
    fn from(p: &Pagination) -> Self {
        let first = p.current_page.saturating_sub(2).max(1);
        let last = (p.current_page + 2).min(p.total_pages);
        Self {
            current: p.current_page,
            total_pages: p.total_pages,
            total_count: p.total_count,
            previous: p.has_previous().then(|| p.current_page - 1),
            next: p.has_next().then(|| p.current_page + 1),
            pages: (first..=last)
                .map(|number| PageLink {
                    number,
                    is_current: number == p.current_page,
                })
                .collect(),
        }
    }
}

/// Cents per litre, one decimal place.
pub fn format_price(cents: f64) -> String {
    format!("{cents:.1}")
}

pub fn format_distance(km: f64) -> String {
    if km < 1.0 {
        format!("{:.0} m", km * 1000.0)
    } else {
        format!("{km:.1} km")
    }
}

pub fn format_updated(at: DateTime<Utc>) -> String {
    at.format("%-d %b %Y, %H:%M UTC").to_string()
}
