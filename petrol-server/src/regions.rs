//! Region classification for stations.
//!
//! Every station belongs to exactly one region. Classification tries each
//! region's area in priority order (first match wins), then falls back to a
//! suburb-name lookup, and finally to the designated unclassified region.
//! A station is never dropped for lack of data.

use std::collections::HashMap;

use serde::Serialize;

use crate::domain::{Coordinates, Station};
use crate::geo::{Area, Polygon};

/// Id of the catch-all region.
pub const UNCLASSIFIED_ID: &str = "unclassified";

/// A named geographic subdivision used for browsing and filtering.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub id: String,
    pub name: String,
    pub description: String,
    /// CSS colour used for map markers and badges.
    pub color: String,
    #[serde(skip)]
    pub area: Option<Area>,
    #[serde(skip)]
    pub suburbs: Vec<String>,
}

impl Region {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into().to_lowercase(),
            name: name.into(),
            description: description.into(),
            color: color.into(),
            area: None,
            suburbs: Vec::new(),
        }
    }

    pub fn with_area(mut self, area: Area) -> Self {
        self.area = Some(area);
        self
    }

    pub fn with_suburbs(mut self, suburbs: &[&str]) -> Self {
        self.suburbs = suburbs.iter().map(|s| (*s).to_string()).collect();
        self
    }

    pub fn is_unclassified(&self) -> bool {
        self.id == UNCLASSIFIED_ID
    }

    fn contains(&self, point: &Coordinates) -> bool {
        self.area.as_ref().is_some_and(|a| a.contains(point))
    }
}

/// Normalise a suburb name for lookup.
fn suburb_key(suburb: &str) -> String {
    suburb
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Assigns each station exactly one [`Region`].
#[derive(Debug, Clone)]
pub struct RegionClassifier {
    /// Classifiable regions in priority order.
    regions: Vec<Region>,
    unclassified: Region,
    /// Normalised suburb name → index into `regions`.
    suburbs: HashMap<String, usize>,
}

impl RegionClassifier {
    /// Classify a location, with the suburb name as fallback.
    pub fn classify(&self, location: Option<&Coordinates>, suburb: &str) -> &Region {
        if let Some(point) = location
            && let Some(region) = self.regions.iter().find(|r| r.contains(point))
        {
            return region;
        }

        self.suburbs
            .get(&suburb_key(suburb))
            .map(|&idx| &self.regions[idx])
            .unwrap_or(&self.unclassified)
    }

    /// Classify a station by its location and suburb.
    pub fn classify_station(&self, station: &Station) -> &Region {
        self.classify(station.location.as_ref(), &station.suburb)
    }

    /// The classifiable regions in priority order (excludes unclassified).
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// The catch-all region.
    pub fn unclassified(&self) -> &Region {
        &self.unclassified
    }

    /// Look up a region by id, case-insensitively. Includes unclassified.
    pub fn get(&self, id: &str) -> Option<&Region> {
        let id = id.trim().to_lowercase();
        if id == self.unclassified.id {
            return Some(&self.unclassified);
        }
        self.regions.iter().find(|r| r.id == id)
    }

    /// Number of classifiable regions.
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

impl Default for RegionClassifier {
    fn default() -> Self {
        RegionClassifierBuilder::new().build()
    }
}

/// Builder for a [`RegionClassifier`].
///
/// Regions are tried in the order they are added.
#[derive(Debug, Default)]
pub struct RegionClassifierBuilder {
    regions: Vec<Region>,
    unclassified: Option<Region>,
}

impl RegionClassifierBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a region at the lowest priority so far.
    ///
    /// A region reusing an existing id, or the unclassified id, is ignored.
    pub fn region(mut self, region: Region) -> Self {
        if region.is_unclassified() || self.regions.iter().any(|r| r.id == region.id) {
            return self;
        }
        self.regions.push(region);
        self
    }

    /// Override the catch-all region's presentation.
    pub fn unclassified(mut self, name: &str, description: &str, color: &str) -> Self {
        self.unclassified = Some(Region::new(UNCLASSIFIED_ID, name, description, color));
        self
    }

    pub fn build(self) -> RegionClassifier {
        // Earlier regions keep a suburb claimed by more than one
        let mut suburbs = HashMap::new();
        for (idx, region) in self.regions.iter().enumerate() {
            for suburb in &region.suburbs {
                suburbs.entry(suburb_key(suburb)).or_insert(idx);
            }
        }

        RegionClassifier {
            regions: self.regions,
            unclassified: self.unclassified.unwrap_or_else(|| {
                Region::new(
                    UNCLASSIFIED_ID,
                    "Other Areas",
                    "Stations outside the mapped regions",
                    "#9ca3af",
                )
            }),
            suburbs,
        }
    }
}

fn polygon(points: &[(f64, f64)]) -> Option<Area> {
    Polygon::from_lat_lng(points).map(Area::Polygon)
}

/// The five Melbourne browsing regions.
///
/// The CBD is a circle checked first so inner suburbs near the centre fall
/// into it; the suburban polygons overlap slightly at their seams and
/// resolve by priority.
pub fn melbourne_regions() -> RegionClassifier {
    let mut cbd = Region::new(
        "cbd",
        "Melbourne CBD",
        "The city centre and immediately surrounding inner suburbs",
        "#ef4444",
    )
    .with_suburbs(&[
        "Melbourne",
        "Southbank",
        "Docklands",
        "Carlton",
        "East Melbourne",
        "West Melbourne",
        "North Melbourne",
        "Fitzroy",
        "Collingwood",
        "South Melbourne",
    ]);
    if let Ok(centre) = Coordinates::new(-37.8136, 144.9631) {
        cbd = cbd.with_area(Area::Circle {
            centre,
            radius_km: 3.0,
        });
    }

    let northern = Region::new(
        "northern",
        "Northern Suburbs",
        "Brunswick, Coburg, Preston and the growth corridor towards Craigieburn",
        "#3b82f6",
    )
    .with_suburbs(&[
        "Brunswick",
        "Coburg",
        "Preston",
        "Reservoir",
        "Thornbury",
        "Northcote",
        "Epping",
        "Bundoora",
        "Craigieburn",
        "Broadmeadows",
        "Pascoe Vale",
        "Glenroy",
        "Mill Park",
        "South Morang",
    ]);
    let northern = match polygon(&[
        (-37.45, 144.88),
        (-37.45, 145.12),
        (-37.775, 145.12),
        (-37.775, 144.88),
    ]) {
        Some(area) => northern.with_area(area),
        None => northern,
    };

    let eastern = Region::new(
        "eastern",
        "Eastern Suburbs",
        "Hawthorn and Box Hill out to Ringwood and the Dandenong Ranges foothills",
        "#22c55e",
    )
    .with_suburbs(&[
        "Richmond",
        "Hawthorn",
        "Kew",
        "Camberwell",
        "Balwyn",
        "Box Hill",
        "Doncaster",
        "Blackburn",
        "Nunawading",
        "Mitcham",
        "Ringwood",
        "Croydon",
        "Bayswater",
        "Boronia",
        "Ferntree Gully",
    ]);
    let eastern = match polygon(&[
        (-37.70, 145.00),
        (-37.70, 145.45),
        (-37.87, 145.45),
        (-37.87, 145.00),
    ]) {
        Some(area) => eastern.with_area(area),
        None => eastern,
    };

    let south_eastern = Region::new(
        "south-eastern",
        "South Eastern Suburbs",
        "St Kilda and the bayside down to Frankston, inland to Dandenong",
        "#f59e0b",
    )
    .with_suburbs(&[
        "St Kilda",
        "Elwood",
        "Brighton",
        "Caulfield",
        "Malvern",
        "Oakleigh",
        "Clayton",
        "Moorabbin",
        "Cheltenham",
        "Mentone",
        "Springvale",
        "Dandenong",
        "Noble Park",
        "Frankston",
        "Berwick",
    ]);
    let south_eastern = match polygon(&[
        (-37.84, 144.95),
        (-37.84, 145.45),
        (-38.20, 145.45),
        (-38.20, 144.95),
    ]) {
        Some(area) => south_eastern.with_area(area),
        None => south_eastern,
    };

    let western = Region::new(
        "western",
        "Western Suburbs",
        "Footscray and Sunshine across to Werribee and Melton",
        "#a855f7",
    )
    .with_suburbs(&[
        "Footscray",
        "Yarraville",
        "Seddon",
        "Williamstown",
        "Newport",
        "Altona",
        "Sunshine",
        "St Albans",
        "Deer Park",
        "Point Cook",
        "Werribee",
        "Hoppers Crossing",
        "Melton",
        "Caroline Springs",
    ]);
    let western = match polygon(&[
        (-37.55, 144.50),
        (-37.55, 144.905),
        (-38.00, 144.905),
        (-38.00, 144.50),
    ]) {
        Some(area) => western.with_area(area),
        None => western,
    };

    RegionClassifierBuilder::new()
        .region(cbd)
        .region(northern)
        .region(eastern)
        .region(south_eastern)
        .region(western)
        .build()
}
