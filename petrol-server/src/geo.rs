//! Planar and great-circle geometry over [`Coordinates`].
//!
//! Regions are small (tens of kilometres), so point-in-polygon treats
//! longitude/latitude as a flat plane. Distances use the haversine formula.

use crate::domain::Coordinates;

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two points in kilometres.
///
/// # Examples
///
/// ```
/// use petrol_server::domain::Coordinates;
/// use petrol_server::geo::haversine_km;
///
/// let cbd = Coordinates::new(-37.8136, 144.9631).unwrap();
/// let geelong = Coordinates::new(-38.1499, 144.3617).unwrap();
/// let d = haversine_km(&cbd, &geelong);
/// assert!((d - 64.0).abs() < 2.0);
/// ```
pub fn haversine_km(a: &Coordinates, b: &Coordinates) -> f64 {
    let lat1 = a.latitude().to_radians();
    let lat2 = b.latitude().to_radians();
    let dlat = (b.latitude() - a.latitude()).to_radians();
    let dlng = (b.longitude() - a.longitude()).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

/// A simple (non self-intersecting) polygon.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<Coordinates>,
}

impl Polygon {
    /// Build a polygon from its vertices. The ring is closed implicitly.
    ///
    /// Returns `None` for fewer than three vertices.
    pub fn new(vertices: Vec<Coordinates>) -> Option<Self> {
        (vertices.len() >= 3).then_some(Self { vertices })
    }

    /// Build from `(lat, lng)` pairs, skipping invalid ones.
    pub fn from_lat_lng(points: &[(f64, f64)]) -> Option<Self> {
        let vertices = points
            .iter()
            .filter_map(|&(lat, lng)| Coordinates::new(lat, lng).ok())
            .collect();
        Self::new(vertices)
    }

    pub fn vertices(&self) -> &[Coordinates] {
        &self.vertices
    }

    /// Ray-casting containment test.
    ///
    /// Points exactly on an edge may fall either side; callers needing a
    /// deterministic answer rely on region priority order instead.
    pub fn contains(&self, point: &Coordinates) -> bool {
        let x = point.longitude();
        let y = point.latitude();
        let mut inside = false;

        let n = self.vertices.len();
        let mut j = n - 1;
        for i in 0..n {
            let (xi, yi) = (self.vertices[i].longitude(), self.vertices[i].latitude());
            let (xj, yj) = (self.vertices[j].longitude(), self.vertices[j].latitude());

            if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
                inside = !inside;
            }
            j = i;
        }

        inside
    }
}

/// A geometric classification rule.
#[derive(Debug, Clone, PartialEq)]
pub enum Area {
    Polygon(Polygon),
    /// Everything within `radius_km` of `centre`.
    Circle { centre: Coordinates, radius_km: f64 },
}

impl Area {
    pub fn contains(&self, point: &Coordinates) -> bool {
        match self {
            Area::Polygon(polygon) => polygon.contains(point),
            Area::Circle { centre, radius_km } => haversine_km(centre, point) <= *radius_km,
        }
    }
}
