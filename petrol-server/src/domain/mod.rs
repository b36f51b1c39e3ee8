//! Domain types for the station directory.
//!
//! These are the canonical shapes every other module works with. Upstream
//! records are mapped onto them once, at the feed boundary; coordinates are
//! validated at construction so code holding a `Coordinates` can trust it.

mod filter;
mod fuel;
mod station;

pub use filter::{FilterSpec, PriceRange, SortKey};
pub use fuel::{FuelPriceEntry, FuelType};
pub use station::{Coordinates, InvalidCoordinates, Station};
