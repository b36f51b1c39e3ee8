//! Station query engine.
//!
//! Turns the full station list and a [`FilterSpec`](crate::domain::FilterSpec)
//! into the filtered, sorted, paginated subset to render. The pipeline runs
//! in a fixed order: region, text search, fuel type, brand, price range,
//! sort, paginate. Every stage is a pure function of its inputs, so the
//! engine can be re-invoked on every filter change.

mod engine;
mod page;
mod sort;

pub use engine::{QueryEngine, QueryRequest, QueryPage, StationMatch};
pub use page::{DEFAULT_PAGE_SIZE, Pagination, paginate};
pub use sort::sort_matches;
