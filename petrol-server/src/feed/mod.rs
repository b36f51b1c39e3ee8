//! Station feed: fetching, normalising, caching and holding the live list.
//!
//! Rows are pulled from a Baserow table (or a local fixture file), mapped
//! onto [`Station`](crate::domain::Station) by [`normalize_record`], kept on
//! disk for warm restarts, and published through [`StationDirectory`].

mod cache;
mod client;
mod directory;
mod error;
mod normalize;

pub use cache::{CacheMiss, FeedCache, WarmStart};
pub use client::{FeedClient, FeedClientConfig};
pub use directory::{FeedSource, Snapshot, StationDirectory};
pub use error::FeedError;
pub use normalize::{Normalized, normalize_all, normalize_record};
