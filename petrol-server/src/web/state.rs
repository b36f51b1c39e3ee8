//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::{CacheConfig, QueryCache};
use crate::feed::StationDirectory;
use crate::prefs::PreferenceStore;
use crate::query::DEFAULT_PAGE_SIZE;
use crate::regions::RegionClassifier;

use super::dto::StationsResponse;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Live station list
    pub directory: StationDirectory,

    /// Region table used to classify stations
    pub classifier: Arc<RegionClassifier>,

    /// Rendered query pages
    pub query_cache: Arc<QueryCache<StationsResponse>>,

    /// User preferences (theme, brand logos)
    pub prefs: PreferenceStore,

    /// Stations per page
    pub page_size: usize,
}

impl AppState {
    /// Create a new app state.
    pub fn new(
        directory: StationDirectory,
        classifier: RegionClassifier,
        cache_config: &CacheConfig,
        prefs: PreferenceStore,
    ) -> Self {
        Self {
            directory,
            classifier: Arc::new(classifier),
            query_cache: Arc::new(QueryCache::new(cache_config)),
            prefs,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }
}
