//! The live station list.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::domain::Station;

use super::cache::FeedCache;
use super::client::FeedClient;
use super::error::FeedError;
use super::normalize::normalize_all;

/// Where raw station rows come from.
#[derive(Debug, Clone)]
pub enum FeedSource {
    Http(FeedClient),
    /// A JSON file holding an array of rows or a `{ "results": [..] }` page.
    Fixture(PathBuf),
}

impl FeedSource {
    /// A stable name for the feed, stamped on the disk snapshot.
    pub fn identity(&self) -> String {
        match self {
            FeedSource::Http(client) => client.rows_url().to_string(),
            FeedSource::Fixture(path) => format!("fixture:{}", path.display()),
        }
    }

    /// Fetch every raw row.
    pub async fn fetch_rows(&self) -> Result<Vec<Value>, FeedError> {
        match self {
            FeedSource::Http(client) => client.fetch_all().await,
            FeedSource::Fixture(path) => {
                let contents =
                    tokio::fs::read_to_string(path)
                        .await
                        .map_err(|e| FeedError::Fixture {
                            message: format!("failed to read {}: {e}", path.display()),
                        })?;
                rows_from_document(&contents)
            }
        }
    }
}

fn rows_from_document(contents: &str) -> Result<Vec<Value>, FeedError> {
    let document: Value = serde_json::from_str(contents).map_err(|e| FeedError::Json {
        message: e.to_string(),
    })?;

    match document {
        Value::Array(rows) => Ok(rows),
        Value::Object(mut obj) => match obj.remove("results") {
            Some(Value::Array(rows)) => Ok(rows),
            _ => Err(FeedError::Fixture {
                message: "expected an array or an object with a results array".to_string(),
            }),
        },
        _ => Err(FeedError::Fixture {
            message: "expected an array or an object with a results array".to_string(),
        }),
    }
}

/// An immutable view of the station list at one point in time.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub stations: Arc<Vec<Station>>,
    /// Bumped on every replacement; keys the query cache.
    pub generation: u64,
    pub loaded_at: DateTime<Utc>,
}

impl Snapshot {
    fn empty() -> Self {
        Self {
            stations: Arc::new(Vec::new()),
            generation: 0,
            loaded_at: Utc::now(),
        }
    }
}

/// Thread-safe station list with background refresh.
///
/// Readers take a cheap [`Snapshot`] and query it without holding the lock.
#[derive(Clone)]
pub struct StationDirectory {
    inner: Arc<RwLock<Snapshot>>,
    source: FeedSource,
    cache: Option<FeedCache>,
}

impl StationDirectory {
    /// Create a directory with no stations yet.
    pub fn empty(source: FeedSource, cache: Option<FeedCache>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Snapshot::empty())),
            source,
            cache,
        }
    }

    /// Load stations from the disk cache if fresh, otherwise from the source.
    pub async fn load(source: FeedSource, cache: Option<FeedCache>) -> Result<Self, FeedError> {
        let directory = Self::empty(source, cache);

        if let Some(cache) = &directory.cache {
            match cache.load(&directory.source.identity()).await {
                Ok(warm) => {
                    info!(
                        count = warm.stations.len(),
                        written_at = %warm.written_at,
                        "loaded stations from disk snapshot"
                    );
                    directory.replace(warm.stations).await;
                    return Ok(directory);
                }
                Err(miss) => debug!(reason = %miss, "disk snapshot not used"),
            }
        }

        directory.refresh().await?;
        Ok(directory)
    }

    /// Re-fetch from the source and replace the station list.
    ///
    /// On failure the existing list is kept and the error returned.
    pub async fn refresh(&self) -> Result<usize, FeedError> {
        let rows = self.source.fetch_rows().await?;
        let normalized = normalize_all(&rows);
        let count = normalized.stations.len();

        if let Some(cache) = &self.cache
            && let Err(e) = cache
                .save(&self.source.identity(), &normalized.stations)
                .await
        {
            warn!(error = %e, path = %cache.path().display(), "failed to write station cache");
        }

        let generation = self.replace(normalized.stations).await;
        info!(count, generation, "station list refreshed");

        Ok(count)
    }

    /// Swap in a new station list, returning its generation.
    pub async fn replace(&self, stations: Vec<Station>) -> u64 {
        let mut guard = self.inner.write().await;
        let generation = guard.generation + 1;
        *guard = Snapshot {
            stations: Arc::new(stations),
            generation,
            loaded_at: Utc::now(),
        };
        generation
    }

    pub async fn snapshot(&self) -> Snapshot {
        self.inner.read().await.clone()
    }

    /// Find one station by id.
    pub async fn get(&self, id: &str) -> Option<Station> {
        let guard = self.inner.read().await;
        guard.stations.iter().find(|s| s.id == id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.stations.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.stations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use serde_json::json;
    use tempfile::tempdir;

    fn write_fixture(dir: &std::path::Path, body: &Value) -> PathBuf {
        let path = dir.join("stations.json");
        std::fs::write(&path, body.to_string()).unwrap();
        path
    }

    #[test]
    fn document_shapes() {
        assert_eq!(rows_from_document("[{\"id\": 1}]").unwrap().len(), 1);
        assert_eq!(
            rows_from_document("{\"count\": 1, \"results\": [{}, {}]}")
                .unwrap()
                .len(),
            2
        );
        assert!(matches!(
            rows_from_document("{\"rows\": []}"),
            Err(FeedError::Fixture { .. })
        ));
        assert!(matches!(
            rows_from_document("nope"),
            Err(FeedError::Json { .. })
        ));
    }

    #[tokio::test]
    async fn load_from_fixture() {
        let dir = tempdir().unwrap();
        let path = write_fixture(
            dir.path(),
            &json!([{"id": "a", "name": "Alpha"}, {"id": "b", "name": "Beta"}]),
        );

        let directory = StationDirectory::load(FeedSource::Fixture(path), None)
            .await
            .unwrap();

        assert_eq!(directory.len().await, 2);
        let snapshot = directory.snapshot().await;
        assert_eq!(snapshot.generation, 1);
        assert_eq!(snapshot.stations[1].name, "Beta");
        assert_eq!(directory.get("a").await.unwrap().name, "Alpha");
        assert!(directory.get("zzz").await.is_none());
    }

    fn snapshot_cache(dir: &std::path::Path) -> FeedCache {
        FeedCache::new(dir.join("cache.json"), Duration::from_secs(3600))
    }

    #[tokio::test]
    async fn fresh_snapshot_wins_over_source() {
        let dir = tempdir().unwrap();
        let path = write_fixture(dir.path(), &json!([{"id": "live", "name": "Live"}]));
        let source = FeedSource::Fixture(path);

        let cache = snapshot_cache(dir.path());
        cache
            .save(&source.identity(), &[Station::new("cached", "From Cache")])
            .await
            .unwrap();

        let directory = StationDirectory::load(source, Some(cache)).await.unwrap();

        assert!(directory.get("cached").await.is_some());
        assert!(directory.get("live").await.is_none());
    }

    #[tokio::test]
    async fn snapshot_of_another_feed_falls_through_to_source() {
        let dir = tempdir().unwrap();
        let path = write_fixture(dir.path(), &json!([{"id": "live", "name": "Live"}]));
        let source = FeedSource::Fixture(path);

        let cache = snapshot_cache(dir.path());
        cache
            .save("fixture:elsewhere.json", &[Station::new("stale", "Other Feed")])
            .await
            .unwrap();

        let directory = StationDirectory::load(source.clone(), Some(cache.clone()))
            .await
            .unwrap();

        assert!(directory.get("stale").await.is_none());
        assert!(directory.get("live").await.is_some());

        // The refresh re-stamps the snapshot for this feed
        let warm = cache.load(&source.identity()).await.unwrap();
        assert_eq!(warm.stations[0].id, "live");
    }

    #[tokio::test]
    async fn refresh_writes_snapshot() {
        let dir = tempdir().unwrap();
        let cache = snapshot_cache(dir.path());
        let path = write_fixture(dir.path(), &json!([{"id": "live", "name": "Live"}]));
        let source = FeedSource::Fixture(path);

        StationDirectory::load(source.clone(), Some(cache.clone()))
            .await
            .unwrap();

        let warm = cache.load(&source.identity()).await.unwrap();
        assert_eq!(warm.stations[0].id, "live");
    }

    #[test]
    fn identities_distinguish_feeds() {
        let a = FeedSource::Fixture("a.json".into());
        let b = FeedSource::Fixture("b.json".into());
        assert_eq!(a.identity(), "fixture:a.json");
        assert_ne!(a.identity(), b.identity());

        let client =
            FeedClient::new(crate::feed::FeedClientConfig::new("https://api.baserow.io/", "42"))
                .unwrap();
        assert_eq!(
            FeedSource::Http(client).identity(),
            "https://api.baserow.io/api/database/rows/table/42/"
        );
    }

    #[tokio::test]
    async fn failed_refresh_keeps_old_snapshot() {
        let dir = tempdir().unwrap();
        let path = write_fixture(dir.path(), &json!([{"id": "a", "name": "Alpha"}]));
        let directory = StationDirectory::load(FeedSource::Fixture(path.clone()), None)
            .await
            .unwrap();

        std::fs::write(&path, "not json").unwrap();
        assert!(directory.refresh().await.is_err());

        let snapshot = directory.snapshot().await;
        assert_eq!(snapshot.generation, 1);
        assert_eq!(snapshot.stations.len(), 1);
    }

    #[tokio::test]
    async fn missing_fixture_fails_load() {
        let result =
            StationDirectory::load(FeedSource::Fixture("/nonexistent/rows.json".into()), None)
                .await;
        assert!(matches!(result, Err(FeedError::Fixture { .. })));
    }

    #[tokio::test]
    async fn replace_bumps_generation() {
        let directory =
            StationDirectory::empty(FeedSource::Fixture("/unused.json".into()), None);
        assert!(directory.is_empty().await);

        assert_eq!(directory.replace(vec![Station::new("1", "One")]).await, 1);
        assert_eq!(directory.replace(Vec::new()).await, 2);
        assert!(directory.is_empty().await);
    }
}
