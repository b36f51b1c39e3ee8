//! Warm-restart snapshot of the normalised station list.
//!
//! The file records which feed it was taken from and when. A snapshot taken
//! from a different table or fixture, written in another format version, or
//! older than the TTL is ignored, so a restart never serves another feed's
//! stations.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::Station;

use super::error::FeedError;

/// Bumped whenever the stored [`Station`] shape changes.
const FORMAT_VERSION: u32 = 1;

/// Everything but the stations, read first to decide whether the file is usable.
#[derive(Deserialize)]
struct SnapshotHeader {
    version: u32,
    source: String,
    written_at: DateTime<Utc>,
}

#[derive(Serialize)]
struct SnapshotFileRef<'a> {
    version: u32,
    source: &'a str,
    written_at: DateTime<Utc>,
    stations: &'a [Station],
}

#[derive(Deserialize)]
struct SnapshotBody {
    stations: Vec<Station>,
}

/// A usable snapshot read back from disk.
#[derive(Debug, Clone, PartialEq)]
pub struct WarmStart {
    pub stations: Vec<Station>,
    pub written_at: DateTime<Utc>,
}

/// Why a snapshot on disk was not used.
#[derive(Debug, thiserror::Error)]
pub enum CacheMiss {
    #[error("no snapshot at {0}")]
    Absent(PathBuf),

    #[error("unreadable snapshot: {0}")]
    Unreadable(String),

    #[error("snapshot format {found} (current is {FORMAT_VERSION})")]
    Version { found: u32 },

    #[error("snapshot was taken from {found}")]
    OtherSource { found: String },

    #[error("snapshot is {age_secs}s old")]
    Expired { age_secs: i64 },
}

/// On-disk snapshot of the station list for one feed.
#[derive(Debug, Clone)]
pub struct FeedCache {
    path: PathBuf,
    ttl: Duration,
}

impl FeedCache {
    pub fn new(path: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            path: path.into(),
            ttl,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the snapshot written for `source`, if it is still fresh.
    pub async fn load(&self, source: &str) -> Result<WarmStart, CacheMiss> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(CacheMiss::Absent(self.path.clone()));
            }
            Err(e) => return Err(CacheMiss::Unreadable(e.to_string())),
        };

        let header: SnapshotHeader =
            serde_json::from_str(&contents).map_err(|e| CacheMiss::Unreadable(e.to_string()))?;

        if header.version != FORMAT_VERSION {
            return Err(CacheMiss::Version {
                found: header.version,
            });
        }
        if header.source != source {
            return Err(CacheMiss::OtherSource {
                found: header.source,
            });
        }

        // A snapshot stamped in the future (clock skew) counts as fresh
        let age = Utc::now() - header.written_at;
        let ttl = TimeDelta::from_std(self.ttl).unwrap_or(TimeDelta::MAX);
        if age >= ttl {
            return Err(CacheMiss::Expired {
                age_secs: age.num_seconds(),
            });
        }

        let body: SnapshotBody =
            serde_json::from_str(&contents).map_err(|e| CacheMiss::Unreadable(e.to_string()))?;

        Ok(WarmStart {
            stations: body.stations,
            written_at: header.written_at,
        })
    }

    /// Write a snapshot for `source`, replacing the file atomically.
    pub async fn save(&self, source: &str, stations: &[Station]) -> Result<(), FeedError> {
        let file = SnapshotFileRef {
            version: FORMAT_VERSION,
            source,
            written_at: Utc::now(),
            stations,
        };
        let json = serde_json::to_vec(&file).map_err(|e| FeedError::Cache {
            message: format!("encoding snapshot: {e}"),
        })?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| FeedError::Cache {
                    message: format!("creating {}: {e}", parent.display()),
                })?;
        }

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| FeedError::Cache {
                message: format!("writing {}: {e}", tmp.display()),
            })?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| FeedError::Cache {
                message: format!("replacing {}: {e}", self.path.display()),
            })
    }
}
