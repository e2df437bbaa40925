//! On-disk persistence for raw ODPT responses.
//!
//! Each response is written verbatim as pretty-printed UTF-8 JSON, one file
//! per collection: `<dir>/<prefix>_<kind>.json`.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::domain::OperatorId;

/// Errors from reading or writing snapshot files.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Filesystem operation failed
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File contents could not be (de)serialized
    #[error("JSON error on {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// The collections making up a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnapshotKind {
    Stations,
    Railways,
    Trains,
}

impl SnapshotKind {
    /// All kinds, in fetch order.
    pub const ALL: [SnapshotKind; 3] = [
        SnapshotKind::Stations,
        SnapshotKind::Railways,
        SnapshotKind::Trains,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SnapshotKind::Stations => "stations",
            SnapshotKind::Railways => "railways",
            SnapshotKind::Trains => "trains",
        }
    }
}

impl fmt::Display for SnapshotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for the snapshot store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Directory the files live in.
    pub dir: PathBuf,
    /// File name prefix, usually the operator slug.
    pub prefix: String,
}

impl StoreConfig {
    /// Create a config with an explicit directory and prefix.
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
        }
    }

    /// Default layout for an operator: `odpt_data_<slug>/<slug>_*.json`.
    pub fn for_operator(operator: &OperatorId) -> Self {
        let slug = operator.slug();
        Self::new(format!("odpt_data_{slug}"), slug)
    }

    /// Use a different directory, keeping the prefix.
    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = dir.into();
        self
    }
}

/// Reads and writes snapshot files.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    config: StoreConfig,
}

impl SnapshotStore {
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    /// Directory holding the snapshot files.
    pub fn dir(&self) -> &Path {
        &self.config.dir
    }

    /// Path of the file for one collection.
    pub fn path(&self, kind: SnapshotKind) -> PathBuf {
        self.config
            .dir
            .join(format!("{}_{}.json", self.config.prefix, kind))
    }

    /// Write a raw response, creating the directory if needed.
    pub fn save(&self, kind: SnapshotKind, data: &serde_json::Value) -> Result<PathBuf, StoreError> {
        let dir = &self.config.dir;
        if !dir.as_os_str().is_empty() && !dir.exists() {
            std::fs::create_dir_all(dir).map_err(|source| StoreError::Io {
                path: dir.clone(),
                source,
            })?;
        }

        let path = self.path(kind);

        let mut json = serde_json::to_string_pretty(data).map_err(|source| StoreError::Json {
            path: path.clone(),
            source,
        })?;
        json.push('\n');

        std::fs::write(&path, json).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;

        info!(path = %path.display(), "saved {kind}");
        Ok(path)
    }

    /// Read a previously saved raw response.
    pub fn load(&self, kind: SnapshotKind) -> Result<serde_json::Value, StoreError> {
        let path = self.path(kind);

        let contents = std::fs::read_to_string(&path).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;

        serde_json::from_str(&contents).map_err(|source| StoreError::Json { path, source })
    }
}
