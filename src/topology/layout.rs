//! On-disk layout: `<base>/data/[<name>/]db` plus a sibling `mongod.log`.
//!
//! The daemons are pointed at these paths, so the naming here is the only
//! durable contract between runs.

use crate::error::LaunchError;
use crate::model::ProcessPaths;
use std::path::{Path, PathBuf};
use tracing::debug;

const DATA_DIR: &str = "data";
const DB_DIR: &str = "db";
const DAEMON_LOG: &str = "mongod.log";
const ROUTER_LOG: &str = "mongos.log";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    base_dir: PathBuf,
}

impl Layout {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn data_root(&self) -> PathBuf {
        self.base_dir.join(DATA_DIR)
    }

    /// Paths for a data-bearing process. `name` may span several segments
    /// separated by `/`, e.g. `shard01/rs2`.
    pub fn paths(&self, name: Option<&str>) -> ProcessPaths {
        let mut data_dir = self.data_root();
        if let Some(name) = name {
            data_dir.extend(name.split('/').filter(|s| !s.is_empty()));
        }
        ProcessPaths {
            db_path: Some(data_dir.join(DB_DIR)),
            log_path: data_dir.join(DAEMON_LOG),
            data_dir,
        }
    }

    /// The router keeps no data; its log sits directly under `<base>/data`.
    pub fn router_paths(&self) -> ProcessPaths {
        let data_dir = self.data_root();
        ProcessPaths {
            db_path: None,
            log_path: data_dir.join(ROUTER_LOG),
            data_dir,
        }
    }
}

/// Creates the storage directory (or the data directory for the router),
/// including parents. An existing directory is not an error.
pub async fn ensure(paths: &ProcessPaths) -> Result<(), LaunchError> {
    let dir: &Path = paths.db_path.as_deref().unwrap_or(&paths.data_dir);
    debug!(path = %dir.display(), "creating directory");
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|source| LaunchError::Layout {
            path: dir.to_path_buf(),
            source,
        })
}
