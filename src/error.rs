//! Error taxonomy for planning and launching a topology.

use crate::admin::AdminError;
use crate::model::{Endpoint, ProcessId};
use crate::registry::RegistryError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LaunchError {
    /// Invalid option combination. Reported before anything is started.
    #[error("invalid topology: {0}")]
    Configuration(String),

    #[error("cannot create {}: {source}", .path.display())]
    Layout {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to launch {process} on {endpoint}: {reason}")]
    Spawn {
        process: ProcessId,
        endpoint: Endpoint,
        reason: String,
    },

    #[error("{group}: never became ready: {}", join_endpoints(.endpoints))]
    ReadinessTimeout {
        group: String,
        endpoints: Vec<Endpoint>,
    },

    #[error("replica set {replica_set}: {source}")]
    Admin {
        replica_set: String,
        #[source]
        source: AdminError,
    },

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

fn join_endpoints(endpoints: &[Endpoint]) -> String {
    endpoints
        .iter()
        .map(Endpoint::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
