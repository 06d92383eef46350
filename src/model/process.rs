//! Process descriptors: one planned daemon and its liveness.

use crate::model::Endpoint;
use std::fmt;
use std::path::PathBuf;

/// Logical process name, e.g. `rs0/rs1`, `shard02`, `config3` or `mongos`.
pub type ProcessId = String;

/// What a daemon does inside the topology.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Role {
    DataNode,
    Arbiter,
    ConfigServer,
    /// The router is handed the config-server connection string at startup.
    Router { config_db: String },
}

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Role::DataNode => "data-node",
            Role::Arbiter => "arbiter",
            Role::ConfigServer => "config-server",
            Role::Router { .. } => "router",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// On-disk locations for one process.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcessPaths {
    pub data_dir: PathBuf,
    /// Storage root. The router keeps no data and has none.
    pub db_path: Option<PathBuf>,
    pub log_path: PathBuf,
}

/// Where a process is in its startup lifecycle.
///
/// `Ready` and `Failed` are terminal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Liveness {
    NotStarted,
    Launched,
    Ready,
    Failed(String),
}

impl fmt::Display for Liveness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Liveness::NotStarted => f.write_str("not-started"),
            Liveness::Launched => f.write_str("launched"),
            Liveness::Ready => f.write_str("ready"),
            Liveness::Failed(reason) => write!(f, "failed ({reason})"),
        }
    }
}

/// A requested change of [`Liveness`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Transition {
    Launched,
    Ready,
    Failed(String),
}

/// One daemon in the launch plan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcessDescriptor {
    pub id: ProcessId,
    pub role: Role,
    pub paths: ProcessPaths,
    pub endpoint: Endpoint,
    /// Set name for replica-set members, `None` for standalone, config and router.
    pub replica_set: Option<String>,
    pub liveness: Liveness,
}

impl ProcessDescriptor {
    pub fn new(
        id: impl Into<ProcessId>,
        role: Role,
        paths: ProcessPaths,
        endpoint: Endpoint,
        replica_set: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            role,
            paths,
            endpoint,
            replica_set,
            liveness: Liveness::NotStarted,
        }
    }

    /// Applies a transition, rejecting anything that leaves a terminal state
    /// or skips the launch step.
    pub fn apply(&mut self, transition: Transition) -> Result<(), String> {
        let next = match (&self.liveness, transition) {
            (Liveness::NotStarted, Transition::Launched) => Liveness::Launched,
            (Liveness::NotStarted, Transition::Failed(reason)) => Liveness::Failed(reason),
            (Liveness::Launched, Transition::Ready) => Liveness::Ready,
            (Liveness::Launched, Transition::Failed(reason)) => Liveness::Failed(reason),
            (current, transition) => {
                return Err(format!(
                    "{} cannot go from {} via {:?}",
                    self.id, current, transition
                ))
            }
        };
        self.liveness = next;
        Ok(())
    }
}
