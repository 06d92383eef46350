use crate::error::LaunchError;
use crate::model::Endpoint;
use crate::topology::replset::ReplicaSetOutcome;
use std::fmt;

/// How one group of processes (a standalone, a replica set, the config
/// servers, the router) ended up.
#[derive(Debug)]
pub enum GroupOutcome {
    Ready,
    Initiated,
    AlreadyConfigured,
    Failed(LaunchError),
    /// Not attempted because something it depends on failed.
    Skipped(String),
}

impl GroupOutcome {
    pub fn is_ready(&self) -> bool {
        matches!(
            self,
            GroupOutcome::Ready | GroupOutcome::Initiated | GroupOutcome::AlreadyConfigured
        )
    }
}

impl From<ReplicaSetOutcome> for GroupOutcome {
    fn from(outcome: ReplicaSetOutcome) -> Self {
        match outcome {
            ReplicaSetOutcome::Initiated => GroupOutcome::Initiated,
            ReplicaSetOutcome::AlreadyConfigured => GroupOutcome::AlreadyConfigured,
        }
    }
}

impl fmt::Display for GroupOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupOutcome::Ready => f.write_str("ready"),
            GroupOutcome::Initiated => f.write_str("ready, replica set initiated"),
            GroupOutcome::AlreadyConfigured => f.write_str("ready, replica set already configured"),
            GroupOutcome::Failed(e) => write!(f, "FAILED: {e}"),
            GroupOutcome::Skipped(why) => write!(f, "skipped: {why}"),
        }
    }
}

#[derive(Debug)]
pub struct GroupReport {
    pub name: String,
    pub endpoints: Vec<Endpoint>,
    pub outcome: GroupOutcome,
}

/// Result of one launch: every group in the order it was handled.
#[derive(Debug)]
pub struct DeploymentReport {
    pub groups: Vec<GroupReport>,
    /// Where a client connects: standalone node, replica-set seed or router.
    pub entry_point: Endpoint,
}

impl DeploymentReport {
    pub fn new(entry_point: Endpoint) -> Self {
        Self {
            groups: Vec::new(),
            entry_point,
        }
    }

    pub fn record(
        &mut self,
        name: impl Into<String>,
        endpoints: Vec<Endpoint>,
        outcome: Result<GroupOutcome, LaunchError>,
    ) {
        self.groups.push(GroupReport {
            name: name.into(),
            endpoints,
            outcome: outcome.unwrap_or_else(GroupOutcome::Failed),
        });
    }

    pub fn is_ready(&self) -> bool {
        self.groups.iter().all(|g| g.outcome.is_ready())
    }

    pub fn failures(&self) -> impl Iterator<Item = &GroupReport> {
        self.groups.iter().filter(|g| !g.outcome.is_ready())
    }
}

impl fmt::Display for DeploymentReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for group in &self.groups {
            let endpoints = group
                .endpoints
                .iter()
                .map(Endpoint::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            writeln!(f, "{} [{}]: {}", group.name, endpoints, group.outcome)?;
        }
        Ok(())
    }
}
