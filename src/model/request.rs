//! The immutable topology request threaded through planning and launch.
//!
//! Each mode carries only the options that make sense for it, so a request
//! such as "arbiter on a single node" cannot be expressed.

use crate::error::LaunchError;
use std::collections::HashSet;
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 27017;
pub const DEFAULT_NODES: usize = 3;
pub const DEFAULT_SET_NAME: &str = "default";
/// Process id of a stand-alone node.
pub const STANDALONE_ID: &str = "mongod";
/// Process id of the sharded-cluster router.
pub const ROUTER_ID: &str = "mongos";
/// More shards than ports could never be planned.
const MAX_SHARDS: usize = u16::MAX as usize;

/// What to launch, where, and from which port on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TopologyRequest {
    pub base_dir: PathBuf,
    pub start_port: u16,
    pub mode: Mode,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    Single,
    ReplicaSet(ReplicaSetSpec),
    Sharded(ShardedSpec),
}

/// Data-node count plus optional arbiter for one replica set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemberCounts {
    nodes: usize,
    arbiter: bool,
}

impl MemberCounts {
    pub fn new(nodes: usize, arbiter: bool) -> Result<Self, LaunchError> {
        if nodes == 0 {
            return Err(LaunchError::Configuration(
                "a replica set needs at least one data node".into(),
            ));
        }
        Ok(Self { nodes, arbiter })
    }

    pub fn nodes(&self) -> usize {
        self.nodes
    }

    pub fn arbiter(&self) -> bool {
        self.arbiter
    }

    /// Ports consumed by one set.
    pub fn width(&self) -> usize {
        self.nodes + usize::from(self.arbiter)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplicaSetSpec {
    pub name: String,
    pub members: MemberCounts,
}

impl ReplicaSetSpec {
    pub fn new(name: impl Into<String>, members: MemberCounts) -> Result<Self, LaunchError> {
        let name = name.into();
        validate_name("replica set", &name)?;
        Ok(Self { name, members })
    }
}

/// Number of config servers in a sharded cluster.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigServers {
    One,
    Three,
}

impl ConfigServers {
    pub fn from_count(count: u8) -> Result<Self, LaunchError> {
        match count {
            1 => Ok(ConfigServers::One),
            3 => Ok(ConfigServers::Three),
            n => Err(LaunchError::Configuration(format!(
                "config server count must be 1 or 3, got {n}"
            ))),
        }
    }

    /// Directory/process names: `config`, or `config1`..`config3`.
    pub fn names(&self) -> Vec<String> {
        match self {
            ConfigServers::One => vec!["config".to_string()],
            ConfigServers::Three => (1..=3).map(|k| format!("config{k}")).collect(),
        }
    }
}

/// How each shard is deployed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShardMode {
    Single,
    ReplicaSet(MemberCounts),
}

impl ShardMode {
    pub fn width(&self) -> usize {
        match self {
            ShardMode::Single => 1,
            ShardMode::ReplicaSet(members) => members.width(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShardedSpec {
    pub shards: Vec<String>,
    pub config_servers: ConfigServers,
    pub shard_mode: ShardMode,
}

impl ShardedSpec {
    pub fn new(
        shards: Vec<String>,
        config_servers: ConfigServers,
        shard_mode: ShardMode,
    ) -> Result<Self, LaunchError> {
        if shards.is_empty() {
            return Err(LaunchError::Configuration(
                "a sharded cluster needs at least one shard".into(),
            ));
        }
        let mut seen = HashSet::new();
        for shard in &shards {
            validate_name("shard", shard)?;
            if is_reserved(shard) {
                return Err(LaunchError::Configuration(format!(
                    "shard name {shard} is reserved for the cluster's own processes"
                )));
            }
            if !seen.insert(shard.as_str()) {
                return Err(LaunchError::Configuration(format!(
                    "shard name {shard} given twice"
                )));
            }
        }
        Ok(Self {
            shards,
            config_servers,
            shard_mode,
        })
    }
}

/// Turns the `--sharded` values into shard names.
///
/// A single numeric value is a count and yields `shard01`, `shard02`, ...;
/// anything else is taken as the list of names.
pub fn shard_names(values: &[String]) -> Result<Vec<String>, LaunchError> {
    if let [only] = values {
        if let Ok(count) = only.parse::<usize>() {
            if count == 0 {
                return Err(LaunchError::Configuration(
                    "shard count must be at least 1".into(),
                ));
            }
            if count > MAX_SHARDS {
                return Err(LaunchError::Configuration(format!(
                    "shard count {count} exceeds the {MAX_SHARDS} available ports"
                )));
            }
            return Ok((1..=count).map(|i| format!("shard{i:02}")).collect());
        }
    }
    Ok(values.to_vec())
}

/// Config-server and router ids share the shard namespace on disk and in
/// the registry.
fn is_reserved(name: &str) -> bool {
    name == ROUTER_ID
        || [ConfigServers::One, ConfigServers::Three]
            .iter()
            .any(|c| c.names().iter().any(|n| n == name))
}

fn validate_name(kind: &str, name: &str) -> Result<(), LaunchError> {
    if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(LaunchError::Configuration(format!(
            "invalid {kind} name {name:?}"
        )));
    }
    Ok(())
}
