//! Pure derivation of a launch plan from a [`TopologyRequest`].
//!
//! Ports are handed out from one increasing cursor in a fixed order: each
//! shard in turn (data nodes, then arbiter), then config servers, then the
//! router. The same request always produces the same plan.

use crate::error::LaunchError;
use crate::model::{
    ConfigServers, Endpoint, MemberCounts, Mode, ProcessDescriptor, ReplicaSetConfig, Role,
    ShardMode, ShardedSpec, TopologyRequest, ROUTER_ID, STANDALONE_ID,
};
use crate::topology::layout::Layout;
use std::collections::HashSet;

/// Hands out consecutive ports and refuses to run past 65535.
#[derive(Debug)]
pub struct PortCursor {
    next: u32,
}

impl PortCursor {
    pub fn new(start: u16) -> Self {
        Self {
            next: u32::from(start),
        }
    }

    pub fn take(&mut self, owner: &str) -> Result<u16, LaunchError> {
        let port = u16::try_from(self.next).map_err(|_| {
            LaunchError::Configuration(format!("port range exhausted before {owner}"))
        })?;
        self.next += 1;
        Ok(port)
    }

    /// The first port not handed out. May be 65536 once the range is used up.
    pub fn peek(&self) -> u32 {
        self.next
    }
}

/// Members of one replica set in registration order: data nodes, then arbiter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplicaSetPlan {
    pub name: String,
    pub members: Vec<ProcessDescriptor>,
}

impl ReplicaSetPlan {
    fn derive(
        layout: &Layout,
        cursor: &mut PortCursor,
        name: &str,
        counts: MemberCounts,
    ) -> Result<Self, LaunchError> {
        let mut members = Vec::with_capacity(counts.width());
        for k in 1..=counts.nodes() {
            let id = format!("{name}/rs{k}");
            let port = cursor.take(&id)?;
            members.push(ProcessDescriptor::new(
                id.clone(),
                Role::DataNode,
                layout.paths(Some(id.as_str())),
                Endpoint::local(port),
                Some(name.to_string()),
            ));
        }
        if counts.arbiter() {
            let id = format!("{name}/arb");
            let port = cursor.take(&id)?;
            members.push(ProcessDescriptor::new(
                id.clone(),
                Role::Arbiter,
                layout.paths(Some(id.as_str())),
                Endpoint::local(port),
                Some(name.to_string()),
            ));
        }
        Ok(Self {
            name: name.to_string(),
            members,
        })
    }

    /// The first data node, used for status checks and initiation.
    pub fn seed(&self) -> &ProcessDescriptor {
        &self.members[0]
    }

    /// The initiate document, built in member registration order.
    pub fn config(&self) -> ReplicaSetConfig {
        let mut config = ReplicaSetConfig::new(&self.name);
        for member in &self.members {
            config.add_member(&member.endpoint, member.role == Role::Arbiter);
        }
        config
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShardPlan {
    Single {
        name: String,
        node: ProcessDescriptor,
    },
    ReplicaSet(ReplicaSetPlan),
}

impl ShardPlan {
    pub fn name(&self) -> &str {
        match self {
            ShardPlan::Single { name, .. } => name,
            ShardPlan::ReplicaSet(set) => &set.name,
        }
    }

    pub fn processes(&self) -> Vec<&ProcessDescriptor> {
        match self {
            ShardPlan::Single { node, .. } => vec![node],
            ShardPlan::ReplicaSet(set) => set.members.iter().collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShardedPlan {
    pub shards: Vec<ShardPlan>,
    pub config_servers: Vec<ProcessDescriptor>,
    pub router: ProcessDescriptor,
}

impl ShardedPlan {
    fn derive(
        layout: &Layout,
        cursor: &mut PortCursor,
        spec: &ShardedSpec,
    ) -> Result<Self, LaunchError> {
        let mut shards = Vec::with_capacity(spec.shards.len());
        for name in &spec.shards {
            let shard = match spec.shard_mode {
                ShardMode::Single => ShardPlan::Single {
                    name: name.clone(),
                    node: ProcessDescriptor::new(
                        name.clone(),
                        Role::DataNode,
                        layout.paths(Some(name.as_str())),
                        Endpoint::local(cursor.take(name)?),
                        None,
                    ),
                },
                ShardMode::ReplicaSet(counts) => {
                    ShardPlan::ReplicaSet(ReplicaSetPlan::derive(layout, cursor, name, counts)?)
                }
            };
            shards.push(shard);
        }

        let config_servers = config_servers(layout, cursor, spec.config_servers)?;
        let config_db = config_connection_string(&config_servers);
        let router = ProcessDescriptor::new(
            ROUTER_ID,
            Role::Router { config_db },
            layout.router_paths(),
            Endpoint::local(cursor.take(ROUTER_ID)?),
            None,
        );

        Ok(Self {
            shards,
            config_servers,
            router,
        })
    }
}

fn config_servers(
    layout: &Layout,
    cursor: &mut PortCursor,
    count: ConfigServers,
) -> Result<Vec<ProcessDescriptor>, LaunchError> {
    count
        .names()
        .into_iter()
        .map(|name| {
            let port = cursor.take(&name)?;
            Ok(ProcessDescriptor::new(
                name.clone(),
                Role::ConfigServer,
                layout.paths(Some(name.as_str())),
                Endpoint::local(port),
                None,
            ))
        })
        .collect()
}

/// `host:port` of each config server in launch order, comma separated.
pub fn config_connection_string(config_servers: &[ProcessDescriptor]) -> String {
    config_servers
        .iter()
        .map(|p| p.endpoint.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlannedTopology {
    Single(ProcessDescriptor),
    ReplicaSet(ReplicaSetPlan),
    Sharded(ShardedPlan),
}

/// Everything needed to launch one topology.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TopologyPlan {
    pub topology: PlannedTopology,
    /// First port left unused by this plan.
    pub next_port: u32,
}

impl TopologyPlan {
    pub fn derive(request: &TopologyRequest) -> Result<Self, LaunchError> {
        let layout = Layout::new(&request.base_dir);
        let mut cursor = PortCursor::new(request.start_port);

        let topology = match &request.mode {
            Mode::Single => PlannedTopology::Single(ProcessDescriptor::new(
                STANDALONE_ID,
                Role::DataNode,
                layout.paths(None),
                Endpoint::local(cursor.take(STANDALONE_ID)?),
                None,
            )),
            Mode::ReplicaSet(spec) => PlannedTopology::ReplicaSet(ReplicaSetPlan::derive(
                &layout,
                &mut cursor,
                &spec.name,
                spec.members,
            )?),
            Mode::Sharded(spec) => {
                PlannedTopology::Sharded(ShardedPlan::derive(&layout, &mut cursor, spec)?)
            }
        };

        let plan = Self {
            topology,
            next_port: cursor.peek(),
        };
        plan.check_distinct()?;
        Ok(plan)
    }

    /// No two processes may share a registry id or a storage directory.
    fn check_distinct(&self) -> Result<(), LaunchError> {
        let mut ids = HashSet::new();
        let mut dirs = HashSet::new();
        for process in self.processes() {
            if !ids.insert(process.id.as_str()) {
                return Err(LaunchError::Configuration(format!(
                    "process id {} planned twice",
                    process.id
                )));
            }
            if let Some(db) = &process.paths.db_path {
                if !dirs.insert(db) {
                    return Err(LaunchError::Configuration(format!(
                        "storage directory {} planned twice",
                        db.display()
                    )));
                }
            }
        }
        Ok(())
    }

    /// Every process in port-allocation order.
    pub fn processes(&self) -> Vec<&ProcessDescriptor> {
        match &self.topology {
            PlannedTopology::Single(node) => vec![node],
            PlannedTopology::ReplicaSet(set) => set.members.iter().collect(),
            PlannedTopology::Sharded(plan) => plan
                .shards
                .iter()
                .flat_map(ShardPlan::processes)
                .chain(plan.config_servers.iter())
                .chain(std::iter::once(&plan.router))
                .collect(),
        }
    }

    /// Where an interactive client should connect: the standalone node, the
    /// replica-set seed, or the router.
    pub fn entry_point(&self) -> &Endpoint {
        match &self.topology {
            PlannedTopology::Single(node) => &node.endpoint,
            PlannedTopology::ReplicaSet(set) => &set.seed().endpoint,
            PlannedTopology::Sharded(plan) => &plan.router.endpoint,
        }
    }
}
