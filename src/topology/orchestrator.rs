//! Sequencing of launches for every topology kind.
//!
//! Within a group (the members of one replica set, the config servers) all
//! processes are launched first and then awaited in parallel. Groups run one
//! after another. The router only starts once every shard and config server
//! is ready, because it is given their addresses at startup.

use crate::admin::AdminConnector;
use crate::clients::ProcessClient;
use crate::error::LaunchError;
use crate::launcher::DaemonSpawner;
use crate::model::{Endpoint, ProcessDescriptor};
use crate::readiness::{await_group, PollSettings, Readiness};
use crate::topology::layout;
use crate::topology::plan::{PlannedTopology, ReplicaSetPlan, ShardPlan, ShardedPlan, TopologyPlan};
use crate::topology::replset::{initiate_or_skip, ReplicaSetOutcome};
use crate::topology::report::{DeploymentReport, GroupOutcome};
use tracing::{info, info_span, warn, Instrument};

const CONFIG_GROUP: &str = "config servers";
const ROUTER_GROUP: &str = "router";

pub struct Orchestrator<S, A> {
    spawner: S,
    admin: A,
    registry: ProcessClient,
    poll: PollSettings,
}

fn endpoints_of<'a>(processes: impl IntoIterator<Item = &'a ProcessDescriptor>) -> Vec<Endpoint> {
    processes.into_iter().map(|p| p.endpoint.clone()).collect()
}

impl<S: DaemonSpawner, A: AdminConnector> Orchestrator<S, A> {
    pub fn new(spawner: S, admin: A, registry: ProcessClient, poll: PollSettings) -> Self {
        Self {
            spawner,
            admin,
            registry,
            poll,
        }
    }

    /// Brings the whole plan up. Failures are collected per group in the
    /// report rather than returned, so one bad shard does not hide the rest.
    pub async fn run(&self, plan: &TopologyPlan) -> DeploymentReport {
        let mut report = DeploymentReport::new(plan.entry_point().clone());
        match &plan.topology {
            PlannedTopology::Single(node) => {
                let outcome = self.start_standalone(node).await;
                report.record(node.id.clone(), vec![node.endpoint.clone()], outcome);
            }
            PlannedTopology::ReplicaSet(set) => {
                let outcome = self.configure_replica_set(set).await.map(GroupOutcome::from);
                report.record(set.name.clone(), endpoints_of(&set.members), outcome);
            }
            PlannedTopology::Sharded(sharded) => self.run_sharded(sharded, &mut report).await,
        }
        report
    }

    async fn run_sharded(&self, plan: &ShardedPlan, report: &mut DeploymentReport) {
        for shard in &plan.shards {
            let span = info_span!("shard", name = shard.name());
            let outcome = async {
                match shard {
                    ShardPlan::Single { node, .. } => self.start_standalone(node).await,
                    ShardPlan::ReplicaSet(set) => {
                        self.configure_replica_set(set).await.map(GroupOutcome::from)
                    }
                }
            }
            .instrument(span)
            .await;
            if let Err(e) = &outcome {
                warn!(shard = shard.name(), error = %e, "shard failed");
            }
            report.record(shard.name(), endpoints_of(shard.processes()), outcome);
        }

        let configs: Vec<&ProcessDescriptor> = plan.config_servers.iter().collect();
        let outcome = self
            .start_group(CONFIG_GROUP, &configs)
            .instrument(info_span!("config"))
            .await
            .map(|()| GroupOutcome::Ready);
        report.record(CONFIG_GROUP, endpoints_of(configs), outcome);

        let router_endpoints = vec![plan.router.endpoint.clone()];
        if !report.is_ready() {
            let unready: Vec<&str> = report.failures().map(|g| g.name.as_str()).collect();
            let why = format!("not ready: {}", unready.join(", "));
            warn!(%why, "not starting router");
            report.record(ROUTER_GROUP, router_endpoints, Ok(GroupOutcome::Skipped(why)));
            return;
        }
        let outcome = self
            .start_group(ROUTER_GROUP, &[&plan.router])
            .instrument(info_span!("router"))
            .await
            .map(|()| GroupOutcome::Ready);
        report.record(ROUTER_GROUP, router_endpoints, outcome);
    }

    async fn start_standalone(&self, node: &ProcessDescriptor) -> Result<GroupOutcome, LaunchError> {
        self.start_group(&node.id, &[node]).await?;
        Ok(GroupOutcome::Ready)
    }

    /// Launches every member, waits for all of them, then initiates the set
    /// unless it is already configured. Nothing is initiated if any member
    /// failed to start or never became reachable.
    pub async fn configure_replica_set(
        &self,
        set: &ReplicaSetPlan,
    ) -> Result<ReplicaSetOutcome, LaunchError> {
        let members: Vec<&ProcessDescriptor> = set.members.iter().collect();
        self.start_group(&set.name, &members).await?;
        info!(replica_set = %set.name, "all members running");
        initiate_or_skip(&self.admin, set).await
    }

    /// Launches each process in order, stopping at the first spawn failure,
    /// then waits for all of them concurrently.
    async fn start_group(&self, group: &str, processes: &[&ProcessDescriptor]) -> Result<(), LaunchError> {
        for process in processes {
            self.launch(process).await?;
        }
        self.await_members(group, processes).await
    }

    async fn launch(&self, process: &ProcessDescriptor) -> Result<(), LaunchError> {
        self.registry.register(process.clone()).await?;
        let launched = match layout::ensure(&process.paths).await {
            Ok(()) => self.spawner.launch(process).await,
            Err(e) => Err(e),
        };
        match launched {
            Ok(()) => {
                self.registry.mark_launched(&process.id).await?;
                Ok(())
            }
            Err(e) => {
                warn!(process = %process.id, error = %e, "launch failed");
                self.registry.mark_failed(&process.id, e.to_string()).await?;
                Err(e)
            }
        }
    }

    async fn await_members(&self, group: &str, processes: &[&ProcessDescriptor]) -> Result<(), LaunchError> {
        let endpoints = endpoints_of(processes.iter().copied());
        info!(group, members = endpoints.len(), "waiting for processes to start up");

        let mut unready = Vec::new();
        for (process, (endpoint, readiness)) in processes.iter().zip(await_group(&endpoints, self.poll).await) {
            match readiness {
                Readiness::Ready => {
                    self.registry.mark_ready(&process.id).await?;
                }
                Readiness::TimedOut => {
                    let reason = format!("not reachable within {:?}", self.poll.timeout);
                    self.registry.mark_failed(&process.id, reason).await?;
                    unready.push(endpoint);
                }
            }
        }

        if unready.is_empty() {
            info!(group, "running");
            Ok(())
        } else {
            Err(LaunchError::ReadinessTimeout {
                group: group.to_string(),
                endpoints: unready,
            })
        }
    }
}
