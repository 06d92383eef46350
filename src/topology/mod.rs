//! From a topology request to running, configured processes.
//!
//! - [`plan`] derives ports, names and paths without side effects
//! - [`layout`] owns the on-disk naming and creates directories
//! - [`orchestrator`] launches, waits and sequences groups
//! - [`replset`] performs the initiate-or-skip handshake
//! - [`report`] collects per-group outcomes

pub mod layout;
pub mod orchestrator;
pub mod plan;
pub mod replset;
pub mod report;

pub use layout::Layout;
pub use orchestrator::Orchestrator;
pub use plan::{PlannedTopology, ReplicaSetPlan, ShardPlan, ShardedPlan, TopologyPlan};
pub use replset::ReplicaSetOutcome;
pub use report::{DeploymentReport, GroupOutcome, GroupReport};
