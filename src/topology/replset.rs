//! The initiate-or-skip handshake for one replica set.
//!
//! Once every member is reachable the seed is asked for its replica-set
//! status. A configured set is left alone; a set that reports "not yet
//! initialized" is initiated with the full member document. Running this
//! twice against the same set therefore initiates it once.

use crate::admin::{AdminCommand, AdminConnector, AdminError};
use crate::error::LaunchError;
use crate::topology::plan::ReplicaSetPlan;
use tracing::{debug, info};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReplicaSetOutcome {
    Initiated,
    AlreadyConfigured,
}

pub async fn initiate_or_skip<A>(
    admin: &A,
    set: &ReplicaSetPlan,
) -> Result<ReplicaSetOutcome, LaunchError>
where
    A: AdminConnector + ?Sized,
{
    let seed = &set.seed().endpoint;
    let admin_error = |source: AdminError| LaunchError::Admin {
        replica_set: set.name.clone(),
        source,
    };

    match admin.run_command(seed, AdminCommand::ReplSetGetStatus).await {
        Ok(_) => {
            info!(replica_set = %set.name, %seed, "replica set already configured");
            Ok(ReplicaSetOutcome::AlreadyConfigured)
        }
        Err(AdminError::NotYetInitialized) => {
            let config = set.config();
            debug!(replica_set = %set.name, ?config, "initiating");
            admin
                .run_command(seed, AdminCommand::ReplSetInitiate(config))
                .await
                .map_err(admin_error)?;
            info!(replica_set = %set.name, %seed, "replica set configured");
            Ok(ReplicaSetOutcome::Initiated)
        }
        Err(source) => Err(admin_error(source)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Endpoint, MemberCounts, Mode, ReplicaSetConfig, ReplicaSetSpec, TopologyRequest};
    use crate::topology::plan::{PlannedTopology, TopologyPlan};
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::Mutex;

    /// Remembers every command and keeps the configuration it was given.
    #[derive(Default)]
    struct RecordingAdmin {
        calls: Mutex<Vec<(Endpoint, &'static str)>>,
        config: Mutex<Option<ReplicaSetConfig>>,
        status_error: Option<AdminError>,
    }

    #[async_trait]
    impl AdminConnector for RecordingAdmin {
        async fn run_command(&self, endpoint: &Endpoint, command: AdminCommand) -> Result<Value, AdminError> {
            self.calls.lock().unwrap().push((endpoint.clone(), command.name()));
            if let Some(e) = &self.status_error {
                return Err(e.clone());
            }
            let mut config = self.config.lock().unwrap();
            match command {
                AdminCommand::ReplSetGetStatus if config.is_some() => Ok(json!({"ok": 1})),
                AdminCommand::ReplSetGetStatus => Err(AdminError::NotYetInitialized),
                AdminCommand::ReplSetInitiate(doc) => {
                    *config = Some(doc);
                    Ok(json!({"ok": 1}))
                }
            }
        }
    }

    fn rs0() -> ReplicaSetPlan {
        let request = TopologyRequest {
            base_dir: "/tmp/x".into(),
            start_port: 20000,
            mode: Mode::ReplicaSet(
                ReplicaSetSpec::new("rs0", MemberCounts::new(3, true).unwrap()).unwrap(),
            ),
        };
        match TopologyPlan::derive(&request).unwrap().topology {
            PlannedTopology::ReplicaSet(set) => set,
            other => panic!("unexpected plan {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_initiates_once_then_skips() {
        let admin = RecordingAdmin::default();
        let set = rs0();

        assert_eq!(initiate_or_skip(&admin, &set).await.unwrap(), ReplicaSetOutcome::Initiated);
        assert_eq!(
            initiate_or_skip(&admin, &set).await.unwrap(),
            ReplicaSetOutcome::AlreadyConfigured
        );

        let calls = admin.calls.lock().unwrap().clone();
        let seed = Endpoint::local(20000);
        assert_eq!(
            calls,
            vec![
                (seed.clone(), "replSetGetStatus"),
                (seed.clone(), "replSetInitiate"),
                (seed, "replSetGetStatus"),
            ]
        );

        let config = admin.config.lock().unwrap().clone().unwrap();
        assert_eq!(config.name, "rs0");
        assert_eq!(config.members.len(), 4);
        assert!(config.members[3].arbiter_only);
        assert_eq!(config.members[3].host, "127.0.0.1:20003");
    }

    #[tokio::test]
    async fn test_other_status_failures_are_not_retried() {
        let admin = RecordingAdmin {
            status_error: Some(AdminError::CommandFailed {
                code: 76,
                message: "not running with --replSet".into(),
            }),
            ..RecordingAdmin::default()
        };
        let err = initiate_or_skip(&admin, &rs0()).await.unwrap_err();
        assert!(matches!(err, LaunchError::Admin { ref replica_set, .. } if replica_set == "rs0"));
        assert_eq!(admin.calls.lock().unwrap().len(), 1);
    }
}
