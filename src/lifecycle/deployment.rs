use crate::admin::AdminConnector;
use crate::clients::{ActorClient, ProcessClient};
use crate::error::LaunchError;
use crate::launcher::DaemonSpawner;
use crate::model::{ProcessDescriptor, TopologyRequest};
use crate::readiness::PollSettings;
use crate::registry::RegistryError;
use crate::topology::{DeploymentReport, Orchestrator, TopologyPlan};
use tracing::{debug, error, info};

/// One launcher invocation: the process registry plus the orchestrator that
/// reports into it.
///
/// `Deployment` wires the pieces together:
/// - spawns the registry actor that owns every process descriptor
/// - hands the orchestrator its spawner, admin connector and registry client
/// - on [`shutdown`](Deployment::shutdown), closes the registry channel and
///   waits for the actor to finish
///
/// Launched daemons are not stopped by `shutdown`; they keep running in the
/// background.
///
/// # Example
///
/// ```ignore
/// let deployment = Deployment::new(spawner, admin, PollSettings::default());
/// let report = deployment.launch(&request).await?;
/// println!("{report}");
/// deployment.shutdown().await?;
/// ```
pub struct Deployment<S, A> {
    orchestrator: Orchestrator<S, A>,
    registry: ProcessClient,
    handle: tokio::task::JoinHandle<()>,
}

impl<S: DaemonSpawner, A: AdminConnector> Deployment<S, A> {
    pub fn new(spawner: S, admin: A, poll: PollSettings) -> Self {
        let (registry_actor, registry) = crate::registry::new();
        let handle = tokio::spawn(registry_actor.run(()));
        Self {
            orchestrator: Orchestrator::new(spawner, admin, registry.clone(), poll),
            registry,
            handle,
        }
    }

    /// Plans and launches the requested topology.
    ///
    /// An invalid request is returned as an error before anything starts;
    /// launch failures end up in the report.
    pub async fn launch(&self, request: &TopologyRequest) -> Result<DeploymentReport, LaunchError> {
        let plan = TopologyPlan::derive(request)?;
        info!(
            base_dir = %request.base_dir.display(),
            processes = plan.processes().len(),
            first_port = request.start_port,
            "plan derived"
        );
        debug!(?plan, "plan");
        Ok(self.orchestrator.run(&plan).await)
    }

    /// Every process registered so far, in launch order.
    pub async fn processes(&self) -> Result<Vec<ProcessDescriptor>, RegistryError> {
        self.registry.list().await
    }

    /// Closes the registry and waits for its actor to exit.
    pub async fn shutdown(self) -> Result<(), String> {
        drop(self.orchestrator);
        drop(self.registry);
        if let Err(e) = self.handle.await {
            error!("Registry task failed: {:?}", e);
            return Err(format!("Registry task failed: {:?}", e));
        }
        debug!("Registry closed");
        Ok(())
    }
}
