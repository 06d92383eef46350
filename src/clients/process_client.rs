use crate::clients::actor_client::ActorClient;
use crate::framework::{FrameworkError, ResourceClient};
use crate::model::{ProcessDescriptor, ProcessId, Transition};
use crate::registry::RegistryError;
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Client for the process registry.
#[derive(Clone)]
pub struct ProcessClient {
    inner: ResourceClient<ProcessDescriptor>,
}

impl ProcessClient {
    pub fn new(inner: ResourceClient<ProcessDescriptor>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ActorClient<ProcessDescriptor> for ProcessClient {
    type Error = RegistryError;

    fn inner(&self) -> &ResourceClient<ProcessDescriptor> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        RegistryError::from(e)
    }
}

impl ProcessClient {
    #[instrument(skip_all, fields(process = %process.id))]
    pub async fn register(&self, process: ProcessDescriptor) -> Result<ProcessId, RegistryError> {
        debug!("Registering");
        Ok(self.inner.create(process).await?)
    }

    pub async fn mark_launched(&self, id: &ProcessId) -> Result<ProcessDescriptor, RegistryError> {
        self.transition(id, Transition::Launched).await
    }

    pub async fn mark_ready(&self, id: &ProcessId) -> Result<ProcessDescriptor, RegistryError> {
        self.transition(id, Transition::Ready).await
    }

    pub async fn mark_failed(
        &self,
        id: &ProcessId,
        reason: impl Into<String>,
    ) -> Result<ProcessDescriptor, RegistryError> {
        self.transition(id, Transition::Failed(reason.into())).await
    }

    #[instrument(skip(self))]
    async fn transition(
        &self,
        id: &ProcessId,
        transition: Transition,
    ) -> Result<ProcessDescriptor, RegistryError> {
        Ok(self.inner.update(id.clone(), transition).await?)
    }
}
