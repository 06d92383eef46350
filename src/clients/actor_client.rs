use crate::framework::{ActorEntity, FrameworkError, ResourceClient};
use async_trait::async_trait;

/// Read operation shared by every typed client wrapper.
#[async_trait]
pub trait ActorClient<T: ActorEntity>: Send + Sync {
    /// The client-specific error type.
    type Error: Send + Sync;

    /// Access the inner generic ResourceClient.
    fn inner(&self) -> &ResourceClient<T>;

    /// Map framework errors to the client-specific error type.
    fn map_error(e: FrameworkError) -> Self::Error;

    /// Every entity in creation order.
    async fn list(&self) -> Result<Vec<T>, Self::Error> {
        self.inner().list().await.map_err(Self::map_error)
    }
}
