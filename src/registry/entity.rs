//! [`ActorEntity`] implementation that lets the registry own [`ProcessDescriptor`]s.

use crate::framework::ActorEntity;
use crate::model::{Liveness, ProcessDescriptor, ProcessId, Transition};
use async_trait::async_trait;

#[async_trait]
impl ActorEntity for ProcessDescriptor {
    type Id = ProcessId;
    type CreateParams = ProcessDescriptor;
    type UpdateParams = Transition;
    type Context = ();

    fn id(&self) -> ProcessId {
        self.id.clone()
    }

    /// Only freshly planned descriptors may be registered.
    fn from_create_params(params: ProcessDescriptor) -> Result<Self, String> {
        if params.liveness != Liveness::NotStarted {
            return Err(format!(
                "{} registered in state {}",
                params.id, params.liveness
            ));
        }
        Ok(params)
    }

    async fn on_update(&mut self, transition: Transition, _ctx: &()) -> Result<(), String> {
        self.apply(transition)
    }
}
