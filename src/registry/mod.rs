//! The process registry: a single actor that owns every [`ProcessDescriptor`]
//! of one invocation and serializes their liveness transitions.

pub mod entity;
pub mod error;

pub use error::*;

use crate::clients::ProcessClient;
use crate::framework::ResourceActor;
use crate::model::ProcessDescriptor;

/// Creates the registry actor and its client.
pub fn new() -> (ResourceActor<ProcessDescriptor>, ProcessClient) {
    let (actor, generic_client) = ResourceActor::new(64);
    (actor, ProcessClient::new(generic_client))
}
