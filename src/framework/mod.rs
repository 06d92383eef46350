//! Generic actor that owns a keyed set of entities.
//!
//! - [`ActorEntity`] - trait implemented by managed entity types
//! - [`ResourceActor`] - the task that owns the entities
//! - [`ResourceClient`] - cloneable handle used to talk to it
//! - [`FrameworkError`] - transport and lookup errors
//!
//! See [`mock`] for testing client wrappers without a running actor.

pub mod core;
pub mod mock;

pub use core::*;
