//! Typed wrappers around [`ResourceClient`](crate::framework::ResourceClient).

pub mod actor_client;
pub mod process_client;

pub use actor_client::ActorClient;
pub use process_client::*;
