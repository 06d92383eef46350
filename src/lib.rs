//! # mlaunch
//!
//! Stands up a local MongoDB deployment (a single node, a replica set, or a
//! sharded cluster of single nodes or replica sets plus config servers and a
//! router) from one topology description.
//!
//! ## Flow
//!
//! 1. [`cli`] turns arguments into an immutable [`model::TopologyRequest`].
//! 2. [`topology::plan`] derives ports, names and paths for every process.
//! 3. [`topology::Orchestrator`] creates directories, launches daemons through a
//!    [`launcher::DaemonSpawner`], waits for them with [`readiness`], and
//!    initiates replica sets through an [`admin::AdminConnector`].
//! 4. Every process descriptor lives in the [`registry`] actor, which enforces
//!    the `not-started → launched → ready | failed` lifecycle.
//!
//! ## Module Tour
//!
//! - [`framework`]: generic keyed actor and its client, plus a mock for tests.
//! - [`registry`], [`clients`]: the process registry built on it.
//! - [`lifecycle`]: [`lifecycle::Deployment`] wiring and tracing setup.
//! - [`model`]: plain data types.
//!
//! ```bash
//! RUST_LOG=debug mlaunch --replicaset --nodes 3 --arbiter --port 20000 /tmp/x
//! ```

pub mod admin;
pub mod cli;
pub mod clients;
pub mod config;
pub mod error;
pub mod framework;
pub mod launcher;
pub mod lifecycle;
pub mod model;
pub mod readiness;
pub mod registry;
pub mod topology;

pub use error::LaunchError;
