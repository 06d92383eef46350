//! Wiring for one launcher run, plus logging setup.

pub mod deployment;
pub mod tracing;

pub use deployment::Deployment;
