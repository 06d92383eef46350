//! Runtime settings that are not part of the topology itself.

use crate::readiness::PollSettings;
use std::path::PathBuf;

/// Executables started by the launcher.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Binaries {
    pub mongod: PathBuf,
    pub mongos: PathBuf,
    pub shell: PathBuf,
}

impl Default for Binaries {
    fn default() -> Self {
        Self {
            mongod: PathBuf::from("mongod"),
            mongos: PathBuf::from("mongos"),
            shell: PathBuf::from("mongosh"),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LaunchSettings {
    pub binaries: Binaries,
    pub poll: PollSettings,
    /// Let daemon output through to the terminal.
    pub verbose: bool,
}
