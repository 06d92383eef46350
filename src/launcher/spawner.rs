use crate::config::Binaries;
use crate::error::LaunchError;
use crate::launcher::DaemonCommand;
use crate::model::ProcessDescriptor;
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};

/// Starts one daemon. Success means the program ran and its fork handshake
/// exited 0; whether the daemon actually binds its port is checked later by
/// readiness polling.
#[async_trait]
pub trait DaemonSpawner: Send + Sync {
    async fn launch(&self, process: &ProcessDescriptor) -> Result<(), LaunchError>;
}

/// Runs the real `mongod`/`mongos` executables with `--fork`.
pub struct CommandSpawner {
    binaries: Binaries,
    verbose: bool,
}

impl CommandSpawner {
    pub fn new(binaries: Binaries, verbose: bool) -> Self {
        Self { binaries, verbose }
    }

    /// The daemon's stdout and stderr go to the terminal only when verbose.
    fn command(&self, daemon: &DaemonCommand) -> Command {
        let output = || {
            if self.verbose {
                Stdio::inherit()
            } else {
                Stdio::null()
            }
        };
        let mut command = Command::new(&daemon.program);
        command
            .args(&daemon.args)
            .stdin(Stdio::null())
            .stdout(output())
            .stderr(output());
        command
    }
}

#[async_trait]
impl DaemonSpawner for CommandSpawner {
    async fn launch(&self, process: &ProcessDescriptor) -> Result<(), LaunchError> {
        let command = DaemonCommand::for_process(process, &self.binaries);
        info!(process = %process.id, role = %process.role, endpoint = %process.endpoint, "launching");
        debug!(%command, "command");

        let status = self
            .command(&command)
            .status()
            .await
            .map_err(|e| LaunchError::Spawn {
                process: process.id.clone(),
                endpoint: process.endpoint.clone(),
                reason: format!("cannot run {}: {e}", command.program.display()),
            })?;

        if !status.success() {
            return Err(LaunchError::Spawn {
                process: process.id.clone(),
                endpoint: process.endpoint.clone(),
                reason: format!("{} exited with {status}", command.program.display()),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Endpoint, Role};
    use crate::topology::layout::Layout;
    use std::path::PathBuf;

    fn node() -> ProcessDescriptor {
        ProcessDescriptor::new(
            "mongod",
            Role::DataNode,
            Layout::new("/tmp/x").paths(None),
            Endpoint::local(30000),
            None,
        )
    }

    fn binaries(mongod: &str) -> Binaries {
        Binaries {
            mongod: PathBuf::from(mongod),
            ..Binaries::default()
        }
    }

    #[tokio::test]
    async fn test_missing_binary_is_spawn_error() {
        let spawner = CommandSpawner::new(binaries("/nonexistent/mongod"), false);
        let err = spawner.launch(&node()).await.unwrap_err();
        assert!(matches!(err, LaunchError::Spawn { ref process, .. } if process == "mongod"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_exit_status_decides_outcome() {
        assert!(CommandSpawner::new(binaries("true"), false)
            .launch(&node())
            .await
            .is_ok());
        let err = CommandSpawner::new(binaries("false"), false)
            .launch(&node())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("127.0.0.1:30000"));
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_quiet_spawner_discards_daemon_output() {
        let spawner = CommandSpawner::new(Binaries::default(), false);
        let check = DaemonCommand {
            program: PathBuf::from("sh"),
            args: vec![
                "-c".into(),
                r#"[ "$(readlink /proc/$$/fd/1)" = /dev/null ] && [ "$(readlink /proc/$$/fd/2)" = /dev/null ]"#.into(),
            ],
        };
        let status = spawner.command(&check).status().await.unwrap();
        assert!(status.success());
    }
}
