use crate::config::Binaries;
use crate::error::LaunchError;
use crate::model::Endpoint;
use tokio::process::{Child, Command};
use tracing::info;

/// Starts an interactive client shell on `endpoint` with the terminal
/// attached. The caller decides whether to wait for it.
pub fn spawn_client_shell(binaries: &Binaries, endpoint: &Endpoint) -> Result<Child, LaunchError> {
    info!(%endpoint, shell = %binaries.shell.display(), "starting client shell");
    Command::new(&binaries.shell)
        .arg("--host")
        .arg(&endpoint.host)
        .arg("--port")
        .arg(endpoint.port.to_string())
        .spawn()
        .map_err(|e| LaunchError::Spawn {
            process: "shell".into(),
            endpoint: endpoint.clone(),
            reason: format!("cannot run {}: {e}", binaries.shell.display()),
        })
}
