//! [`AdminConnector`] that drives the client shell non-interactively.
//!
//! The command document is serialized to JSON and passed as one `--eval`
//! argument; the shell prints the reply as a single JSON line.

use crate::admin::{classify_reply, AdminCommand, AdminConnector, AdminError};
use crate::model::Endpoint;
use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

pub struct ShellAdmin {
    shell: PathBuf,
}

impl ShellAdmin {
    pub fn new(shell: impl Into<PathBuf>) -> Self {
        Self {
            shell: shell.into(),
        }
    }

    /// Script run by the shell. Newer shells throw on `ok: 0`, older ones
    /// return the reply; both end up printed as JSON.
    fn script(command: &AdminCommand) -> String {
        format!(
            "var r; try {{ r = db.adminCommand({}); }} catch (e) {{ \
             r = {{ ok: 0, code: e.code, codeName: e.codeName, errmsg: e.message }}; }} \
             print(JSON.stringify(r));",
            command.to_document()
        )
    }

    fn args(endpoint: &Endpoint, command: &AdminCommand) -> Vec<String> {
        vec![
            "--quiet".to_string(),
            "--host".to_string(),
            endpoint.host.clone(),
            "--port".to_string(),
            endpoint.port.to_string(),
            "--eval".to_string(),
            Self::script(command),
        ]
    }
}

/// Picks the last line of shell output that parses as a JSON object.
fn parse_reply(stdout: &str) -> Option<Value> {
    stdout
        .lines()
        .rev()
        .filter_map(|line| serde_json::from_str::<Value>(line.trim()).ok())
        .find(Value::is_object)
}

#[async_trait]
impl AdminConnector for ShellAdmin {
    async fn run_command(
        &self,
        endpoint: &Endpoint,
        command: AdminCommand,
    ) -> Result<Value, AdminError> {
        debug!(%endpoint, command = command.name(), "running admin command");
        let output = Command::new(&self.shell)
            .args(Self::args(endpoint, &command))
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| AdminError::Unreachable {
                endpoint: endpoint.clone(),
                reason: format!("cannot run {}: {e}", self.shell.display()),
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        match parse_reply(&stdout) {
            Some(reply) => classify_reply(reply),
            None if !output.status.success() => Err(AdminError::Unreachable {
                endpoint: endpoint.clone(),
                reason: format!(
                    "{} exited with {}: {}",
                    self.shell.display(),
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            }),
            None => Err(AdminError::MalformedReply(stdout.trim().to_string())),
        }
    }
}
