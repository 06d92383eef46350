//! Administrative commands against a running daemon.
//!
//! The orchestrator only needs to run a named command and tell "this replica
//! set is not configured yet" apart from every other failure. How the command
//! reaches the server is up to the [`AdminConnector`] implementation.

pub mod shell;

pub use shell::ShellAdmin;

use crate::model::{Endpoint, ReplicaSetConfig};
use async_trait::async_trait;
use serde_json::{json, Value};
use thiserror::Error;

/// Server error code for a member that has no replica-set configuration yet.
pub const NOT_YET_INITIALIZED: i64 = 94;

#[derive(Clone, Debug, PartialEq)]
pub enum AdminCommand {
    ReplSetGetStatus,
    ReplSetInitiate(ReplicaSetConfig),
}

impl AdminCommand {
    pub fn name(&self) -> &'static str {
        match self {
            AdminCommand::ReplSetGetStatus => "replSetGetStatus",
            AdminCommand::ReplSetInitiate(_) => "replSetInitiate",
        }
    }

    /// The command document as sent to the server.
    pub fn to_document(&self) -> Value {
        match self {
            AdminCommand::ReplSetGetStatus => json!({ "replSetGetStatus": 1 }),
            AdminCommand::ReplSetInitiate(config) => json!({ "replSetInitiate": config }),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum AdminError {
    #[error("cannot reach {endpoint}: {reason}")]
    Unreachable { endpoint: Endpoint, reason: String },

    /// The member is up but no replica-set configuration exists yet.
    #[error("replica set not yet initialized")]
    NotYetInitialized,

    #[error("command failed (code {code}): {message}")]
    CommandFailed { code: i64, message: String },

    #[error("malformed reply: {0}")]
    MalformedReply(String),
}

#[async_trait]
pub trait AdminConnector: Send + Sync {
    /// Runs `command` against the `admin` database on `endpoint` and returns
    /// the reply document of a successful command.
    async fn run_command(&self, endpoint: &Endpoint, command: AdminCommand)
        -> Result<Value, AdminError>;
}

/// Sorts a server reply into success, "not yet initialized", or failure.
pub fn classify_reply(reply: Value) -> Result<Value, AdminError> {
    let ok = match reply.get("ok") {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::Bool(b)) => f64::from(u8::from(*b)),
        _ => return Err(AdminError::MalformedReply(reply.to_string())),
    };
    if ok == 1.0 {
        return Ok(reply);
    }

    let code = reply.get("code").and_then(Value::as_i64).unwrap_or(0);
    let code_name = reply.get("codeName").and_then(Value::as_str).unwrap_or("");
    if code == NOT_YET_INITIALIZED || code_name == "NotYetInitialized" {
        return Err(AdminError::NotYetInitialized);
    }
    let message = reply
        .get("errmsg")
        .and_then(Value::as_str)
        .unwrap_or(code_name)
        .to_string();
    Err(AdminError::CommandFailed { code, message })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_documents() {
        assert_eq!(
            AdminCommand::ReplSetGetStatus.to_document(),
            json!({"replSetGetStatus": 1})
        );
        let mut config = ReplicaSetConfig::new("rs0");
        config.add_member(&Endpoint::local(20000), false);
        assert_eq!(
            AdminCommand::ReplSetInitiate(config).to_document(),
            json!({"replSetInitiate": {"_id": "rs0", "members": [{"_id": 0, "host": "127.0.0.1:20000"}]}})
        );
    }

    #[test]
    fn test_classify_success() {
        let reply = json!({"set": "rs0", "ok": 1.0});
        assert_eq!(classify_reply(reply.clone()), Ok(reply));
    }

    #[test]
    fn test_classify_not_initialized() {
        let reply = json!({"ok": 0, "errmsg": "no replset config has been received", "code": 94, "codeName": "NotYetInitialized"});
        assert_eq!(classify_reply(reply), Err(AdminError::NotYetInitialized));
    }

    #[test]
    fn test_classify_other_failure() {
        let reply = json!({"ok": 0, "errmsg": "not running with --replSet", "code": 76, "codeName": "NoReplicationEnabled"});
        assert_eq!(
            classify_reply(reply),
            Err(AdminError::CommandFailed {
                code: 76,
                message: "not running with --replSet".into()
            })
        );
    }

    #[test]
    fn test_classify_missing_ok() {
        assert!(matches!(
            classify_reply(json!({"hello": "world"})),
            Err(AdminError::MalformedReply(_))
        ));
    }
}
