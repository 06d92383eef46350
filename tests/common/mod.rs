#![allow(dead_code)]

use async_trait::async_trait;
use mlaunch::admin::{AdminCommand, AdminConnector, AdminError};
use mlaunch::config::Binaries;
use mlaunch::launcher::{DaemonCommand, DaemonSpawner};
use mlaunch::model::{Endpoint, ProcessDescriptor, ReplicaSetConfig};
use mlaunch::readiness::PollSettings;
use mlaunch::LaunchError;
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::net::TcpListener;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub fn fast_poll() -> PollSettings {
    PollSettings {
        interval: Duration::from_millis(50),
        timeout: Duration::from_millis(600),
    }
}

static NEXT_RANGE: AtomicU32 = AtomicU32::new(0);

/// First port of `len` consecutive ports that are currently free. Each call
/// in a test binary starts its search in a different region.
pub fn free_port_range(len: u16) -> u16 {
    let region = 21000 + (std::process::id() % 50) * 300;
    loop {
        let base = region + NEXT_RANGE.fetch_add(u32::from(len) + 5, Ordering::SeqCst) % 20000;
        let base = u16::try_from(base).expect("port region fits in u16");
        let all_free = (base..base + len).all(|p| TcpListener::bind(("127.0.0.1", p)).is_ok());
        if all_free {
            return base;
        }
    }
}

/// What the fake spawner was asked to start.
#[derive(Clone, Debug)]
pub struct Launch {
    pub process: ProcessDescriptor,
    pub command: String,
}

/// Stands in for `mongod --fork`: binds a loopback listener on the process
/// port so readiness polling succeeds, unless told otherwise.
#[derive(Clone, Default)]
pub struct FakeSpawner {
    pub launches: Arc<Mutex<Vec<Launch>>>,
    listeners: Arc<Mutex<HashMap<u16, TcpListener>>>,
    /// Processes that "start" but never open their port.
    pub silent: Arc<HashSet<String>>,
    /// Processes whose launch fails outright.
    pub broken: Arc<HashSet<String>>,
}

impl FakeSpawner {
    pub fn with_silent(ids: &[&str]) -> Self {
        Self {
            silent: Arc::new(ids.iter().map(|s| s.to_string()).collect()),
            ..Self::default()
        }
    }

    pub fn with_broken(ids: &[&str]) -> Self {
        Self {
            broken: Arc::new(ids.iter().map(|s| s.to_string()).collect()),
            ..Self::default()
        }
    }

    pub fn launched_ids(&self) -> Vec<String> {
        self.launches.lock().unwrap().iter().map(|l| l.process.id.clone()).collect()
    }

    pub fn launched_ports(&self) -> Vec<u16> {
        self.launches.lock().unwrap().iter().map(|l| l.process.endpoint.port).collect()
    }

    pub fn command_for(&self, id: &str) -> Option<String> {
        self.launches
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.process.id == id)
            .map(|l| l.command.clone())
    }
}

#[async_trait]
impl DaemonSpawner for FakeSpawner {
    async fn launch(&self, process: &ProcessDescriptor) -> Result<(), LaunchError> {
        self.launches.lock().unwrap().push(Launch {
            process: process.clone(),
            command: DaemonCommand::for_process(process, &Binaries::default()).to_string(),
        });
        if self.broken.contains(&process.id) {
            return Err(LaunchError::Spawn {
                process: process.id.clone(),
                endpoint: process.endpoint.clone(),
                reason: "exited with exit status: 1".into(),
            });
        }
        if self.silent.contains(&process.id) {
            return Ok(());
        }
        let port = process.endpoint.port;
        let mut listeners = self.listeners.lock().unwrap();
        if !listeners.contains_key(&port) {
            let listener = TcpListener::bind(("127.0.0.1", port)).map_err(|e| LaunchError::Spawn {
                process: process.id.clone(),
                endpoint: process.endpoint.clone(),
                reason: e.to_string(),
            })?;
            listeners.insert(port, listener);
        }
        Ok(())
    }
}

/// Behaves like a set of replica-set seeds: `replSetGetStatus` fails with
/// "not yet initialized" until `replSetInitiate` has been received.
#[derive(Clone, Default)]
pub struct FakeAdmin {
    pub calls: Arc<Mutex<Vec<(Endpoint, &'static str)>>>,
    pub configs: Arc<Mutex<HashMap<Endpoint, ReplicaSetConfig>>>,
}

impl FakeAdmin {
    pub fn initiate_calls(&self) -> Vec<Endpoint> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, name)| *name == "replSetInitiate")
            .map(|(endpoint, _)| endpoint.clone())
            .collect()
    }
}

#[async_trait]
impl AdminConnector for FakeAdmin {
    async fn run_command(&self, endpoint: &Endpoint, command: AdminCommand) -> Result<Value, AdminError> {
        self.calls.lock().unwrap().push((endpoint.clone(), command.name()));
        let mut configs = self.configs.lock().unwrap();
        match command {
            AdminCommand::ReplSetGetStatus => match configs.get(endpoint) {
                Some(config) => Ok(json!({"ok": 1, "set": config.name})),
                None => Err(AdminError::NotYetInitialized),
            },
            AdminCommand::ReplSetInitiate(config) => {
                configs.insert(endpoint.clone(), config);
                Ok(json!({"ok": 1}))
            }
        }
    }
}
