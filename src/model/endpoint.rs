use serde::{Deserialize, Serialize};
use std::fmt;

/// Every process is bound on the loopback interface.
pub const LOOPBACK: &str = "127.0.0.1";

/// A `host:port` pair identifying one daemon.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Endpoint on `127.0.0.1`.
    pub fn local(port: u16) -> Self {
        Self::new(LOOPBACK, port)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}
