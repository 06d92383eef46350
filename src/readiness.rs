//! Readiness polling: a daemon is ready once it accepts TCP connections.
//!
//! Each wait is independent and owns nothing shared, so any number can run
//! at once. [`await_group`] fans one task out per endpoint and joins them all.

use crate::model::Endpoint;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::{sleep, timeout, Instant};
use tracing::{debug, trace, warn};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);
pub const DEFAULT_READY_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            timeout: DEFAULT_READY_TIMEOUT,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Readiness {
    Ready,
    TimedOut,
}

/// Retries a connection to `endpoint` until it succeeds or `settings.timeout`
/// has passed. Returns no later than `timeout + interval` after the call.
pub async fn await_ready(endpoint: &Endpoint, settings: PollSettings) -> Readiness {
    let deadline = Instant::now() + settings.timeout;
    let address = (endpoint.host.as_str(), endpoint.port);
    debug!(%endpoint, "waiting for process to accept connections");

    loop {
        let budget = settings
            .interval
            .min(deadline.saturating_duration_since(Instant::now()));
        match timeout(budget, TcpStream::connect(address)).await {
            Ok(Ok(_stream)) => {
                debug!(%endpoint, "ready");
                return Readiness::Ready;
            }
            Ok(Err(e)) => trace!(%endpoint, error = %e, "not reachable yet"),
            Err(_) => trace!(%endpoint, "connect attempt timed out"),
        }

        let now = Instant::now();
        if now >= deadline {
            warn!(%endpoint, timeout = ?settings.timeout, "gave up waiting");
            return Readiness::TimedOut;
        }
        sleep(settings.interval.min(deadline - now)).await;
    }
}

/// Waits for every endpoint concurrently and returns the outcomes in input
/// order. One slow member does not cancel the others.
pub async fn await_group(
    endpoints: &[Endpoint],
    settings: PollSettings,
) -> Vec<(Endpoint, Readiness)> {
    let handles: Vec<_> = endpoints
        .iter()
        .cloned()
        .map(|endpoint| {
            tokio::spawn(async move {
                let outcome = await_ready(&endpoint, settings).await;
                (endpoint, outcome)
            })
        })
        .collect();

    let mut outcomes = Vec::with_capacity(handles.len());
    for (handle, endpoint) in handles.into_iter().zip(endpoints) {
        match handle.await {
            Ok(outcome) => outcomes.push(outcome),
            Err(e) => {
                warn!(%endpoint, error = %e, "readiness task failed");
                outcomes.push((endpoint.clone(), Readiness::TimedOut));
            }
        }
    }
    outcomes
}
