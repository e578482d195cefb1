//! Scripted probe doubles used by the engine tests.

use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use sweepr_core::{FailureReason, ProbeOutcome, Prober, SweepOptions, UNKNOWN_HOSTNAME};

pub fn addr(last_octet: u8) -> Ipv4Addr {
    Ipv4Addr::new(192, 168, 1, last_octet)
}

pub fn options(concurrency: usize, timeout_ms: u64) -> SweepOptions {
    SweepOptions {
        port: 22,
        concurrency,
        connect_timeout: Duration::from_millis(timeout_ms),
        command_timeout: Duration::from_millis(timeout_ms),
    }
}

/// What a simulated host does when probed.
#[derive(Debug, Clone)]
pub enum HostBehavior {
    /// Accepts the credential and reports this hostname.
    Accept(&'static str),
    /// Accepts the credential but the hostname command yields nothing.
    AcceptNameless,
    /// Refuses the connection after `latency`.
    Refuse { latency: Duration },
    /// Never answers; the probe runs into the pool's deadline.
    Hang,
}

/// A subnet in a box: fixed behavior per address, everything else
/// unreachable. Records every probed address and counts the failures the
/// prober itself produced.
pub struct ScriptedProber {
    hosts: HashMap<Ipv4Addr, HostBehavior>,
    pub probed: Mutex<Vec<Ipv4Addr>>,
    pub failures: AtomicUsize,
}

impl ScriptedProber {
    pub fn new(hosts: impl IntoIterator<Item = (Ipv4Addr, HostBehavior)>) -> Self {
        Self {
            hosts: hosts.into_iter().collect(),
            probed: Mutex::new(Vec::new()),
            failures: AtomicUsize::new(0),
        }
    }

    pub fn probed_addrs(&self) -> Vec<Ipv4Addr> {
        self.probed.lock().unwrap().clone()
    }

    fn fail(&self, addr: Ipv4Addr, reason: FailureReason) -> ProbeOutcome {
        self.failures.fetch_add(1, Ordering::SeqCst);
        ProbeOutcome::failure(addr, reason)
    }
}

#[async_trait]
impl Prober for ScriptedProber {
    async fn probe(&self, addr: Ipv4Addr) -> ProbeOutcome {
        self.probed.lock().unwrap().push(addr);

        match self.hosts.get(&addr).cloned() {
            Some(HostBehavior::Accept(hostname)) => ProbeOutcome::success(addr, hostname),
            Some(HostBehavior::AcceptNameless) => ProbeOutcome::success(addr, UNKNOWN_HOSTNAME),
            Some(HostBehavior::Refuse { latency }) => {
                tokio::time::sleep(latency).await;
                self.fail(addr, FailureReason::Refused)
            }
            Some(HostBehavior::Hang) => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                self.fail(addr, FailureReason::Timeout)
            }
            None => self.fail(addr, FailureReason::Unreachable),
        }
    }
}

/// Holds every probe for a fixed duration and records how many ran at
/// the same time.
pub struct OverlapProber {
    hold: Duration,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

impl OverlapProber {
    pub fn new(hold: Duration) -> Self {
        Self {
            hold,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl Prober for OverlapProber {
    async fn probe(&self, addr: Ipv4Addr) -> ProbeOutcome {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        tokio::time::sleep(self.hold).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        ProbeOutcome::failure(addr, FailureReason::Refused)
    }
}
