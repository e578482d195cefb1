//! # Probe Pool
//!
//! The scheduler of the engine. It dispatches exactly one probe per
//! target address, keeps at most the configured ceiling in flight, and
//! waits for every dispatched probe to produce an outcome before
//! returning. A per-probe deadline backstops the transport timeouts so a
//! wedged attempt cannot stall the run past its own bound; worst-case
//! total runtime is roughly `(targets / ceiling) * deadline`.
//!
//! Per-address failures never leave the pool. The one error class
//! surfaced upward is a panicked probe task, which voids the totality
//! guarantee and fails the run loudly.

use std::net::Ipv4Addr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::Context;
use tokio::sync::Semaphore;
use tokio::time::timeout;
use tracing::trace;

use sweepr_common::network::credential::Credential;

use crate::collector::{ResultCollector, SweepProgress};
use crate::probe::{Discovery, FailureReason, ProbeOutcome, Prober, SshProber};

pub const DEFAULT_SSH_PORT: u16 = 22;
pub const DEFAULT_CONCURRENCY: usize = 50;
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_millis(3_000);
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_millis(2_000);

/// Slack on top of the combined transport timeouts before the pool
/// forcibly classifies an attempt as timed out.
const DEADLINE_GRACE: Duration = Duration::from_millis(500);

/// Tuning knobs for one sweep; the ceiling is independent of block size.
#[derive(Debug, Clone, Copy)]
pub struct SweepOptions {
    pub port: u16,
    pub concurrency: usize,
    pub connect_timeout: Duration,
    pub command_timeout: Duration,
}

impl Default for SweepOptions {
    fn default() -> Self {
        Self {
            port: DEFAULT_SSH_PORT,
            concurrency: DEFAULT_CONCURRENCY,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }
}

impl SweepOptions {
    /// Upper bound for a single probe, both phases included.
    pub fn probe_deadline(&self) -> Duration {
        self.connect_timeout + self.command_timeout + DEADLINE_GRACE
    }
}

/// Probes every target with the credential and returns the discoveries.
///
/// Entry point for callers; wires the production SSH prober into
/// [`run`].
pub async fn perform_sweep(
    targets: Vec<Ipv4Addr>,
    credential: Credential,
    options: SweepOptions,
    progress: Arc<SweepProgress>,
    cancel: Arc<AtomicBool>,
) -> anyhow::Result<Vec<Discovery>> {
    let prober = Arc::new(SshProber::new(
        credential,
        options.port,
        options.connect_timeout,
        options.command_timeout,
    ));
    run(prober, targets, &options, progress, cancel).await
}

/// Fans one probe per address out over the prober and collects the
/// successes in completion order.
///
/// Every address is dispatched exactly once; the call returns only after
/// each dispatched probe has produced its outcome. Setting `cancel`
/// abandons all not-yet-started probes; attempts already in flight run to
/// their own timeout bound so their connections are released.
pub async fn run(
    prober: Arc<dyn Prober>,
    targets: Vec<Ipv4Addr>,
    options: &SweepOptions,
    progress: Arc<SweepProgress>,
    cancel: Arc<AtomicBool>,
) -> anyhow::Result<Vec<Discovery>> {
    anyhow::ensure!(
        options.concurrency >= 1,
        "concurrency ceiling must be at least 1"
    );

    let semaphore = Arc::new(Semaphore::new(options.concurrency));
    let collector = Arc::new(ResultCollector::new());
    let deadline = options.probe_deadline();

    let mut handles = Vec::with_capacity(targets.len());
    for addr in targets {
        let prober = Arc::clone(&prober);
        let semaphore = Arc::clone(&semaphore);
        let collector = Arc::clone(&collector);
        let progress = Arc::clone(&progress);
        let cancel = Arc::clone(&cancel);

        handles.push(tokio::spawn(async move {
            // The semaphore is never closed; a failed acquire means the
            // runtime is tearing down.
            let Ok(_permit) = semaphore.acquire_owned().await else {
                return;
            };
            if cancel.load(Ordering::Relaxed) {
                return;
            }

            let outcome = match timeout(deadline, prober.probe(addr)).await {
                Ok(outcome) => outcome,
                Err(_elapsed) => ProbeOutcome::failure(addr, FailureReason::Timeout),
            };

            match outcome {
                ProbeOutcome::Success(discovery) => collector.append(discovery),
                ProbeOutcome::Failure { addr, reason } => {
                    trace!("probe {addr} discarded: {reason}");
                }
            }
            progress.mark_completed();
        }));
    }

    for handle in handles {
        handle.await.context("probe task panicked")?;
    }

    Ok(collector.drain())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
