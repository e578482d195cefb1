use std::net::Ipv4Addr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use pnet::ipnetwork::Ipv4Network;
use sweepr_common::network::range;
use sweepr_core::pool;
use sweepr_core::{Discovery, Prober, SweepProgress, UNKNOWN_HOSTNAME};

use crate::support::{HostBehavior, OverlapProber, ScriptedProber, addr, options};

fn no_cancel() -> Arc<AtomicBool> {
    Arc::new(AtomicBool::new(false))
}

/// End to end over the seam: enumerate a real block, sweep it, find the
/// one host scripted to accept.
#[tokio::test]
async fn enumerated_block_flows_through_the_pool() -> anyhow::Result<()> {
    let network: Ipv4Network = "203.0.113.0/29".parse()?;
    let targets = range::usable_hosts(network);
    assert_eq!(targets.len(), 6);

    let lab = Ipv4Addr::new(203, 0, 113, 2);
    let prober = Arc::new(ScriptedProber::new([(lab, HostBehavior::Accept("lab-2"))]));
    let progress = Arc::new(SweepProgress::new(targets.len()));

    let found = pool::run(
        prober as Arc<dyn Prober>,
        targets,
        &options(3, 100),
        Arc::clone(&progress),
        no_cancel(),
    )
    .await?;

    assert_eq!(progress.completed(), 6);
    assert_eq!(
        found,
        vec![Discovery {
            addr: lab,
            hostname: "lab-2".to_string(),
        }]
    );
    Ok(())
}

/// One of each outcome class on a four-address block: only the two
/// accepting hosts may appear, the nameless one under the sentinel.
#[tokio::test]
async fn mixed_block_reports_only_accepting_hosts() {
    let prober = Arc::new(ScriptedProber::new([
        (addr(1), HostBehavior::Accept("node-a")),
        (
            addr(2),
            HostBehavior::Refuse {
                latency: Duration::ZERO,
            },
        ),
        (addr(3), HostBehavior::AcceptNameless),
        (addr(4), HostBehavior::Hang),
    ]));
    let targets: Vec<Ipv4Addr> = (1..=4).map(addr).collect();
    let progress = Arc::new(SweepProgress::new(targets.len()));

    let mut found = pool::run(
        Arc::clone(&prober) as Arc<dyn Prober>,
        targets,
        &options(4, 100),
        Arc::clone(&progress),
        no_cancel(),
    )
    .await
    .unwrap();

    assert_eq!(progress.completed(), 4, "every address must complete");

    found.sort_by_key(|device| device.addr);
    assert_eq!(
        found,
        vec![
            Discovery {
                addr: addr(1),
                hostname: "node-a".to_string(),
            },
            Discovery {
                addr: addr(3),
                hostname: UNKNOWN_HOSTNAME.to_string(),
            },
        ]
    );
}

#[tokio::test]
async fn every_address_is_probed_exactly_once() {
    // Every third address accepts, the rest are unreachable.
    let hosts = (1..=40)
        .filter(|n| n % 3 == 0)
        .map(|n| (addr(n), HostBehavior::Accept("node")));
    let prober = Arc::new(ScriptedProber::new(hosts));
    let targets: Vec<Ipv4Addr> = (1..=40).map(addr).collect();
    let progress = Arc::new(SweepProgress::new(targets.len()));

    let found = pool::run(
        Arc::clone(&prober) as Arc<dyn Prober>,
        targets.clone(),
        &options(7, 100),
        Arc::clone(&progress),
        no_cancel(),
    )
    .await
    .unwrap();

    // Dispatch totality: all 40 probed, none twice.
    let mut probed = prober.probed_addrs();
    probed.sort();
    let mut expected = targets;
    expected.sort();
    assert_eq!(probed, expected);

    // Outcome totality: successes and failures add up to the block size.
    let failures = prober.failures.load(Ordering::SeqCst);
    assert_eq!(found.len(), 13);
    assert_eq!(found.len() + failures, 40);
    assert_eq!(progress.completed(), 40);
}

#[tokio::test]
async fn no_address_appears_twice_in_the_result() {
    let hosts = (1..=30).map(|n| (addr(n), HostBehavior::Accept("node")));
    let prober = Arc::new(ScriptedProber::new(hosts));
    let targets: Vec<Ipv4Addr> = (1..=30).map(addr).collect();
    let progress = Arc::new(SweepProgress::new(targets.len()));

    let found = pool::run(
        prober as Arc<dyn Prober>,
        targets,
        &options(5, 100),
        progress,
        no_cancel(),
    )
    .await
    .unwrap();

    let mut addrs: Vec<Ipv4Addr> = found.iter().map(|device| device.addr).collect();
    addrs.sort();
    let before = addrs.len();
    addrs.dedup();
    assert_eq!(addrs.len(), before, "duplicate address in result");
    assert_eq!(before, 30);
}

#[tokio::test]
async fn hanging_probes_cannot_stall_the_run() {
    let hosts = (1..=6).map(|n| (addr(n), HostBehavior::Hang));
    let prober = Arc::new(ScriptedProber::new(hosts));
    let targets: Vec<Ipv4Addr> = (1..=6).map(addr).collect();
    let progress = Arc::new(SweepProgress::new(targets.len()));
    let opts = options(3, 100);

    let started = Instant::now();
    let found = pool::run(
        prober as Arc<dyn Prober>,
        targets,
        &opts,
        Arc::clone(&progress),
        no_cancel(),
    )
    .await
    .unwrap();

    assert!(found.is_empty());
    assert_eq!(progress.completed(), 6);
    // Two batches of three, each cut off at the per-probe deadline.
    let bound = opts.probe_deadline() * 2 + Duration::from_secs(2);
    assert!(
        started.elapsed() < bound,
        "run took {:?}, bound was {:?}",
        started.elapsed(),
        bound
    );
}

#[tokio::test]
async fn ceiling_of_one_runs_probes_strictly_serially() {
    let prober = Arc::new(OverlapProber::new(Duration::from_millis(20)));
    let targets: Vec<Ipv4Addr> = (1..=8).map(addr).collect();
    let progress = Arc::new(SweepProgress::new(targets.len()));

    let started = Instant::now();
    pool::run(
        Arc::clone(&prober) as Arc<dyn Prober>,
        targets,
        &options(1, 1_000),
        progress,
        no_cancel(),
    )
    .await
    .unwrap();

    assert_eq!(prober.max_in_flight.load(Ordering::SeqCst), 1);
    // Eight holds of 20ms cannot finish faster than their sum.
    assert!(started.elapsed() >= Duration::from_millis(8 * 20));
}

#[tokio::test]
async fn ceiling_of_two_bounds_the_wall_clock() {
    let hold = Duration::from_millis(200);
    let prober = Arc::new(OverlapProber::new(hold));
    let targets: Vec<Ipv4Addr> = (1..=10).map(addr).collect();
    let progress = Arc::new(SweepProgress::new(targets.len()));

    let started = Instant::now();
    pool::run(
        Arc::clone(&prober) as Arc<dyn Prober>,
        targets,
        &options(2, 1_000),
        progress,
        no_cancel(),
    )
    .await
    .unwrap();
    let elapsed = started.elapsed();

    assert!(prober.max_in_flight.load(Ordering::SeqCst) <= 2);
    // Ten probes at two in flight: five rounds, so ~5x one hold, well
    // short of the serial 10x.
    assert!(elapsed >= hold * 5, "finished too fast: {elapsed:?}");
    assert!(elapsed < hold * 8, "barely parallel: {elapsed:?}");
}

#[tokio::test]
async fn same_script_yields_the_same_success_set() {
    let script = || {
        ScriptedProber::new([
            (addr(1), HostBehavior::Accept("alpha")),
            (
                addr(2),
                HostBehavior::Refuse {
                    latency: Duration::from_millis(5),
                },
            ),
            (addr(3), HostBehavior::Accept("gamma")),
            (addr(5), HostBehavior::AcceptNameless),
        ])
    };
    let targets: Vec<Ipv4Addr> = (1..=6).map(addr).collect();

    let mut runs = Vec::new();
    for _ in 0..2 {
        let progress = Arc::new(SweepProgress::new(targets.len()));
        let mut found = pool::run(
            Arc::new(script()) as Arc<dyn Prober>,
            targets.clone(),
            &options(3, 100),
            progress,
            no_cancel(),
        )
        .await
        .unwrap();
        // Completion order may differ between runs; compare as sets.
        found.sort_by_key(|device| device.addr);
        runs.push(found);
    }

    assert_eq!(runs[0], runs[1]);
    assert_eq!(runs[0].len(), 3);
}

#[tokio::test]
async fn cancellation_abandons_pending_probes() {
    let hosts = (1..=20).map(|n| {
        (
            addr(n),
            HostBehavior::Refuse {
                latency: Duration::from_millis(50),
            },
        )
    });
    let prober = Arc::new(ScriptedProber::new(hosts));
    let targets: Vec<Ipv4Addr> = (1..=20).map(addr).collect();
    let progress = Arc::new(SweepProgress::new(targets.len()));
    let cancel = Arc::new(AtomicBool::new(false));

    let cancel_trigger = Arc::clone(&cancel);
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(120)).await;
        cancel_trigger.store(true, Ordering::Relaxed);
    });

    let result = pool::run(
        Arc::clone(&prober) as Arc<dyn Prober>,
        targets,
        &options(2, 1_000),
        Arc::clone(&progress),
        cancel,
    )
    .await
    .unwrap();

    // Serial pace is 50ms per pair; the flag lands mid-run and the rest
    // of the block is skipped.
    assert!(result.is_empty());
    assert!(
        progress.completed() < 20,
        "cancellation did not skip anything"
    );
    assert!(progress.completed() >= 2, "nothing ran before the flag");
}
