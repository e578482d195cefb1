use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use anyhow::Context;
use colored::*;
use pnet::ipnetwork::Ipv4Network;
use tracing::info_span;
use tracing_indicatif::span_ext::IndicatifSpanExt;

use sweepr_common::config::Config;
use sweepr_common::network::credential::Credential;
use sweepr_common::network::interface::{self, NetworkInterfaceExt};
use sweepr_common::network::range;
use sweepr_common::{info, success, warn};
use sweepr_core::{Discovery, SweepProgress, perform_sweep};

use crate::commands::SweepArgs;
use crate::terminal::input::InputHandle;
use crate::terminal::{colors, format, print, progress, prompt};

pub async fn sweep(args: SweepArgs, cfg: &Config) -> anyhow::Result<()> {
    let network = resolve_network(&args)?;
    let credential = resolve_credential(&args)?;

    let targets = range::usable_hosts(network);
    anyhow::ensure!(
        !targets.is_empty(),
        "network {network} contains no usable host addresses"
    );

    info!(
        "Sweeping subnet {} ({} addresses, ceiling {})",
        network,
        targets.len(),
        args.concurrency
    );

    let cancel = Arc::new(AtomicBool::new(false));
    let mut interrupt = InputHandle::new();
    if !cfg.disable_input {
        interrupt.start(Arc::clone(&cancel));
    }

    let span = info_span!("sweep", indicatif.pb_show = true);
    span.pb_set_style(&progress::sweep_bar_style());
    span.pb_set_length(targets.len() as u64);

    let observer_span = span.clone();
    let progress = Arc::new(SweepProgress::with_observer(
        targets.len(),
        move |_done, _total| observer_span.pb_inc(1),
    ));

    let started = Instant::now();
    let found = {
        let _guard = span.enter();
        perform_sweep(
            targets,
            credential,
            args.options(),
            Arc::clone(&progress),
            Arc::clone(&cancel),
        )
        .await?
    };

    interrupt.stop();
    drop(progress);
    drop(span);

    if cancel.load(Ordering::Relaxed) {
        warn!("Sweep interrupted; showing what was found so far");
    }

    sweep_ends(found, started.elapsed(), cfg);
    Ok(())
}

fn resolve_network(args: &SweepArgs) -> anyhow::Result<Ipv4Network> {
    if let Some(network) = args.network {
        return Ok(network);
    }

    let intf = match &args.interface {
        Some(name) => interface::find_by_name(name)
            .with_context(|| format!("no viable interface named '{name}'"))?,
        None => prompt::select_interface()?,
    };

    intf.primary_ipv4_net()
        .with_context(|| format!("interface {} carries no IPv4 network", intf.name))
}

fn resolve_credential(args: &SweepArgs) -> anyhow::Result<Credential> {
    match (&args.username, &args.password) {
        (Some(username), Some(password)) => {
            Ok(Credential::new(username.clone(), password.clone()))
        }
        _ => prompt::read_credential(args.username.clone(), args.password.clone()),
    }
}

fn sweep_ends(mut found: Vec<Discovery>, total_time: Duration, cfg: &Config) {
    if found.is_empty() {
        print::header("zero devices detected", cfg.quiet);
        print::no_results();
        return;
    }

    if cfg.quiet > 0 {
        print::blank();
    }

    print::header("SSH-connectable devices", cfg.quiet);
    // Engine order is completion order; the report reads by address.
    found.sort_by_key(|device| device.addr);
    print_devices(&found);
    print_summary(found.len(), total_time, cfg);
}

fn print_devices(found: &[Discovery]) {
    for row in format::device_rows(found) {
        print::line(&row);
    }
}

fn print_summary(found: usize, total_time: Duration, cfg: &Config) {
    let unit: &str = if found == 1 { "device" } else { "devices" };
    let count: ColoredString = format!("{found} {unit}").bold().green();
    let elapsed: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    let output: ColoredString =
        format!("Sweep complete: {count} reachable in {elapsed}").color(colors::TEXT_DEFAULT);

    match cfg.quiet {
        0 => {
            print::fat_separator();
            print::centerln(&format!("{output}"));
        }
        _ => {
            print::blank();
            success!("{}", output);
        }
    }
}
