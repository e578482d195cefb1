pub mod info;
pub mod sweep;

use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use pnet::ipnetwork::Ipv4Network;
use sweepr_core::SweepOptions;
use sweepr_core::pool::{
    DEFAULT_COMMAND_TIMEOUT, DEFAULT_CONCURRENCY, DEFAULT_CONNECT_TIMEOUT, DEFAULT_SSH_PORT,
};

#[derive(Parser)]
#[command(name = "sweepr")]
#[command(about = "Finds SSH-connectable devices on a local subnet.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Reduce output; repeat for results only
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub quiet: u8,

    /// Skip the startup banner
    #[arg(long, global = true)]
    pub no_banner: bool,

    /// Disable the interactive interrupt handler (q / Ctrl-C)
    #[arg(long, global = true)]
    pub no_input: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show viable local interfaces and their networks
    #[command(alias = "i")]
    Info,
    /// Probe a subnet for devices accepting one SSH credential
    #[command(alias = "s")]
    Sweep(SweepArgs),
}

#[derive(Args)]
pub struct SweepArgs {
    /// Interface to sweep from; prompted interactively when omitted
    #[arg(short, long)]
    pub interface: Option<String>,

    /// Target block in CIDR notation, overriding the interface's network
    #[arg(short, long)]
    pub network: Option<Ipv4Network>,

    /// SSH username; prompted when omitted
    #[arg(short, long)]
    pub username: Option<String>,

    /// SSH password; prompted (hidden) when omitted
    #[arg(short, long)]
    pub password: Option<String>,

    /// SSH port to probe on every host
    #[arg(long, default_value_t = DEFAULT_SSH_PORT)]
    pub port: u16,

    /// Maximum probes in flight at once
    #[arg(short, long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Connect and authentication timeout per host, in milliseconds
    #[arg(long, default_value_t = DEFAULT_CONNECT_TIMEOUT.as_millis() as u64)]
    pub connect_timeout_ms: u64,

    /// Hostname-command timeout per host, in milliseconds
    #[arg(long, default_value_t = DEFAULT_COMMAND_TIMEOUT.as_millis() as u64)]
    pub command_timeout_ms: u64,
}

impl SweepArgs {
    pub fn options(&self) -> SweepOptions {
        SweepOptions {
            port: self.port,
            concurrency: self.concurrency,
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            command_timeout: Duration::from_millis(self.command_timeout_ms),
        }
    }
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
