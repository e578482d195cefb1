//! # Address Block Enumeration
//!
//! Expands an IPv4 network block into the sequence of host addresses a
//! sweep should probe. Network and broadcast addresses are excluded for
//! any prefix wider than /31; a /31 keeps both addresses and a /32 its
//! single address.

use std::net::Ipv4Addr;

use pnet::ipnetwork::Ipv4Network;

/// Every usable host address of `network`, in ascending order.
pub fn usable_hosts(network: Ipv4Network) -> Vec<Ipv4Addr> {
    let base: u32 = network.network().into();
    let broadcast: u32 = network.broadcast().into();

    match network.prefix() {
        32 => vec![network.ip()],
        31 => vec![Ipv4Addr::from(base), Ipv4Addr::from(broadcast)],
        _ => (base + 1..broadcast).map(Ipv4Addr::from).collect(),
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
