//! # Interface Enumeration
//!
//! Lists the local network interfaces a sweep can be launched from and
//! derives the IPv4 block attached to each. The operator picks one of the
//! candidates; its network becomes the target address block.

use pnet::datalink::{self, NetworkInterface};
use pnet::ipnetwork::{IpNetwork, Ipv4Network};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum ViabilityError {
    /// The interface is operationally down.
    #[error("interface is down")]
    IsDown,
    /// Loopback cannot reach other hosts on the segment.
    #[error("interface is loopback")]
    IsLoopback,
    /// The interface carries no IPv4 network to derive a block from.
    #[error("interface has no IPv4 network")]
    NoIpv4,
}

/// Helpers over `pnet`'s interface model.
pub trait NetworkInterfaceExt {
    fn ipv4_nets(&self) -> Vec<Ipv4Network>;

    /// The first non-loopback IPv4 network attached to the interface.
    fn primary_ipv4_net(&self) -> Option<Ipv4Network>;
}

impl NetworkInterfaceExt for NetworkInterface {
    fn ipv4_nets(&self) -> Vec<Ipv4Network> {
        self.ips
            .iter()
            .filter_map(|ip| match ip {
                IpNetwork::V4(ipv4) => Some(*ipv4),
                IpNetwork::V6(_) => None,
            })
            .collect()
    }

    fn primary_ipv4_net(&self) -> Option<Ipv4Network> {
        self.ipv4_nets()
            .into_iter()
            .find(|net| !net.ip().is_loopback())
    }
}

/// Interfaces a sweep can be launched from, in enumeration order.
pub fn candidates() -> Vec<NetworkInterface> {
    filter_candidates(datalink::interfaces())
}

/// Finds a candidate interface by name.
pub fn find_by_name(name: &str) -> Option<NetworkInterface> {
    candidates().into_iter().find(|intf| intf.name == name)
}

fn filter_candidates(interfaces: Vec<NetworkInterface>) -> Vec<NetworkInterface> {
    interfaces
        .into_iter()
        .filter(|intf| is_viable_sweep_interface(intf).is_ok())
        .collect()
}

fn is_viable_sweep_interface(interface: &NetworkInterface) -> Result<(), ViabilityError> {
    if !interface.is_up() {
        return Err(ViabilityError::IsDown);
    }
    if interface.is_loopback() {
        return Err(ViabilityError::IsLoopback);
    }
    if interface.primary_ipv4_net().is_none() {
        return Err(ViabilityError::NoIpv4);
    }

    Ok(())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
