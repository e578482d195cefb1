//! Interactive prompts for the sweep flow: interface selection and
//! credential entry. Prompts write straight to the terminal, before the
//! progress display exists.

use colored::*;
use console::Term;
use pnet::datalink::NetworkInterface;

use sweepr_common::network::credential::Credential;
use sweepr_common::network::interface::{self, NetworkInterfaceExt};
use sweepr_common::warn;

use crate::terminal::{colors, print};

/// Numbered interface menu; re-prompts until a valid index is entered.
pub fn select_interface() -> anyhow::Result<NetworkInterface> {
    let candidates = interface::candidates();
    anyhow::ensure!(
        !candidates.is_empty(),
        "no viable network interfaces detected"
    );

    print::print_status("Available interfaces:");
    for (idx, intf) in candidates.iter().enumerate() {
        let network = intf
            .primary_ipv4_net()
            .map(|net| format!("{}/{}", net.ip(), net.prefix()))
            .unwrap_or_else(|| "no IPv4".to_string());
        print::line(&format!(
            "  [{}] {} ({})",
            idx.to_string().color(colors::ACCENT),
            intf.name.as_str().color(colors::PRIMARY),
            network.color(colors::IPV4_ADDR)
        ));
    }

    let term = Term::stderr();
    loop {
        term.write_str("Select interface: ")?;
        let entry = term.read_line()?;
        match entry.trim().parse::<usize>() {
            Ok(choice) if choice < candidates.len() => return Ok(candidates[choice].clone()),
            _ => warn!("Invalid selection. Try again."),
        }
    }
}

/// Completes a credential from flags, prompting for whatever is missing.
/// The password prompt does not echo.
pub fn read_credential(
    username: Option<String>,
    password: Option<String>,
) -> anyhow::Result<Credential> {
    let term = Term::stderr();

    let username = match username {
        Some(username) => username,
        None => {
            term.write_str("SSH username (e.g. pi): ")?;
            let entry = term.read_line()?.trim().to_string();
            anyhow::ensure!(!entry.is_empty(), "username cannot be empty");
            entry
        }
    };

    let password = match password {
        Some(password) => password,
        None => {
            term.write_str("SSH password: ")?;
            term.read_secure_line()?
        }
    };

    Ok(Credential::new(username, password))
}
