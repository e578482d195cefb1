use colored::*;

use sweepr_common::network::interface::{self, NetworkInterfaceExt};
use sweepr_common::network::range;
use sweepr_common::warn;

use crate::terminal::{colors, print};

type Detail = (String, ColoredString);

/// Lists the interfaces a sweep could be launched from, with the block
/// each would target.
pub fn info() -> anyhow::Result<()> {
    let candidates = interface::candidates();
    if candidates.is_empty() {
        warn!("No viable network interfaces detected");
        return Ok(());
    }

    for (idx, intf) in candidates.iter().enumerate() {
        print::tree_head(idx, &intf.name);

        let mut details: Vec<Detail> = Vec::new();
        if let Some(net) = intf.primary_ipv4_net() {
            details.push((
                "IPv4".to_string(),
                format!("{}/{}", net.ip(), net.prefix()).color(colors::IPV4_ADDR),
            ));
            details.push((
                "Hosts".to_string(),
                range::usable_hosts(net).len().to_string().normal(),
            ));
        }
        if let Some(mac) = intf.mac {
            details.push(("MAC".to_string(), mac.to_string().normal()));
        }
        print::as_tree_one_level(details);

        if idx + 1 != candidates.len() {
            print::blank();
        }
    }

    Ok(())
}
