use colored::*;
use unicode_width::UnicodeWidthStr;

use sweepr_core::{Discovery, UNKNOWN_HOSTNAME};

use crate::terminal::colors;

const ADDR_COLUMN_WIDTH: usize = 16;
const RULE_WIDTH: usize = 30;

/// The report table: header, rule, one row per discovered device.
///
/// Rows are padded before coloring so the escape codes do not skew the
/// column width.
pub fn device_rows(devices: &[Discovery]) -> Vec<String> {
    let mut rows = Vec::with_capacity(devices.len() + 2);

    rows.push(format!(
        "{} {}",
        pad("IP", ADDR_COLUMN_WIDTH).color(colors::PRIMARY).bold(),
        "HOSTNAME".color(colors::PRIMARY).bold()
    ));
    rows.push(format!(
        "{}",
        "─".repeat(RULE_WIDTH).color(colors::SEPARATOR)
    ));

    for device in devices {
        let addr = pad(&device.addr.to_string(), ADDR_COLUMN_WIDTH).color(colors::IPV4_ADDR);
        let hostname = if device.hostname == UNKNOWN_HOSTNAME {
            device.hostname.as_str().dimmed()
        } else {
            device.hostname.as_str().color(colors::HOSTNAME)
        };
        rows.push(format!("{addr} {hostname}"));
    }

    rows
}

fn pad(text: &str, width: usize) -> String {
    let text_width = UnicodeWidthStr::width(text);
    format!("{}{}", text, " ".repeat(width.saturating_sub(text_width)))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
