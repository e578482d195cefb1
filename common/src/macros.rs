//! Status macros used across the workspace.
//!
//! These wrap `tracing` events under crate-qualified targets so the CLI
//! formatter can render them with its symbol scheme while library crates
//! stay free of any terminal knowledge.

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::tracing::info!(target: "sweepr::status", $($arg)*)
    };
}

#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        $crate::tracing::info!(target: "sweepr::success", $($arg)*)
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::tracing::warn!(target: "sweepr::status", $($arg)*)
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::tracing::error!(target: "sweepr::status", $($arg)*)
    };
}
