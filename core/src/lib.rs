//! # Sweep Engine
//!
//! The concurrent SSH probing engine behind `sweepr`. Given an enumerated
//! address block and one credential pair, it fans authenticated probe
//! attempts out under a bounded concurrency ceiling, classifies every
//! failure, and collects the successes in completion order while a shared
//! progress counter drives the live display.
//!
//! The engine never touches a terminal; the CLI crate owns all
//! interaction and rendering.

pub mod collector;
pub mod pool;
pub mod probe;

pub use collector::{ResultCollector, SweepProgress};
pub use pool::{SweepOptions, perform_sweep};
pub use probe::{Discovery, FailureReason, ProbeOutcome, Prober, SshProber, UNKNOWN_HOSTNAME};
