pub mod config;
pub mod macros;
pub mod network;

// Re-exported so the status macros expand without requiring a direct
// tracing dependency in every consumer.
pub use tracing;
