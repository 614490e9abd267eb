//! Metrics module for the Tributary daemon.

pub mod http;
pub mod setup;

pub use setup::init_metrics;
