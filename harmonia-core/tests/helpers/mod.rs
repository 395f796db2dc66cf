//! Test Helper Utilities
//!
//! Shared utilities for the harmonia-core integration tests

#![allow(dead_code)]

pub mod log_capture;
pub mod signal_generator;

pub use log_capture::{capture_logs, LogCapture};
pub use signal_generator::{constant_signal, harmonic_signal, white_noise, SignalConfig};
