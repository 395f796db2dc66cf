//! # Harmonia Common Library
//!
//! Shared code for the Harmonia crates:
//! - Error type
//! - Analyzer configuration (TOML-deserializable, validated)
//! - Ordinal pattern levels
//! - Audit events and sinks
//! - Tracing initialisation

pub mod config;
pub mod error;
pub mod events;
pub mod levels;
pub mod logging;

pub use config::AnalyzerConfig;
pub use error::{Error, Result};
pub use events::{AnalysisEvent, AuditSink, MemorySink, NoopSink, TracingSink};
pub use levels::PatternLevel;
