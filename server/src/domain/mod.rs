//! Domain logic for the exporter
//!
//! - `stats` - JVB stats to typed metrics translation

pub mod stats;

pub use stats::StatsCollector;
