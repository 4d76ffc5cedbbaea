//! Prometheus exporter for Jitsi Videobridge stats

pub mod api;
pub mod app;
pub mod core;
pub mod domain;
