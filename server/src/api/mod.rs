//! API server and routes

mod exposition;
pub mod middleware;
pub mod routes;
mod server;
pub mod types;

pub use exposition::StatsExposition;
pub use server::{ApiServer, build_router};
