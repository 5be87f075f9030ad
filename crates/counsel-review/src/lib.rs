//! Review workflow client, reference backend, and ambient plumbing for the
//! counseling platform dashboards.

pub mod backend;
pub mod client;
pub mod config;
pub mod error;
pub mod session;
pub mod telemetry;
pub mod workflows;
