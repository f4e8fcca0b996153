//! Infrastructure layer module
//!
//! - Configuration management (figment)
//! - Logging (tracing)
//! - HTTP retry plumbing shared by the model gateways
//! - Project setup and component wiring

pub mod config;
pub mod http;
pub mod logging;
pub mod setup;
