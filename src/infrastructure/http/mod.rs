//! Shared HTTP plumbing for the model gateways.

pub mod error;
pub mod retry;

pub use error::GatewayHttpError;
pub use retry::RetryPolicy;
