//! CLI command implementations.

pub mod cases;
pub mod init;
pub mod resolve;
