//! Domain layer for defect root-cause analysis
//!
//! This module contains core business types and the port traits that
//! external collaborators (retrieval, generation, storage) implement.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DomainError, DomainResult};
