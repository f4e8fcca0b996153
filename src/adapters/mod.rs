//! Infrastructure adapters for external systems.

pub mod csv;
pub mod embeddings;
pub mod generation;
pub mod memory;
pub mod mock;
pub mod notification;
pub mod retrieval;
