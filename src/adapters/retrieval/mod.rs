//! Retrieval gateway adapters.

pub mod embedding_index;

pub use embedding_index::EmbeddingDefectIndex;
