pub mod embeddings;
pub mod persistence;
