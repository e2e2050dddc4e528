//! Model tracking with keyword and semantic search.
//!
//! Layers follow the usual split: `domain` holds entities and pure logic,
//! `application` the repository contracts, services and use cases, and
//! `infrastructure` the SQLite store and embedding providers.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod logging;
