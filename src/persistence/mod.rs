//! Persistence layer: the document-store contract and its backends.
//!
//! All entities live as untyped JSON documents in named collections,
//! matching the managed document database the console was originally built
//! against. The PostgreSQL backend keeps every collection in one JSONB
//! table; the in-memory backend mirrors its semantics for tests and
//! persistence-disabled deployments.

pub mod memory;
pub mod models;
pub mod postgres;
pub mod store;

pub use memory::MemoryStore;
pub use models::{Document, ListQuery, OrderBy};
pub use postgres::PostgresStore;
pub use store::DocumentStore;
