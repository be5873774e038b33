//! Persistence layer: shared entities, the store trait, and backends.

/// Database model definitions.
pub mod models;
/// Result storage and retrieval operations.
pub mod result_store;
/// Storage abstraction layer for database operations.
pub mod storage;
