//! Storage engine for Memoir
//!
//! SQLite-backed journal store: connection handling, schema migrations,
//! and the memory CRUD/query operations.

mod connection;
mod migrations;
pub mod queries;

pub use connection::{Storage, StorageConfig};
pub use migrations::{run_migrations, SCHEMA_VERSION};
pub use queries::{
    count_memories, count_memories_since, count_memories_this_month, create_memory,
    delete_memory, get_memory, list_memories, query_memories,
};
