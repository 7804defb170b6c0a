//! Memoir - personal memory journal with natural-language retrieval
//!
//! Stores journal entries ("memories") in SQLite and answers free-form
//! questions about them: intent classification, date resolution, filter
//! extraction, bounded recency-ordered queries, and conversational
//! replies.

pub mod chat;
pub mod error;
pub mod query;
pub mod storage;
pub mod types;

pub use chat::{ChatReply, ChatSession, Responder};
pub use error::{MemoirError, Result};
pub use query::{DateFilter, IntentClassifier, QueryIntent, SearchFilters};
pub use storage::Storage;
pub use types::*;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
