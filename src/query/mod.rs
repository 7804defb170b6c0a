//! Query understanding pipeline
//!
//! Converts a free-form utterance into a structured intent: ordered
//! pattern classification, lexical extraction, date resolution, and
//! filter composition.

pub mod date;
pub mod extract;
mod filters;
mod intent;

pub use date::{resolve as resolve_date, DateFilter, DateRange};
pub use filters::{SearchFilters, DEFAULT_LIMIT, RECENT_LIMIT};
pub use intent::{IntentClassifier, QueryIntent};
