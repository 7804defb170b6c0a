//! Structured search filters derived from an utterance

use serde::{Deserialize, Serialize};

use super::date::DateFilter;
use crate::types::Emotion;

/// Result cap when the user asked for recent memories
pub const RECENT_LIMIT: i64 = 5;

/// Result cap for everything else
pub const DEFAULT_LIMIT: i64 = 50;

/// Optional-field filter bundle for a memory query
///
/// All fields are independently optional. An empty bundle is never
/// executed; intent classification degrades it to `Unknown` instead.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchFilters {
    /// Match on emotion tag
    pub emotion: Option<Emotion>,
    /// Free-text term matched across title, description, and transcript
    pub keyword: Option<String>,
    /// Creation-date range at day, month, or year granularity
    pub date: Option<DateFilter>,
    /// Require an attached audio recording
    pub has_audio: bool,
    /// Require attached photos
    pub has_photos: bool,
    /// Cap results at `RECENT_LIMIT` instead of `DEFAULT_LIMIT`
    pub recent: bool,
}

impl SearchFilters {
    /// True when no field is set
    pub fn is_empty(&self) -> bool {
        self.emotion.is_none()
            && self.keyword.is_none()
            && self.date.is_none()
            && !self.has_audio
            && !self.has_photos
            && !self.recent
    }

    /// Result cap for this bundle, applied after recency ordering
    pub fn limit(&self) -> i64 {
        if self.recent {
            RECENT_LIMIT
        } else {
            DEFAULT_LIMIT
        }
    }
}
