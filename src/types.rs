//! Core types for Memoir

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a memory
pub type MemoryId = i64;

/// A journal entry in the database
///
/// Immutable once created, except for deletion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Memory {
    /// Unique identifier
    pub id: MemoryId,
    /// Owning account
    pub owner_id: String,
    /// Short title
    pub title: String,
    /// Free-text description
    pub description: String,
    /// Transcript of any attached recording
    pub transcript: String,
    /// Emotion tag, if the author chose one
    #[serde(rename = "emotion_tag")]
    pub emotion: Option<Emotion>,
    /// Whether an audio recording is attached
    pub has_audio: bool,
    /// Whether photos are attached
    pub has_photos: bool,
    /// Whether other files are attached
    pub has_files: bool,
    /// When the memory was created
    pub created_at: DateTime<Utc>,
}

/// Payload for creating a new memory
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewMemory {
    pub owner_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub transcript: String,
    pub emotion: Option<Emotion>,
    #[serde(default)]
    pub has_audio: bool,
    #[serde(default)]
    pub has_photos: bool,
    #[serde(default)]
    pub has_files: bool,
}

/// Closed vocabulary of emotion tags
///
/// `ALL` preserves enumeration order, which doubles as the match priority
/// when an utterance mentions more than one emotion word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Happy,
    Sad,
    Nostalgic,
    Proud,
    Peaceful,
    Grateful,
    Excited,
    Bittersweet,
}

impl Emotion {
    /// All emotion tags in priority order
    pub const ALL: &'static [Emotion] = &[
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Nostalgic,
        Emotion::Proud,
        Emotion::Peaceful,
        Emotion::Grateful,
        Emotion::Excited,
        Emotion::Bittersweet,
    ];

    /// Lowercase tag as stored in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Happy => "happy",
            Emotion::Sad => "sad",
            Emotion::Nostalgic => "nostalgic",
            Emotion::Proud => "proud",
            Emotion::Peaceful => "peaceful",
            Emotion::Grateful => "grateful",
            Emotion::Excited => "excited",
            Emotion::Bittersweet => "bittersweet",
        }
    }
}

impl std::fmt::Display for Emotion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Emotion {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "happy" => Ok(Emotion::Happy),
            "sad" => Ok(Emotion::Sad),
            "nostalgic" => Ok(Emotion::Nostalgic),
            "proud" => Ok(Emotion::Proud),
            "peaceful" => Ok(Emotion::Peaceful),
            "grateful" => Ok(Emotion::Grateful),
            "excited" => Ok(Emotion::Excited),
            "bittersweet" => Ok(Emotion::Bittersweet),
            _ => Err(format!("Unknown emotion tag: {}", s)),
        }
    }
}

/// Who authored a conversation message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One turn of the companion conversation
///
/// Transient: held only for the lifetime of a session, never persisted.
/// `memories` is non-empty only on assistant messages carrying search
/// results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub role: Role,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub memories: Vec<Memory>,
}

impl ConversationMessage {
    /// A user utterance
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            timestamp: Utc::now(),
            memories: Vec::new(),
        }
    }

    /// An assistant reply, optionally carrying result memories
    pub fn assistant(text: impl Into<String>, memories: Vec<Memory>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
            timestamp: Utc::now(),
            memories,
        }
    }
}
