//! Lexical extractors
//!
//! Independent vocabulary scans over the utterance: emotion tags, media
//! mentions, recency cues, and the residual free-text keyword left after
//! stripping structural noise.

use once_cell::sync::Lazy;
use regex::Regex;

use super::date::{MONTHS_ABBREV, MONTHS_FULL};
use crate::types::Emotion;

/// Vocabulary that flags an audio filter
const AUDIO_WORDS: &[&str] = &["audio", "voice", "recording"];

/// Vocabulary that flags a photo filter
const PHOTO_WORDS: &[&str] = &["photo", "picture", "image"];

/// Vocabulary that caps results to the most recent few
const RECENT_WORDS: &[&str] = &["recent", "latest", "last"];

/// Filler words removed before the residue becomes a keyword
const STOP_WORDS: &[&str] = &[
    "show", "me", "my", "memories", "memory", "find", "what", "when", "about", "the", "a", "an",
    "and", "or", "with", "from", "i", "have", "all", "some", "any", "please", "can", "you",
    "tell", "do", "did", "get", "give", "list", "where", "which", "who", "how", "are", "is",
    "was", "were", "in", "on", "at", "for", "of", "to", "by", "be", "been", "has", "had",
];

static STOP_WORDS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"(?i)\b(?:{})\b", STOP_WORDS.join("|"))).unwrap());

static YEAR_TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b20\d{2}\b").unwrap());

static MONTH_TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\b(?:{}|{})\b",
        MONTHS_FULL.join("|"),
        MONTHS_ABBREV.join("|")
    ))
    .unwrap()
});

/// First emotion word mentioned, in `Emotion::ALL` priority order
pub fn emotion(lower: &str) -> Option<Emotion> {
    Emotion::ALL
        .iter()
        .copied()
        .find(|e| lower.contains(e.as_str()))
}

/// Media-presence flags; both may be set
pub fn media(lower: &str) -> (bool, bool) {
    let audio = AUDIO_WORDS.iter().any(|w| lower.contains(w));
    let photos = PHOTO_WORDS.iter().any(|w| lower.contains(w));
    (audio, photos)
}

/// Whether the utterance asks for recent memories
pub fn recent(lower: &str) -> bool {
    RECENT_WORDS.iter().any(|w| lower.contains(w))
}

/// Residual free-text search term
///
/// Strips stop words, 4-digit "20xx" year tokens, and month names, then
/// collapses whitespace. Remainders of 2 characters or fewer are noise
/// and yield no keyword.
pub fn keyword(text: &str) -> Option<String> {
    let stripped = STOP_WORDS_RE.replace_all(text, " ");
    let stripped = YEAR_TOKEN_RE.replace_all(&stripped, "");
    let stripped = MONTH_TOKEN_RE.replace_all(&stripped, "");

    let residue = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
    if residue.len() > 2 {
        Some(residue)
    } else {
        None
    }
}
