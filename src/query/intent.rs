//! Intent classification
//!
//! An ordered decision list over the lowercased utterance. Evaluation
//! order is part of the contract: earlier rules pre-empt later ones, and
//! the greeting rule only fires on short utterances so a greeting word
//! embedded in a longer question still reaches structured extraction.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{date, extract, SearchFilters};

static HOW_ARE_YOU_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:how are you|how's it going|how have you been|how are things)\b").unwrap()
});

static WHO_ARE_YOU_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:who are you|what are you)\b").unwrap());

static GREETING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:hello|hi|hey|good morning|good evening|howdy)\b").unwrap());

static STATS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:how many|count|total|statistics|stats)\b").unwrap());

static HELP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:help|what can you do|what do you do)\b").unwrap());

/// Greeting words embedded in questions this long are not greetings
const GREETING_MAX_TOKENS: usize = 5;

const HOW_ARE_YOU_REPLY: &str = "I'm doing wonderfully, thank you for asking! I'm right here \
     and ready to help you explore your journal. What would you like to find?";

const WHO_ARE_YOU_REPLY: &str = "I'm your memory companion. I help you safely store and look \
     back on the moments that matter to you.";

/// What the user is asking for
///
/// Exactly one case holds per utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "intent", content = "payload")]
pub enum QueryIntent {
    /// A short salutation
    Greeting,
    /// A request for usage guidance
    Help,
    /// A request for journal statistics
    Stats,
    /// Small talk, answered with the canned reply carried in the payload
    Chitchat(String),
    /// Nothing recognizable to search for
    Unknown,
    /// A structured memory search
    Search(SearchFilters),
}

/// Ordered pattern classifier for user utterances
#[derive(Debug, Clone, Copy, Default)]
pub struct IntentClassifier;

impl IntentClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify an utterance, resolving relative dates against `today`
    pub fn classify(&self, input: &str, today: NaiveDate) -> QueryIntent {
        let lower = input.to_lowercase();

        if HOW_ARE_YOU_RE.is_match(&lower) {
            return QueryIntent::Chitchat(HOW_ARE_YOU_REPLY.to_string());
        }
        if WHO_ARE_YOU_RE.is_match(&lower) {
            return QueryIntent::Chitchat(WHO_ARE_YOU_REPLY.to_string());
        }
        if GREETING_RE.is_match(&lower)
            && lower.split_whitespace().count() < GREETING_MAX_TOKENS
        {
            return QueryIntent::Greeting;
        }
        if STATS_RE.is_match(&lower) {
            return QueryIntent::Stats;
        }
        if HELP_RE.is_match(&lower) {
            return QueryIntent::Help;
        }

        let filters = self.extract_filters(input, &lower, today);
        if filters.is_empty() {
            tracing::debug!(utterance = %input, "no filters extracted, intent unknown");
            QueryIntent::Unknown
        } else {
            tracing::debug!(utterance = %input, ?filters, "structured search intent");
            QueryIntent::Search(filters)
        }
    }

    /// Merge the extractor outputs into one filter bundle
    ///
    /// Structured fields win over free text: the keyword slot is only
    /// filled when neither a date nor an emotion was resolved.
    fn extract_filters(&self, input: &str, lower: &str, today: NaiveDate) -> SearchFilters {
        let emotion = extract::emotion(lower);
        let date = date::resolve(lower, today);
        let (has_audio, has_photos) = extract::media(lower);
        let recent = extract::recent(lower);

        let keyword = if emotion.is_none() && date.is_none() {
            extract::keyword(input)
        } else {
            None
        };

        SearchFilters {
            emotion,
            keyword,
            date,
            has_audio,
            has_photos,
            recent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::DateFilter;
    use crate::types::Emotion;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    fn classify(input: &str) -> QueryIntent {
        IntentClassifier::new().classify(input, today())
    }

    #[test]
    fn test_greeting() {
        assert_eq!(classify("hello"), QueryIntent::Greeting);
        assert_eq!(classify("hey there"), QueryIntent::Greeting);
    }

    #[test]
    fn test_long_greeting_becomes_search() {
        // Five tokens or more: the greeting word must not pre-empt search
        let intent = classify("hi, can you show me memories from October 5 2023");
        match intent {
            QueryIntent::Search(filters) => {
                assert_eq!(
                    filters.date,
                    Some(DateFilter::Day {
                        year: 2023,
                        month: 10,
                        day: 5
                    })
                );
            }
            other => panic!("expected search, got {:?}", other),
        }
    }

    #[test]
    fn test_chitchat_pre_empts_everything() {
        assert!(matches!(classify("how are you"), QueryIntent::Chitchat(_)));
        assert!(matches!(
            classify("who are you exactly?"),
            QueryIntent::Chitchat(_)
        ));
        // "how many" would also match stats; chitchat "how are you" comes first
        assert!(matches!(
            classify("hey, how are you? how many memories?"),
            QueryIntent::Chitchat(_)
        ));
    }

    #[test]
    fn test_stats_and_help() {
        assert_eq!(classify("how many memories do I have?"), QueryIntent::Stats);
        assert_eq!(classify("what can you do"), QueryIntent::Help);
    }

    #[test]
    fn test_emotion_search() {
        match classify("Show me my happy memories") {
            QueryIntent::Search(filters) => {
                assert_eq!(filters.emotion, Some(Emotion::Happy));
                assert_eq!(filters.keyword, None);
            }
            other => panic!("expected search, got {:?}", other),
        }
    }

    #[test]
    fn test_year_only_search() {
        match classify("2024") {
            QueryIntent::Search(filters) => {
                assert_eq!(filters.date, Some(DateFilter::Year { year: 2024 }));
                assert_eq!(filters.keyword, None);
            }
            other => panic!("expected search, got {:?}", other),
        }
    }

    #[test]
    fn test_keyword_search() {
        match classify("show me memories about grandma") {
            QueryIntent::Search(filters) => {
                assert_eq!(filters.keyword, Some("grandma".to_string()));
                assert_eq!(filters.emotion, None);
                assert_eq!(filters.date, None);
            }
            other => panic!("expected search, got {:?}", other),
        }
    }

    #[test]
    fn test_structured_fields_suppress_keyword() {
        match classify("beach trip in 2023") {
            QueryIntent::Search(filters) => {
                assert_eq!(filters.date, Some(DateFilter::Year { year: 2023 }));
                assert_eq!(filters.keyword, None);
            }
            other => panic!("expected search, got {:?}", other),
        }
    }

    #[test]
    fn test_media_and_recency_flags() {
        match classify("my latest voice recordings with photos") {
            QueryIntent::Search(filters) => {
                assert!(filters.has_audio);
                assert!(filters.has_photos);
                assert!(filters.recent);
            }
            other => panic!("expected search, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_bundle_degrades_to_unknown() {
        assert_eq!(classify("hm"), QueryIntent::Unknown);
        assert_eq!(classify(""), QueryIntent::Unknown);
        assert_eq!(classify("   "), QueryIntent::Unknown);
    }

    #[test]
    fn test_classification_is_deterministic() {
        let first = classify("show me my happy memories from 2023");
        let second = classify("show me my happy memories from 2023");
        assert_eq!(first, second);
    }
}
