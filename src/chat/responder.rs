//! Response composition
//!
//! Turns a resolved intent (and, for searches, the executed result set)
//! into reply text. Phrasing varies by filter type and result count; the
//! randomly chosen opener is presentation-only and never affects which
//! records are returned, so tests can pin it through [`OpenerPicker`].

use rand::Rng;

use crate::query::{DateFilter, SearchFilters};
use crate::types::Memory;

/// Conversational openers prefixed to day-date and generic intros
pub const OPENERS: &[&str] = &[
    "Oh, I loved looking through these.",
    "Let's take a little walk down memory lane.",
    "Here's what I gently dusted off for you.",
    "I found some moments I think you'll want to see.",
];

/// Prompts a front end can offer as one-tap suggestions
pub const SUGGESTED_PROMPTS: &[&str] = &[
    "What did I do yesterday?",
    "Show my happy memories",
    "Show memories from 2024",
    "How many memories do I have?",
];

const MONTH_NAMES: &[&str] = &[
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Source of the opener choice
pub trait OpenerPicker: Send {
    /// Pick an index in `0..count`
    fn pick(&mut self, count: usize) -> usize;
}

/// Default picker backed by the thread RNG
#[derive(Debug, Default)]
pub struct RandomOpener;

impl OpenerPicker for RandomOpener {
    fn pick(&mut self, count: usize) -> usize {
        rand::thread_rng().gen_range(0..count)
    }
}

/// Deterministic picker for tests
#[derive(Debug)]
pub struct FixedOpener(pub usize);

impl OpenerPicker for FixedOpener {
    fn pick(&mut self, count: usize) -> usize {
        self.0 % count
    }
}

/// Reply text plus the (possibly empty) result set
#[derive(Debug, Clone)]
pub struct ChatReply {
    pub text: String,
    pub memories: Vec<Memory>,
}

impl ChatReply {
    fn text_only(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            memories: Vec::new(),
        }
    }
}

/// Composes natural-language replies
pub struct Responder {
    picker: Box<dyn OpenerPicker>,
}

impl Default for Responder {
    fn default() -> Self {
        Self::new()
    }
}

impl Responder {
    pub fn new() -> Self {
        Self::with_picker(Box::new(RandomOpener))
    }

    pub fn with_picker(picker: Box<dyn OpenerPicker>) -> Self {
        Self { picker }
    }

    /// The canned welcome a fresh session starts with
    pub fn welcome(&self) -> String {
        "Hello! I'm your memory companion.\n\nI can help you reflect on your journey. \
         Try asking me:\n\
         \u{2022} \"What did I write yesterday?\"\n\
         \u{2022} \"Show me memories from Oct 5th 2023\"\n\
         \u{2022} \"Find my happy memories\"\n\
         \u{2022} \"What was I doing in 2024?\""
            .to_string()
    }

    /// Time-of-day salutation plus the live memory count
    pub fn greeting(&self, total_memories: i64, hour: u32) -> String {
        let salutation = if hour < 12 {
            "Good morning"
        } else if hour < 17 {
            "Good afternoon"
        } else {
            "Good evening"
        };
        format!(
            "{}! It's always nice when you stop by. You have {} memories tucked away \
             safely. What chapters of your life should we look at today?",
            salutation, total_memories
        )
    }

    pub fn help(&self) -> String {
        "I'd love to help! Think of me as your personal archivist.\n\n\
         You can ask me things like:\n\
         \u{2022} \"What did I write yesterday?\"\n\
         \u{2022} \"Show me memories from October 5th 2023\"\n\
         \u{2022} \"Find my happy memories\"\n\
         \u{2022} \"What did I record in 2024?\"\n\n\
         What feels right for today?"
            .to_string()
    }

    pub fn stats(&self, total_memories: i64) -> String {
        format!(
            "You've entrusted me with {} memories so far. Every single one matters. \
             Would you like me to pull up your most recent ones?",
            total_memories
        )
    }

    pub fn unknown(&self) -> String {
        "I'm not quite sure what to search for based on that. Could you try asking for \
         a specific month (like \"February\"), an emotion (\"happy\"), or a year \
         (\"2023\")?"
            .to_string()
    }

    /// One generic apology when the store is unavailable
    pub fn failure(&self) -> String {
        "Oh no, my pages got a little stuck. Let's try that one more time.".to_string()
    }

    /// Compose the reply for an executed search
    pub fn search(&mut self, filters: &SearchFilters, results: Vec<Memory>) -> ChatReply {
        if results.is_empty() {
            return ChatReply::text_only(self.empty_message(filters));
        }

        let intro = match filters.date {
            Some(DateFilter::Day { year, month, day }) => format!(
                "{} Here is exactly what you experienced on {}:",
                self.opener(),
                format_day(year, month, day)
            ),
            Some(DateFilter::Month { year, month }) => format!(
                "Ah, {} {}. Here is what you captured during that time:",
                month_name(month),
                year
            ),
            Some(DateFilter::Year { year }) => format!(
                "Looking back at {}... here are your memories from that year:",
                year
            ),
            None => {
                if let Some(emotion) = filters.emotion {
                    format!(
                        "These are the moments that made you feel {}. Hold on to these.",
                        emotion
                    )
                } else if let Some(ref keyword) = filters.keyword {
                    format!(
                        "I searched your thoughts for \"{}\" and found these treasures:",
                        keyword
                    )
                } else {
                    format!("{} Here's what I found for you:", self.opener())
                }
            }
        };

        ChatReply {
            text: intro,
            memories: results,
        }
    }

    /// Filter-type-specific message for a search without hits
    fn empty_message(&self, filters: &SearchFilters) -> String {
        if filters.date.is_some() {
            "I checked that specific time period, but it looks like you didn't record \
             anything then. Every day doesn't need a memory, though!"
                .to_string()
        } else if let Some(emotion) = filters.emotion {
            format!(
                "I don't see any moments tagged as \"{}\" just yet. But feelings change, \
                 and there's always tomorrow!",
                emotion
            )
        } else {
            "I carefully leafed through your journal, but I couldn't find anything \
             matching that. Maybe try phrasing it a bit differently?"
                .to_string()
        }
    }

    fn opener(&mut self) -> &'static str {
        OPENERS[self.picker.pick(OPENERS.len())]
    }
}

fn month_name(month: u32) -> &'static str {
    MONTH_NAMES
        .get(month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("that month")
}

fn format_day(year: i32, month: u32, day: u32) -> String {
    format!("{} {}{}, {}", month_name(month), day, ordinal_suffix(day), year)
}

fn ordinal_suffix(day: u32) -> &'static str {
    match day % 100 {
        11..=13 => "th",
        _ => match day % 10 {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        },
    }
}
