//! Conversation sessions
//!
//! A session owns an append-only transcript and runs one utterance at a
//! time through the pipeline: classify, execute, compose, append. Every
//! submitted utterance produces exactly one assistant message, in
//! submission order; a store failure degrades to a single apologetic
//! reply and leaves later queries unaffected.

use chrono::{Local, Timelike, Utc};

use super::responder::{ChatReply, Responder};
use crate::error::Result;
use crate::query::{IntentClassifier, QueryIntent};
use crate::storage::{count_memories, query_memories, Storage};
use crate::types::ConversationMessage;

/// One user's conversation with the memory companion
pub struct ChatSession {
    storage: Storage,
    owner_id: String,
    classifier: IntentClassifier,
    responder: Responder,
    messages: Vec<ConversationMessage>,
}

impl ChatSession {
    /// Start a session, seeded with the companion's welcome message
    pub fn new(storage: Storage, owner_id: impl Into<String>) -> Self {
        Self::with_responder(storage, owner_id, Responder::new())
    }

    /// Start a session with a custom responder (tests pin the opener here)
    pub fn with_responder(
        storage: Storage,
        owner_id: impl Into<String>,
        responder: Responder,
    ) -> Self {
        let welcome = ConversationMessage::assistant(responder.welcome(), Vec::new());
        Self {
            storage,
            owner_id: owner_id.into(),
            classifier: IntentClassifier::new(),
            responder,
            messages: vec![welcome],
        }
    }

    /// Submit one utterance and get the assistant's reply
    pub fn submit(&mut self, text: &str) -> &ConversationMessage {
        self.messages.push(ConversationMessage::user(text));

        let intent = self.classifier.classify(text, Utc::now().date_naive());
        let reply = match self.respond(intent) {
            Ok(reply) => reply,
            Err(err) => {
                tracing::error!(owner = %self.owner_id, %err, "query failed");
                ChatReply {
                    text: self.responder.failure(),
                    memories: Vec::new(),
                }
            }
        };

        self.messages
            .push(ConversationMessage::assistant(reply.text, reply.memories));
        &self.messages[self.messages.len() - 1]
    }

    fn respond(&mut self, intent: QueryIntent) -> Result<ChatReply> {
        let text = match intent {
            QueryIntent::Greeting => {
                let total = self.total_memories()?;
                self.responder.greeting(total, Local::now().hour())
            }
            QueryIntent::Help => self.responder.help(),
            QueryIntent::Stats => {
                let total = self.total_memories()?;
                self.responder.stats(total)
            }
            QueryIntent::Chitchat(reply) => reply,
            QueryIntent::Unknown => self.responder.unknown(),
            QueryIntent::Search(filters) => {
                let results = self
                    .storage
                    .with_connection(|conn| query_memories(conn, &self.owner_id, &filters))?;
                tracing::debug!(
                    owner = %self.owner_id,
                    hits = results.len(),
                    "search executed"
                );
                return Ok(self.responder.search(&filters, results));
            }
        };

        Ok(ChatReply {
            text,
            memories: Vec::new(),
        })
    }

    fn total_memories(&self) -> Result<i64> {
        self.storage
            .with_connection(|conn| count_memories(conn, &self.owner_id))
    }

    /// The transcript so far, oldest first
    pub fn messages(&self) -> &[ConversationMessage] {
        &self.messages
    }

    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }
}
