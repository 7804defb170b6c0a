//! Conversational layer: response composition and session handling

pub mod responder;
mod session;

pub use responder::{
    ChatReply, FixedOpener, OpenerPicker, RandomOpener, Responder, OPENERS, SUGGESTED_PROMPTS,
};
pub use session::ChatSession;
