//! Support chat: a single conversation with the support responder.
//!
//! The transcript opens with a greeting from the model. Only one reply may
//! be outstanding at a time; sends made while waiting are ignored. A failed
//! or empty reply never surfaces as an error, the transcript gets a fixed
//! fallback message instead.

use std::sync::Arc;

use log::{debug, warn};
use parking_lot::Mutex;

use crate::{generator::ChatResponder, models::ChatMessage};

pub const GREETING: &str =
    "Welcome to Glacier Support. How can I assist your automation journey today?";

/// Appended when the responder answers with no text.
pub const EMPTY_REPLY_MESSAGE: &str = "I apologize, I encountered an error processing that.";

/// Appended when the responder call fails.
pub const UNAVAILABLE_MESSAGE: &str = "Support system currently unavailable.";

/// Result of [`SupportChat::send`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatOutcome {
    /// The responder answered; the reply was appended.
    Replied(String),
    /// The call failed or came back empty; the fallback was appended.
    Fallback(String),
    /// Nothing was sent and the transcript is unchanged.
    Skipped(ChatSkipReason),
}

impl ChatOutcome {
    /// Text appended to the transcript, if any.
    pub fn reply(&self) -> Option<&str> {
        match self {
            ChatOutcome::Replied(text) | ChatOutcome::Fallback(text) => Some(text),
            ChatOutcome::Skipped(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatSkipReason {
    EmptyInput,
    ReplyPending,
}

#[derive(Debug)]
struct ChatState {
    messages: Vec<ChatMessage>,
    pending: bool,
}

/// Clears the pending flag even when a send is cancelled mid-call.
struct PendingGuard<'a>(&'a Mutex<ChatState>);

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.0.lock().pending = false;
    }
}

/// Support conversation. Clones share the same transcript.
#[derive(Clone)]
pub struct SupportChat {
    responder: Arc<dyn ChatResponder>,
    state: Arc<Mutex<ChatState>>,
}

impl SupportChat {
    pub fn new(responder: Arc<dyn ChatResponder>) -> Self {
        Self {
            responder,
            state: Arc::new(Mutex::new(ChatState {
                messages: vec![ChatMessage::model(GREETING)],
                pending: false,
            })),
        }
    }

    /// Sends `input` and appends the reply.
    ///
    /// The responder receives the history as it was before `input` was
    /// appended.
    pub async fn send(&self, input: &str) -> ChatOutcome {
        let text = input.trim();
        if text.is_empty() {
            return ChatOutcome::Skipped(ChatSkipReason::EmptyInput);
        }

        let history = {
            let mut state = self.state.lock();
            if state.pending {
                debug!("Ignoring chat message while a reply is pending");
                return ChatOutcome::Skipped(ChatSkipReason::ReplyPending);
            }
            state.pending = true;
            let history = state.messages.clone();
            state.messages.push(ChatMessage::user(text));
            history
        };
        let _pending = PendingGuard(&self.state);

        let outcome = match self.responder.respond(text, &history).await {
            Ok(reply) if !reply.trim().is_empty() => ChatOutcome::Replied(reply),
            Ok(_) => {
                warn!("Support responder returned an empty reply");
                ChatOutcome::Fallback(EMPTY_REPLY_MESSAGE.to_string())
            }
            Err(e) => {
                warn!("Support responder failed: {e}");
                ChatOutcome::Fallback(UNAVAILABLE_MESSAGE.to_string())
            }
        };

        let mut state = self.state.lock();
        if let Some(reply) = outcome.reply() {
            state.messages.push(ChatMessage::model(reply));
        }
        outcome
    }

    /// Whether a reply is outstanding.
    pub fn is_pending(&self) -> bool {
        self.state.lock().pending
    }

    /// All messages, oldest first, starting with the greeting.
    pub fn transcript(&self) -> Vec<ChatMessage> {
        self.state.lock().messages.clone()
    }
}
