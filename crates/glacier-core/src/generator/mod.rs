//! Clients for the external generation services.
//!
//! The session only ever sees these services through the [`PlanGenerator`]
//! and [`ChatResponder`] traits: one asynchronous call with unknown latency
//! that either yields a value or fails.
//!
//! - [`GeminiClient`]: the hosted Gemini `generateContent` API (both traits)
//! - [`FilePlanGenerator`]: replays a plan stored as JSON, with simulated
//!   latency, for offline use

use async_trait::async_trait;

use crate::{
    error::Result,
    models::{ChatMessage, Plan},
};

mod file;
mod gemini;

pub use file::FilePlanGenerator;
pub use gemini::GeminiClient;

/// Turns a free-text prompt into a structured plan.
#[async_trait]
pub trait PlanGenerator: Send + Sync {
    /// Generates a plan for `prompt`.
    ///
    /// Implementations should not validate the plan; the session does that
    /// and treats an invalid plan like any other failure.
    async fn generate(&self, prompt: &str) -> Result<Plan>;
}

/// Answers a support question given the conversation so far.
#[async_trait]
pub trait ChatResponder: Send + Sync {
    /// Responds to `message`. `history` holds every earlier message, oldest
    /// first, and does not include `message` itself.
    async fn respond(&self, message: &str, history: &[ChatMessage]) -> Result<String>;
}
