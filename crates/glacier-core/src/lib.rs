//! Core library for Glacier, an automation architect that turns a natural
//! language description into a workflow plan.
//!
//! The crate provides the synthesis session controller, its decorative
//! progress narration, the plan model, the playback simulator for a
//! synthesized plan, the support chat, and the clients for the external
//! generation service.
//!
//! # Display Architecture
//!
//! - **Domain Models** ([`models`]): Implement [`std::fmt::Display`] for direct
//!   formatting as markdown
//! - **Display Wrappers** ([`display`]): Frame collections such as narration
//!   lines, playback frames and chat transcripts
//! - **Terminal Rendering**: Rich markdown output via the CLI's terminal
//!   renderer
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use glacier_core::{generator::FilePlanGenerator, SessionBuilder, SessionStatus};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let session = SessionBuilder::new()
//!     .with_generator(FilePlanGenerator::new("plan.json"))
//!     .build()?;
//!
//! let mut events = session.subscribe();
//! session.start("Sync CRM leads to Slack");
//! tokio::spawn(async move {
//!     while let Ok(event) = events.recv().await {
//!         println!("{event:?}");
//!     }
//! });
//!
//! if session.wait_settled().await == SessionStatus::Ready {
//!     if let Some(plan) = session.plan() {
//!         println!("{plan}");
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod chat;
pub mod config;
pub mod display;
pub mod error;
pub mod generator;
pub mod models;
pub mod narrator;
pub mod playback;
pub mod session;

// Re-export commonly used types
pub use chat::{ChatOutcome, ChatSkipReason, SupportChat};
pub use config::GlacierConfig;
pub use display::{LocalDateTime, NarrationLines, OperationStatus, PlaybackFrames, Transcript};
pub use error::{ArchitectError, Result, SYNTHESIS_FAILED_MESSAGE};
pub use models::{ChatMessage, ChatRole, Plan, SessionStatus, Step, StepKind};
pub use narrator::{NarrationLog, NarrationScript, Narrator};
pub use playback::{EdgeFrame, Playback, PlaybackSettings};
pub use session::{
    Session, SessionBuilder, SessionEvent, SessionSnapshot, SkipReason, StartOutcome,
    StatusTransition,
};
