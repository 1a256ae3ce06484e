//! Display formatting for plans, sessions and chat transcripts.
//!
//! Domain models implement [`std::fmt::Display`] directly (see [`models`]);
//! collections that need their own framing are wrapped in newtypes (see
//! [`collections`]). Everything renders as markdown so the CLI can hand it to
//! its terminal renderer unchanged.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │  Domain Models  │    │ Display impls & │    │    Markdown     │
//! │ (Plan, Session) │───▶│    wrappers     │───▶│     output      │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust
//! use glacier_core::{
//!     display::OperationStatus,
//!     models::{Plan, Step, StepKind},
//! };
//!
//! let plan = Plan::new(
//!     "Lead Sync",
//!     vec![Step::new("1", StepKind::Trigger, "New lead", "Fires on every lead")],
//! );
//! let output = plan.to_string();
//! assert!(output.starts_with("# Lead Sync"));
//! assert!(output.contains("### 1. New lead (⚡ trigger node)"));
//!
//! let status = OperationStatus::failure("Synthesis failed".to_string());
//! assert!(status.to_string().starts_with("Error:"));
//! ```

pub mod collections;
pub mod datetime;
pub mod models;
pub mod status;

pub use collections::{NarrationLines, PlaybackFrames, Transcript};
pub use datetime::LocalDateTime;
pub use status::OperationStatus;
