//! Data models for synthesized plans, sessions and chat transcripts.
//!
//! Display implementations for these models live in
//! [`crate::display::models`] so that presentation stays separate from the
//! data structures.
//!
//! # Examples
//!
//! ```rust
//! use glacier_core::models::{Plan, Step, StepKind};
//!
//! let plan = Plan::new(
//!     "Lead Sync",
//!     vec![
//!         Step::new("1", StepKind::Trigger, "New CRM lead", "Fires on every new lead"),
//!         Step::new("2", StepKind::Action, "Post to Slack", "Announces the lead"),
//!     ],
//! );
//! assert!(plan.validate().is_ok());
//! assert_eq!(plan.edge_count(), 1);
//! ```

pub mod chat;
pub mod plan;
pub mod status;
pub mod step;


pub use chat::{ChatMessage, ChatRole};
pub use plan::{Edge, Plan};
pub use status::{SessionStatus, StepKind};
pub use step::Step;
