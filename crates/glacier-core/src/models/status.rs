//! Status and tag enumerations for plans and sessions.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Closed set of step roles a generator may emit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    /// Starts the workflow
    Trigger,

    /// Branches or filters on data
    Condition,

    /// Performs work against an integration
    Action,
}

impl FromStr for StepKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "trigger" => Ok(StepKind::Trigger),
            "condition" => Ok(StepKind::Condition),
            "action" => Ok(StepKind::Action),
            _ => Err(format!("Invalid step type: {s}")),
        }
    }
}

impl StepKind {
    /// Wire representation of the tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            StepKind::Trigger => "trigger",
            StepKind::Condition => "condition",
            StepKind::Action => "action",
        }
    }

    /// Get the kind with a consistent icon for display.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use glacier_core::models::StepKind;
    ///
    /// assert_eq!(StepKind::Trigger.with_icon(), "⚡ trigger node");
    /// assert_eq!(StepKind::Condition.with_icon(), "◇ condition node");
    /// assert_eq!(StepKind::Action.with_icon(), "▣ action node");
    /// ```
    pub fn with_icon(&self) -> &'static str {
        match self {
            StepKind::Trigger => "⚡ trigger node",
            StepKind::Condition => "◇ condition node",
            StepKind::Action => "▣ action node",
        }
    }
}

/// Lifecycle state of a synthesis session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// Nothing submitted yet
    #[default]
    Idle,

    /// A generation call is outstanding and narration is running
    Synthesizing,

    /// The last attempt produced a plan
    Ready,

    /// The last attempt failed
    Failed,
}

impl SessionStatus {
    /// Lowercase name of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Idle => "idle",
            SessionStatus::Synthesizing => "synthesizing",
            SessionStatus::Ready => "ready",
            SessionStatus::Failed => "failed",
        }
    }

    /// Whether the status ends a synthesis attempt.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionStatus::Ready | SessionStatus::Failed)
    }
}
