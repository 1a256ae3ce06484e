//! Display implementations for domain models.
//!
//! Kept apart from the model definitions so presentation can change without
//! touching the data structures.

use std::fmt;

use super::{collections::NarrationLines, datetime::LocalDateTime};
use crate::{
    models::{ChatMessage, ChatRole, Plan, SessionStatus, Step, StepKind},
    session::{SessionSnapshot, StatusTransition},
};

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for ChatRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}", self.name)?;
        writeln!(f)?;
        writeln!(
            f,
            "- Steps: {}\n- Connections: {}",
            self.steps.len(),
            self.edge_count()
        )?;

        if self.steps.is_empty() {
            writeln!(f, "\nNo steps in this plan.")?;
            return Ok(());
        }

        writeln!(f, "\n## Steps")?;
        writeln!(f)?;
        for step in &self.steps {
            write!(f, "{step}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "### {}. {} ({})",
            self.id,
            self.title,
            self.kind.with_icon()
        )?;
        writeln!(f)?;
        writeln!(f, "{}", self.description)?;
        writeln!(f)
    }
}

impl fmt::Display for ChatMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let speaker = match self.role {
            ChatRole::User => "You",
            ChatRole::Model => "Support",
        };
        writeln!(f, "**{speaker}:** {}", self.text)
    }
}

impl fmt::Display for StatusTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} → {} (attempt {})",
            LocalDateTime(&self.at),
            self.status,
            self.attempt
        )
    }
}

impl fmt::Display for SessionSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            SessionStatus::Idle => writeln!(f, "No synthesis started yet."),
            SessionStatus::Synthesizing => {
                writeln!(f, "## Synthesizing: {}", self.prompt)?;
                writeln!(f)?;
                write!(f, "{}", NarrationLines(&self.narration))
            }
            SessionStatus::Ready => match &self.plan {
                Some(plan) => write!(f, "{plan}"),
                None => writeln!(f, "Ready, but no plan is available."),
            },
            SessionStatus::Failed => {
                let message = self.error.as_deref().unwrap_or("Synthesis failed.");
                writeln!(f, "**Error:** {message}")
            }
        }
    }
}
