//! Step model definition and related functionality.

use serde::{Deserialize, Serialize};

use super::StepKind;
use crate::error::{ArchitectError, Result};

/// Represents one node of a synthesized plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Step {
    /// Identifier, unique within the owning plan
    pub id: String,

    /// Role of the node in the workflow
    #[serde(rename = "type")]
    pub kind: StepKind,

    /// Short display title
    pub title: String,

    /// Display text explaining what the step does
    pub description: String,
}

impl Step {
    /// Creates a step from its parts.
    pub fn new(
        id: impl Into<String>,
        kind: StepKind,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            title: title.into(),
            description: description.into(),
        }
    }

    /// Checks that the step's identifier and display text are non-empty.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(ArchitectError::invalid_input("steps.id").with_reason("must not be empty"));
        }
        if self.title.trim().is_empty() {
            return Err(ArchitectError::invalid_input("steps.title")
                .with_reason(format!("step '{}' has an empty title", self.id)));
        }
        if self.description.trim().is_empty() {
            return Err(ArchitectError::invalid_input("steps.description")
                .with_reason(format!("step '{}' has an empty description", self.id)));
        }
        Ok(())
    }
}
