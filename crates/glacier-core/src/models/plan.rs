//! Plan model definition and related functionality.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::Step;
use crate::error::{ArchitectError, Result};

/// Represents a complete synthesized plan.
///
/// Plans are produced whole by a generator and never mutated afterwards; a
/// new synthesis replaces the previous plan wholesale.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Plan {
    /// Display label of the plan
    pub name: String,

    /// Ordered steps; insertion order is execution and display order
    pub steps: Vec<Step>,
}

/// A step-to-next-step connection within a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge<'a> {
    /// Position of the edge, equal to the index of its source step
    pub index: usize,
    pub from: &'a Step,
    pub to: &'a Step,
}

impl Plan {
    /// Creates a plan from a name and its ordered steps.
    pub fn new(name: impl Into<String>, steps: Vec<Step>) -> Self {
        Self {
            name: name.into(),
            steps,
        }
    }

    /// Validates the structural rules of a plan.
    ///
    /// The name must be non-empty, there must be at least one step, every
    /// step must be valid on its own and step ids must be unique. The kind
    /// ordering of steps is deliberately not checked.
    ///
    /// # Errors
    ///
    /// Returns `ArchitectError::InvalidInput` describing the first violation.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ArchitectError::invalid_input("name").with_reason("must not be empty"));
        }
        if self.steps.is_empty() {
            return Err(
                ArchitectError::invalid_input("steps").with_reason("plan must contain at least one step")
            );
        }

        let mut seen = HashSet::with_capacity(self.steps.len());
        for step in &self.steps {
            step.validate()?;
            if !seen.insert(step.id.as_str()) {
                return Err(ArchitectError::invalid_input("steps.id")
                    .with_reason(format!("duplicate step id '{}'", step.id)));
            }
        }
        Ok(())
    }

    /// Number of step-to-next-step edges in the plan.
    pub fn edge_count(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    /// Iterates over the edges between consecutive steps.
    pub fn edges(&self) -> impl Iterator<Item = Edge<'_>> {
        self.steps
            .windows(2)
            .enumerate()
            .map(|(index, pair)| Edge {
                index,
                from: &pair[0],
                to: &pair[1],
            })
    }
}
