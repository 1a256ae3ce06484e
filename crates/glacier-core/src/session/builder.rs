//! Builder for creating and configuring Session instances.

use std::{sync::Arc, time::Duration};

use super::Session;
use crate::{
    config::GlacierConfig,
    error::{ArchitectError, Result},
    generator::PlanGenerator,
    narrator::{Narrator, DEFAULT_LOG_CAPACITY},
    playback::{Playback, PlaybackSettings},
};

/// Builder for creating and configuring Session instances.
#[derive(Clone)]
pub struct SessionBuilder {
    generator: Option<Arc<dyn PlanGenerator>>,
    narrator: Narrator,
    narration_capacity: usize,
    playback: PlaybackSettings,
    timeout: Option<Duration>,
}

impl SessionBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            generator: None,
            narrator: Narrator::default(),
            narration_capacity: DEFAULT_LOG_CAPACITY,
            playback: PlaybackSettings::default(),
            timeout: None,
        }
    }

    /// Creates a builder with narration, playback and timeout taken from
    /// `config`.
    pub fn from_config(config: &GlacierConfig) -> Self {
        Self::new()
            .with_narrator(config.narration.narrator())
            .with_narration_capacity(config.narration.capacity)
            .with_playback(config.playback.settings())
            .with_timeout(config.session.timeout())
    }

    /// Sets the service that turns prompts into plans. Required.
    pub fn with_generator<G: PlanGenerator + 'static>(self, generator: G) -> Self {
        self.with_shared_generator(Arc::new(generator))
    }

    /// Sets an already shared plan generator.
    pub fn with_shared_generator(mut self, generator: Arc<dyn PlanGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    pub fn with_narrator(mut self, narrator: Narrator) -> Self {
        self.narrator = narrator;
        self
    }

    /// Sets how many narration lines the session retains, at most
    /// [`DEFAULT_LOG_CAPACITY`].
    pub fn with_narration_capacity(mut self, capacity: usize) -> Self {
        self.narration_capacity = capacity;
        self
    }

    pub fn with_playback(mut self, settings: PlaybackSettings) -> Self {
        self.playback = settings;
        self
    }

    /// Fails attempts whose generation call takes longer than `timeout`.
    ///
    /// `None`, the default, waits indefinitely.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builds an idle session.
    ///
    /// # Errors
    ///
    /// Returns `ArchitectError::Configuration` if no generator was set or the
    /// narration capacity is zero or above [`DEFAULT_LOG_CAPACITY`].
    pub fn build(self) -> Result<Session> {
        let generator = self
            .generator
            .ok_or_else(|| ArchitectError::configuration("a plan generator is required"))?;
        if !(1..=DEFAULT_LOG_CAPACITY).contains(&self.narration_capacity) {
            return Err(ArchitectError::configuration(format!(
                "narration capacity must be between 1 and {DEFAULT_LOG_CAPACITY}"
            )));
        }

        Ok(Session::new(
            generator,
            self.narrator,
            self.narration_capacity,
            Playback::new(self.playback),
            self.timeout,
        ))
    }
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}
