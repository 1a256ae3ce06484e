//! Command handlers.
//!
//! Each handler builds the core objects it needs from the resolved
//! configuration, drives them, and renders the result as markdown.

use std::{sync::Arc, time::Duration};

use anyhow::{bail, Context, Result};
use glacier_core::{
    generator::{FilePlanGenerator, GeminiClient, PlanGenerator},
    session::SkipReason,
    GlacierConfig, OperationStatus, PlaybackFrames, Session, SessionBuilder, SessionEvent,
    SessionStatus, StartOutcome, SupportChat, Transcript,
};
use log::{debug, warn};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::broadcast::error::RecvError,
};

use crate::{
    args::{ChatArgs, SynthesizeArgs},
    renderer::TerminalRenderer,
};

pub struct Cli {
    config: GlacierConfig,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(config: GlacierConfig, renderer: TerminalRenderer) -> Self {
        Self { config, renderer }
    }

    pub async fn handle_synthesize(&self, args: &SynthesizeArgs) -> Result<()> {
        let generator: Arc<dyn PlanGenerator> = match &args.plan_file {
            Some(path) => Arc::new(
                FilePlanGenerator::new(path).with_latency(Duration::from_millis(args.latency_ms)),
            ),
            None => Arc::new(
                GeminiClient::from_env(self.config.generator.clone())
                    .context("Failed to create Gemini client")?,
            ),
        };

        let mut builder = SessionBuilder::from_config(&self.config).with_shared_generator(generator);
        if let Some(timeout_ms) = args.timeout_ms {
            builder = builder.with_timeout(Some(Duration::from_millis(timeout_ms)));
        }
        let session = builder.build().context("Failed to create session")?;

        let mut events = session.subscribe();
        match session.start(&args.prompt) {
            StartOutcome::Accepted { attempt } => debug!("Attempt {attempt} accepted"),
            StartOutcome::Skipped(SkipReason::EmptyPrompt) => {
                bail!("Nothing to synthesize: the prompt is empty")
            }
            StartOutcome::Skipped(reason) => bail!("Synthesis was not started: {reason:?}"),
        }

        self.render(&format!("## Synthesizing: {}\n\n", args.prompt.trim()))?;
        self.follow_narration(&mut events).await?;

        let status = session.wait_settled().await;
        self.render(&format!("\n{}", session.snapshot()))?;
        if status != SessionStatus::Ready {
            bail!("Synthesis did not produce a plan");
        }

        if let Some(playback_ms) = args.playback_ms {
            self.run_playback(&session, Duration::from_millis(playback_ms))
                .await?;
        }
        Ok(())
    }

    /// Prints narration lines until the attempt settles.
    async fn follow_narration(
        &self,
        events: &mut tokio::sync::broadcast::Receiver<SessionEvent>,
    ) -> Result<()> {
        loop {
            match events.recv().await {
                Ok(SessionEvent::Narration { line, .. }) => self.render(&format!("- {line}\n"))?,
                Ok(SessionEvent::StatusChanged { status, .. }) if status.is_terminal() => break,
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => warn!("Skipped {skipped} session events"),
                Err(RecvError::Closed) => break,
            }
        }
        Ok(())
    }

    async fn run_playback(&self, session: &Session, duration: Duration) -> Result<()> {
        if !session.toggle_playback() {
            self.render(&OperationStatus::failure("Playback is unavailable".to_string()).to_string())?;
            return Ok(());
        }

        tokio::time::sleep(duration).await;
        let frames = PlaybackFrames(session.playback_frames());
        self.render(&format!(
            "\n## Playback after {}ms\n\n{frames}",
            duration.as_millis()
        ))?;

        session.toggle_playback();
        Ok(())
    }

    pub async fn handle_chat(&self, args: ChatArgs) -> Result<()> {
        let responder = GeminiClient::from_env(self.config.generator.clone())
            .context("Failed to create Gemini client")?;
        let chat = SupportChat::new(Arc::new(responder));

        let messages = if args.messages.is_empty() {
            read_stdin_lines().await?
        } else {
            args.messages
        };

        for message in &messages {
            let outcome = chat.send(message).await;
            debug!("Chat outcome: {outcome:?}");
        }

        self.render(&Transcript(chat.transcript()).to_string())
    }

    pub fn show_config(&self) -> Result<()> {
        let yaml =
            serde_yaml::to_string(&self.config).context("Failed to serialize configuration")?;
        print!("{yaml}");
        Ok(())
    }

    fn render(&self, markdown: &str) -> Result<()> {
        self.renderer.render(markdown)
    }
}

async fn read_stdin_lines() -> Result<Vec<String>> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut messages = Vec::new();
    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        messages.push(line);
    }
    Ok(messages)
}
