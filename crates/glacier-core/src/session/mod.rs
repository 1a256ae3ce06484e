//! Synthesis session controller.
//!
//! A [`Session`] owns the lifecycle of one interactive synthesis surface:
//!
//! ```text
//!            start(prompt)                 call settles
//!   Idle ───────────────────▶ Synthesizing ─────────────┬──▶ Ready(plan)
//!    ▲                            │   ▲                  └──▶ Failed(message)
//!    │                            │   │ supersede(prompt)
//!    └── (never returns)          └───┘
//! ```
//!
//! Each accepted start launches two tasks that run on independent clocks:
//! the [`Narrator`](crate::narrator::Narrator), which decorates the wait, and
//! the attempt driver, which awaits the real generation call. The driver
//! stops the narrator and waits for it to end before it publishes the
//! terminal state, so narration never outlives its attempt whichever task
//! finishes first.
//!
//! Every attempt carries a sequence number. Only the newest attempt may
//! write narration lines or settle the session; a settlement from an older
//! attempt (possible through [`Session::supersede`]) is discarded.
//!
//! All mutation happens under a single lock that is never held across an
//! await point.

use std::{sync::Arc, time::Duration};

use jiff::Timestamp;
use log::{debug, info, warn};
use parking_lot::Mutex;
use serde::Serialize;
use tokio::{
    sync::{broadcast, watch},
    task::AbortHandle,
};

use crate::{
    error::{Result, SYNTHESIS_FAILED_MESSAGE},
    generator::PlanGenerator,
    models::{Plan, SessionStatus},
    narrator::{NarrationLog, Narrator},
    playback::{EdgeFrame, Playback},
};

pub mod builder;
mod driver;


pub use builder::SessionBuilder;

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Result of a call to [`Session::start`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// A new attempt was launched.
    Accepted { attempt: u64 },
    /// The call was ignored and no state changed.
    Skipped(SkipReason),
}

impl StartOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, StartOutcome::Accepted { .. })
    }
}

/// Why a start request was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The prompt was empty or whitespace only
    EmptyPrompt,
    /// An attempt is already outstanding
    AlreadySynthesizing,
}

/// Notifications published as the session changes.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    StatusChanged { attempt: u64, status: SessionStatus },
    Narration { attempt: u64, line: String },
    PlaybackToggled { active: bool },
    /// A settlement arrived for an attempt that is no longer current.
    AttemptDiscarded { attempt: u64 },
}

/// One entry of the status history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusTransition {
    pub status: SessionStatus,
    pub attempt: u64,
    pub at: Timestamp,
}

/// Point-in-time copy of the observable session state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub status: SessionStatus,
    pub prompt: String,
    pub plan: Option<Plan>,
    pub error: Option<String>,
    /// Narration lines, most recent first
    pub narration: Vec<String>,
    pub playback_active: bool,
    pub attempt: u64,
    pub history: Vec<StatusTransition>,
}

#[derive(Debug)]
struct SessionState {
    status: SessionStatus,
    prompt: String,
    plan: Option<Plan>,
    error: Option<String>,
    narration: NarrationLog,
    attempt: u64,
    narration_abort: Option<AbortHandle>,
    history: Vec<StatusTransition>,
}

pub(crate) struct SessionInner {
    state: Mutex<SessionState>,
    playback: Mutex<Playback>,
    generator: Arc<dyn PlanGenerator>,
    narrator: Narrator,
    timeout: Option<Duration>,
    events: broadcast::Sender<SessionEvent>,
    status_tx: watch::Sender<SessionStatus>,
}

/// Handle to a synthesis session. Clones share the same session.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

impl Session {
    pub(crate) fn new(
        generator: Arc<dyn PlanGenerator>,
        narrator: Narrator,
        narration_capacity: usize,
        playback: Playback,
        timeout: Option<Duration>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let (status_tx, _) = watch::channel(SessionStatus::Idle);
        let state = SessionState {
            status: SessionStatus::Idle,
            prompt: String::new(),
            plan: None,
            error: None,
            narration: NarrationLog::new(narration_capacity),
            attempt: 0,
            narration_abort: None,
            history: vec![StatusTransition {
                status: SessionStatus::Idle,
                attempt: 0,
                at: Timestamp::now(),
            }],
        };

        Self {
            inner: Arc::new(SessionInner {
                state: Mutex::new(state),
                playback: Mutex::new(playback),
                generator,
                narrator,
                timeout,
                events,
                status_tx,
            }),
        }
    }

    /// Submits `prompt` for synthesis.
    ///
    /// Ignored when the prompt is blank or an attempt is already
    /// outstanding. Otherwise the previous plan, error, narration and
    /// playback are cleared, the status becomes `Synthesizing` before this
    /// returns, and narration plus the generation call are launched. Must be
    /// called from within a Tokio runtime.
    pub fn start(&self, prompt: &str) -> StartOutcome {
        self.begin(prompt, false)
    }

    /// Like [`start`](Session::start) but without the single-flight guard.
    ///
    /// The previous attempt's narration is cancelled immediately. Its
    /// generation call keeps running; when it settles, its result is
    /// discarded because a newer attempt exists.
    pub fn supersede(&self, prompt: &str) -> StartOutcome {
        self.begin(prompt, true)
    }

    fn begin(&self, prompt: &str, bypass_guard: bool) -> StartOutcome {
        if prompt.trim().is_empty() {
            debug!("Ignoring synthesis request with empty prompt");
            return StartOutcome::Skipped(SkipReason::EmptyPrompt);
        }

        let mut state = self.inner.state.lock();
        if !bypass_guard && state.status == SessionStatus::Synthesizing {
            debug!("Ignoring synthesis request, attempt {} in flight", state.attempt);
            return StartOutcome::Skipped(SkipReason::AlreadySynthesizing);
        }

        if let Some(previous) = state.narration_abort.take() {
            debug!("Cancelling narration of attempt {}", state.attempt);
            previous.abort();
        }
        self.inner.reset_playback();

        state.attempt += 1;
        let attempt = state.attempt;
        state.prompt = prompt.to_string();
        state.plan = None;
        state.error = None;
        state.narration.clear();
        self.inner.set_status(&mut state, SessionStatus::Synthesizing);

        let sink = Arc::downgrade(&self.inner);
        let narration = self.inner.narrator.start(move |line| {
            sink.upgrade()
                .is_some_and(|inner| inner.apply_narration(attempt, line))
        });
        state.narration_abort = narration.abort_handle();
        drop(state);

        info!("Synthesis attempt {attempt} started");
        tokio::spawn(driver::run_attempt(
            Arc::clone(&self.inner),
            attempt,
            prompt.to_string(),
            narration,
        ));

        StartOutcome::Accepted { attempt }
    }

    /// Flips playback of the ready plan and returns whether it is now
    /// active. A no-op returning `false` unless the session is `Ready`.
    pub fn toggle_playback(&self) -> bool {
        let state = self.inner.state.lock();
        let plan = match (&state.status, &state.plan) {
            (SessionStatus::Ready, Some(plan)) => plan,
            _ => {
                debug!("Ignoring playback toggle while {}", state.status.as_str());
                return false;
            }
        };

        let active = self.inner.playback.lock().toggle(plan);
        self.inner.emit(SessionEvent::PlaybackToggled { active });
        active
    }

    /// Current playback frame of every plan edge.
    pub fn playback_frames(&self) -> Vec<EdgeFrame> {
        self.inner.playback.lock().frames()
    }

    pub fn playback_active(&self) -> bool {
        self.inner.playback.lock().is_active()
    }

    pub fn status(&self) -> SessionStatus {
        self.inner.state.lock().status
    }

    pub fn prompt(&self) -> String {
        self.inner.state.lock().prompt.clone()
    }

    pub fn plan(&self) -> Option<Plan> {
        self.inner.state.lock().plan.clone()
    }

    pub fn error(&self) -> Option<String> {
        self.inner.state.lock().error.clone()
    }

    /// Narration lines, most recent first.
    pub fn narration(&self) -> Vec<String> {
        self.inner.state.lock().narration.to_vec()
    }

    pub fn history(&self) -> Vec<StatusTransition> {
        self.inner.state.lock().history.clone()
    }

    /// Copies the whole observable state under one lock.
    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.inner.state.lock();
        let playback_active = self.inner.playback.lock().is_active();
        SessionSnapshot {
            status: state.status,
            prompt: state.prompt.clone(),
            plan: state.plan.clone(),
            error: state.error.clone(),
            narration: state.narration.to_vec(),
            playback_active,
            attempt: state.attempt,
            history: state.history.clone(),
        }
    }

    /// Subscribes to session events emitted from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.events.subscribe()
    }

    /// Waits until no attempt is outstanding and returns the status.
    pub async fn wait_settled(&self) -> SessionStatus {
        let mut status = self.inner.status_tx.subscribe();
        let settled = match status
            .wait_for(|status| *status != SessionStatus::Synthesizing)
            .await
        {
            Ok(settled) => *settled,
            // The sender lives as long as `self`, so this is unreachable in
            // practice; fall back to the locked state.
            Err(_) => self.status(),
        };
        settled
    }

    /// Submits `prompt` and waits for the attempt to settle.
    ///
    /// Returns the skip reason unchanged when the request is ignored.
    pub async fn synthesize(&self, prompt: &str) -> std::result::Result<SessionStatus, SkipReason> {
        match self.start(prompt) {
            StartOutcome::Accepted { .. } => Ok(self.wait_settled().await),
            StartOutcome::Skipped(reason) => Err(reason),
        }
    }
}

impl SessionInner {
    fn emit(&self, event: SessionEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    fn set_status(&self, state: &mut SessionState, status: SessionStatus) {
        state.status = status;
        state.history.push(StatusTransition {
            status,
            attempt: state.attempt,
            at: Timestamp::now(),
        });
        self.status_tx.send_replace(status);
        self.emit(SessionEvent::StatusChanged {
            attempt: state.attempt,
            status,
        });
    }

    /// Stops playback and forgets the frames of the plan being replaced.
    fn reset_playback(&self) {
        let mut playback = self.playback.lock();
        let was_active = playback.is_active();
        playback.reset();
        if was_active {
            self.emit(SessionEvent::PlaybackToggled { active: false });
        }
    }

    /// Narration sink. Rejects lines once the attempt is stale or settled.
    fn apply_narration(&self, attempt: u64, line: &str) -> bool {
        let mut state = self.state.lock();
        if state.attempt != attempt || state.status != SessionStatus::Synthesizing {
            return false;
        }
        state.narration.push(line);
        self.emit(SessionEvent::Narration {
            attempt,
            line: line.to_string(),
        });
        true
    }

    /// Publishes the terminal state of `attempt` unless it has been
    /// superseded.
    fn settle(&self, attempt: u64, outcome: Result<Plan>) {
        let mut state = self.state.lock();
        if state.attempt != attempt {
            warn!(
                "Discarding settlement of attempt {attempt}, attempt {} is current",
                state.attempt
            );
            self.emit(SessionEvent::AttemptDiscarded { attempt });
            return;
        }

        state.narration_abort = None;
        match outcome {
            Ok(plan) => {
                info!(
                    "Synthesis attempt {attempt} produced '{}' with {} steps",
                    plan.name,
                    plan.steps.len()
                );
                state.plan = Some(plan);
                self.set_status(&mut state, SessionStatus::Ready);
            }
            Err(e) => {
                warn!("Synthesis attempt {attempt} failed: {e}");
                state.error = Some(SYNTHESIS_FAILED_MESSAGE.to_string());
                self.set_status(&mut state, SessionStatus::Failed);
            }
        }
    }
}
