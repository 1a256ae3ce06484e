//! Decorative progress narration shown while a synthesis is outstanding.
//!
//! The narrator emits a fixed script of status lines on a fixed cadence. Its
//! timeline is unrelated to the real generation call: when the script runs out
//! before the call settles, emission simply stops and the log keeps its last
//! state.
//!
//! ```text
//!  t=0      600ms     1200ms    ...   3600ms
//!  start ── line 1 ── line 2 ── ... ── line 6 ── (exhausted, task ends)
//! ```
//!
//! The narrator never touches session state directly; it hands every line to
//! a sink, which decides whether the line may still be applied.

use std::{collections::VecDeque, time::Duration};

use log::{debug, trace};
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;

/// Default number of lines retained by a [`NarrationLog`].
pub const DEFAULT_LOG_CAPACITY: usize = 5;

/// Default cadence between two narration lines.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(600);

/// The stock narration script.
pub const DEFAULT_SCRIPT: [&str; 6] = [
    "Accessing Gemini Neural Cortex...",
    "Deconstructing Natural Language Semantics...",
    "Mapping Infrastructure Topography...",
    "Injecting Resilience Protocols...",
    "Synchronizing Global Mesh Nodes...",
    "Architecture Synthesis Complete.",
];

/// Ordered list of status lines emitted by the narrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NarrationScript(Vec<String>);

impl NarrationScript {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(lines.into_iter().map(Into::into).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn lines(&self) -> &[String] {
        &self.0
    }
}

impl Default for NarrationScript {
    fn default() -> Self {
        Self::new(DEFAULT_SCRIPT)
    }
}

/// Bounded, most-recent-first log of narration lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NarrationLog {
    lines: VecDeque<String>,
    capacity: usize,
}

impl NarrationLog {
    /// Creates an empty log retaining at most `capacity` lines.
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Prepends a line, dropping the oldest one when over capacity.
    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push_front(line.into());
        self.lines.truncate(self.capacity);
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Most recent line, if any.
    pub fn latest(&self) -> Option<&str> {
        self.lines.front().map(String::as_str)
    }

    /// Iterates newest first.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    /// Copies the lines out, newest first.
    pub fn to_vec(&self) -> Vec<String> {
        self.lines.iter().cloned().collect()
    }
}

impl Default for NarrationLog {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_CAPACITY)
    }
}

/// Timer-driven emitter of a [`NarrationScript`].
#[derive(Debug, Clone)]
pub struct Narrator {
    script: NarrationScript,
    interval: Duration,
}

impl Narrator {
    pub fn new(script: NarrationScript, interval: Duration) -> Self {
        Self { script, interval }
    }

    pub fn script(&self) -> &NarrationScript {
        &self.script
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Starts emitting the script, one line per interval, into `sink`.
    ///
    /// The first line is emitted one interval after the call. The sink
    /// returns `false` to signal the line was rejected, which ends the
    /// narration early. Must be called from within a Tokio runtime.
    pub fn start<F>(&self, mut sink: F) -> NarrationHandle
    where
        F: FnMut(&str) -> bool + Send + 'static,
    {
        let script = self.script.clone();
        let interval = self.interval;
        debug!(
            "Starting narration: {} lines every {}ms",
            script.len(),
            interval.as_millis()
        );

        let task = tokio::spawn(async move {
            for line in script.lines() {
                tokio::time::sleep(interval).await;
                trace!("Narration: {line}");
                if !sink(line) {
                    debug!("Narration sink rejected line, stopping");
                    return;
                }
            }
            debug!("Narration script exhausted");
        });

        NarrationHandle { task: Some(task) }
    }
}

impl Default for Narrator {
    fn default() -> Self {
        Self::new(NarrationScript::default(), DEFAULT_INTERVAL)
    }
}

/// Cancellation handle for a running narration.
///
/// Dropping the handle does not stop the narration; call [`stop`] or
/// [`stop_and_wait`].
///
/// [`stop`]: NarrationHandle::stop
/// [`stop_and_wait`]: NarrationHandle::stop_and_wait
#[derive(Debug)]
pub struct NarrationHandle {
    task: Option<JoinHandle<()>>,
}

impl NarrationHandle {
    /// Cancels future emissions. Safe to call repeatedly and after the
    /// script has been exhausted.
    pub fn stop(&mut self) {
        if let Some(task) = &self.task {
            task.abort();
        }
    }

    /// Cancels future emissions and waits until the narration task has
    /// fully ended, so no emission can happen after this returns.
    pub async fn stop_and_wait(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            // Cancellation is the expected outcome here.
            let _ = task.await;
        }
    }

    /// Whether the narration task has ended, by exhaustion or cancellation.
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// A detached handle that can cancel the narration from elsewhere.
    pub fn abort_handle(&self) -> Option<tokio::task::AbortHandle> {
        self.task.as_ref().map(JoinHandle::abort_handle)
    }
}
