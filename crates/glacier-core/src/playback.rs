//! Looping traversal animation over the edges of a ready plan.
//!
//! While active, every step-to-next-step edge runs its own animation task.
//! Edge `i` waits `i * phase_delay`, then sweeps its progress from 0 to 100%
//! once per `period`, forever. Deactivating aborts all edge tasks and resets
//! every frame to the idle state; nothing carries over to the next
//! activation.

use std::{sync::Arc, time::Duration};

use log::debug;
use parking_lot::Mutex;
use serde::Serialize;
use tokio::{
    task::JoinSet,
    time::{Instant, MissedTickBehavior},
};

use crate::models::Plan;

/// Timing of the edge animations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackSettings {
    /// Duration of one 0 → 100% sweep
    pub period: Duration,
    /// Start offset added per edge index
    pub phase_delay: Duration,
    /// Resolution at which frames are updated
    pub tick: Duration,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            period: Duration::from_secs(2),
            phase_delay: Duration::from_millis(400),
            tick: Duration::from_millis(50),
        }
    }
}

/// Visual state of one edge at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EdgeFrame {
    /// Index of the edge (equal to its source step index)
    pub index: usize,
    /// Whether the edge has passed its phase delay and is sweeping
    pub running: bool,
    /// Position of the pulse along the edge, 0..=100
    pub progress: u8,
    /// Pulse opacity, fading in and out over a sweep
    pub opacity: f32,
}

impl EdgeFrame {
    /// The not-simulating state of an edge.
    pub fn idle(index: usize) -> Self {
        Self {
            index,
            running: false,
            progress: 0,
            opacity: 0.0,
        }
    }

    /// Frame for an edge at `phase` (0.0..1.0) of its sweep.
    pub fn at_phase(index: usize, phase: f64) -> Self {
        let phase = phase.clamp(0.0, 1.0);
        Self {
            index,
            running: true,
            progress: (phase * 100.0).round() as u8,
            opacity: (1.0 - (2.0 * phase - 1.0).abs()) as f32,
        }
    }
}

#[derive(Debug)]
struct FrameBoard {
    generation: u64,
    frames: Vec<EdgeFrame>,
}

/// Toggle-driven playback simulator.
#[derive(Debug)]
pub struct Playback {
    settings: PlaybackSettings,
    active: bool,
    board: Arc<Mutex<FrameBoard>>,
    tasks: JoinSet<()>,
}

impl Playback {
    pub fn new(settings: PlaybackSettings) -> Self {
        Self {
            settings,
            active: false,
            board: Arc::new(Mutex::new(FrameBoard {
                generation: 0,
                frames: Vec::new(),
            })),
            tasks: JoinSet::new(),
        }
    }

    pub fn settings(&self) -> PlaybackSettings {
        self.settings
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Flips playback for `plan` and returns the new `active` value.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn toggle(&mut self, plan: &Plan) -> bool {
        if self.active {
            self.stop();
        } else {
            self.start(plan);
        }
        self.active
    }

    /// Starts animating every edge of `plan`, restarting if already active.
    pub fn start(&mut self, plan: &Plan) {
        self.stop();

        let generation = {
            let mut board = self.board.lock();
            board.frames = (0..plan.edge_count()).map(EdgeFrame::idle).collect();
            board.generation
        };

        for edge in plan.edges() {
            let board = Arc::clone(&self.board);
            let settings = self.settings;
            let delay = settings.phase_delay * edge.index as u32;
            self.tasks
                .spawn(animate_edge(board, generation, edge.index, delay, settings));
        }

        debug!(
            "Playback started for '{}' with {} edges",
            plan.name,
            plan.edge_count()
        );
        self.active = true;
    }

    /// Stops all edge animations and resets every frame. Idempotent.
    pub fn stop(&mut self) {
        // Dropping the set aborts every edge task.
        self.tasks = JoinSet::new();

        let mut board = self.board.lock();
        board.generation += 1;
        let edges = board.frames.len();
        board.frames = (0..edges).map(EdgeFrame::idle).collect();

        if self.active {
            debug!("Playback stopped");
        }
        self.active = false;
    }

    /// Stops all edge animations and drops every frame, for when the plan
    /// itself goes away.
    pub fn reset(&mut self) {
        self.stop();
        self.board.lock().frames.clear();
    }

    /// Current frame of every edge, in edge order.
    pub fn frames(&self) -> Vec<EdgeFrame> {
        self.board.lock().frames.clone()
    }
}

impl Default for Playback {
    fn default() -> Self {
        Self::new(PlaybackSettings::default())
    }
}

async fn animate_edge(
    board: Arc<Mutex<FrameBoard>>,
    generation: u64,
    index: usize,
    delay: Duration,
    settings: PlaybackSettings,
) {
    tokio::time::sleep(delay).await;

    let started = Instant::now();
    let period = settings.period.as_nanos().max(1);
    let mut ticker = tokio::time::interval(settings.tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        let phase = (started.elapsed().as_nanos() % period) as f64 / period as f64;

        let mut guard = board.lock();
        if guard.generation != generation {
            return;
        }
        if let Some(frame) = guard.frames.get_mut(index) {
            *frame = EdgeFrame::at_phase(index, phase);
        }
    }
}
