#![allow(dead_code)]

use std::{
    collections::VecDeque,
    sync::atomic::{AtomicUsize, Ordering},
    sync::Arc,
    time::Duration,
};

use async_trait::async_trait;
use glacier_core::{
    generator::{ChatResponder, PlanGenerator},
    models::{ChatMessage, Plan, Step, StepKind},
    ArchitectError, Result, Session, SessionBuilder,
};
use parking_lot::Mutex;

/// One scripted answer of a [`ScriptedGenerator`].
#[derive(Debug, Clone)]
pub enum Reply {
    Plan { latency: Duration, plan: Plan },
    Fail { latency: Duration, message: String },
}

impl Reply {
    pub fn plan_after(ms: u64, plan: Plan) -> Self {
        Reply::Plan {
            latency: Duration::from_millis(ms),
            plan,
        }
    }

    pub fn fail_after(ms: u64, message: &str) -> Self {
        Reply::Fail {
            latency: Duration::from_millis(ms),
            message: message.to_string(),
        }
    }
}

/// Plan generator answering calls from a queue of replies, in call order.
#[derive(Default)]
pub struct ScriptedGenerator {
    replies: Mutex<VecDeque<Reply>>,
    prompts: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl ScriptedGenerator {
    pub fn new(replies: Vec<Reply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl PlanGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> Result<Plan> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().push(prompt.to_string());
        let reply = self.replies.lock().pop_front();

        match reply {
            Some(Reply::Plan { latency, plan }) => {
                tokio::time::sleep(latency).await;
                Ok(plan)
            }
            Some(Reply::Fail { latency, message }) => {
                tokio::time::sleep(latency).await;
                Err(ArchitectError::generation(message))
            }
            None => Err(ArchitectError::generation("no scripted reply left")),
        }
    }
}

/// Chat responder answering from a queue; `None` entries fail the call.
pub struct ScriptedResponder {
    replies: Mutex<VecDeque<Option<String>>>,
    histories: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedResponder {
    pub fn new(replies: Vec<Option<&str>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into_iter().map(|r| r.map(str::to_string)).collect()),
            histories: Mutex::new(Vec::new()),
        })
    }

    /// History passed to each call, in call order.
    pub fn histories(&self) -> Vec<Vec<ChatMessage>> {
        self.histories.lock().clone()
    }
}

#[async_trait]
impl ChatResponder for ScriptedResponder {
    async fn respond(&self, _message: &str, history: &[ChatMessage]) -> Result<String> {
        self.histories.lock().push(history.to_vec());
        tokio::time::sleep(Duration::from_millis(100)).await;
        match self.replies.lock().pop_front().flatten() {
            Some(text) => Ok(text),
            None => Err(ArchitectError::generation("chat service down")),
        }
    }
}

/// A valid plan with `steps` steps, starting with a trigger.
pub fn sample_plan(name: &str, steps: usize) -> Plan {
    let steps = (0..steps)
        .map(|i| {
            let kind = match i {
                0 => StepKind::Trigger,
                1 => StepKind::Condition,
                _ => StepKind::Action,
            };
            Step::new(
                (i + 1).to_string(),
                kind,
                format!("Step {}", i + 1),
                format!("Description of step {}", i + 1),
            )
        })
        .collect();
    Plan::new(name, steps)
}

/// Builds a session with default timings around `generator`.
pub fn create_test_session(generator: &Arc<ScriptedGenerator>) -> Session {
    SessionBuilder::new()
        .with_shared_generator(generator.clone())
        .build()
        .expect("Failed to create session")
}

pub async fn advance(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}
