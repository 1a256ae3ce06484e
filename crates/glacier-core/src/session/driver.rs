//! Per-attempt task that owns the generation call.

use std::{sync::Arc, time::Duration};

use log::debug;

use super::SessionInner;
use crate::{
    error::{ArchitectError, Result},
    generator::PlanGenerator,
    models::Plan,
    narrator::NarrationHandle,
};

/// Awaits the generation call for `attempt`, stops its narration, then
/// settles the session.
///
/// The narration task is aborted and joined before `settle` runs, so no
/// narration line can land after the terminal status is visible.
pub(super) async fn run_attempt(
    inner: Arc<SessionInner>,
    attempt: u64,
    prompt: String,
    mut narration: NarrationHandle,
) {
    let outcome = call_generator(Arc::clone(&inner.generator), prompt, inner.timeout).await;

    narration.stop_and_wait().await;
    debug!("Narration of attempt {attempt} stopped");

    inner.settle(attempt, outcome);
}

/// Runs the generation call in its own task so a panicking generator fails
/// the attempt instead of leaving the session stuck.
async fn call_generator(
    generator: Arc<dyn PlanGenerator>,
    prompt: String,
    timeout: Option<Duration>,
) -> Result<Plan> {
    let mut call = tokio::spawn(async move { generator.generate(&prompt).await });

    let joined = match timeout {
        Some(limit) => match tokio::time::timeout(limit, &mut call).await {
            Ok(joined) => joined,
            Err(_) => {
                call.abort();
                return Err(ArchitectError::Timeout { elapsed: limit });
            }
        },
        None => call.await,
    };

    let plan = joined.map_err(|e| ArchitectError::Task {
        message: format!("Generation task failed: {e}"),
    })??;
    plan.validate()?;
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::models::{Step, StepKind};

    struct Fixed(Option<Plan>);

    #[async_trait]
    impl PlanGenerator for Fixed {
        async fn generate(&self, _prompt: &str) -> Result<Plan> {
            self.0
                .clone()
                .ok_or_else(|| ArchitectError::generation("nothing to return"))
        }
    }

    struct Panicking;

    #[async_trait]
    impl PlanGenerator for Panicking {
        async fn generate(&self, _prompt: &str) -> Result<Plan> {
            panic!("generator exploded");
        }
    }

    struct Stalled;

    #[async_trait]
    impl PlanGenerator for Stalled {
        async fn generate(&self, _prompt: &str) -> Result<Plan> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_invalid_plan_is_an_error() {
        let generator = Arc::new(Fixed(Some(Plan::new("No steps", vec![]))));
        let result = call_generator(generator, "p".to_string(), None).await;
        assert!(matches!(result, Err(ArchitectError::InvalidInput { .. })));
    }

    #[tokio::test]
    async fn test_valid_plan_passes_through() {
        let plan = Plan::new(
            "Ok",
            vec![Step::new("1", StepKind::Trigger, "Hook", "Receives calls")],
        );
        let generator = Arc::new(Fixed(Some(plan.clone())));
        let result = call_generator(generator, "p".to_string(), None).await;
        assert_eq!(result.unwrap(), plan);
    }

    #[tokio::test]
    async fn test_panicking_generator_becomes_task_error() {
        let result = call_generator(Arc::new(Panicking), "p".to_string(), None).await;
        assert!(matches!(result, Err(ArchitectError::Task { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_fails_stalled_call() {
        let limit = Duration::from_secs(5);
        let result = call_generator(Arc::new(Stalled), "p".to_string(), Some(limit)).await;
        assert!(matches!(result, Err(ArchitectError::Timeout { elapsed }) if elapsed == limit));
    }
}
