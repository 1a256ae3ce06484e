//! Offline plan generator backed by a JSON file.

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use async_trait::async_trait;
use log::debug;
use tokio::task;

use super::PlanGenerator;
use crate::{
    error::{ArchitectError, Result},
    models::Plan,
};

/// Serves the plan stored at `path` after a fixed simulated latency.
///
/// The file is read on every call, so edits are picked up by the next
/// synthesis. The prompt is only logged.
#[derive(Debug, Clone)]
pub struct FilePlanGenerator {
    path: PathBuf,
    latency: Duration,
}

impl FilePlanGenerator {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            latency: Duration::ZERO,
        }
    }

    /// Sets the delay applied before the plan is returned.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl PlanGenerator for FilePlanGenerator {
    async fn generate(&self, prompt: &str) -> Result<Plan> {
        debug!(
            "Replaying plan from {} for prompt '{prompt}'",
            self.path.display()
        );
        tokio::time::sleep(self.latency).await;

        let path = self.path.clone();
        task::spawn_blocking(move || {
            let content = std::fs::read_to_string(&path).map_err(|e| ArchitectError::FileSystem {
                path: path.clone(),
                source: e,
            })?;
            Ok::<Plan, ArchitectError>(serde_json::from_str(&content)?)
        })
        .await
        .map_err(|e| ArchitectError::Task {
            message: format!("Task join error: {e}"),
        })?
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    const PLAN_JSON: &str = r#"{
        "name": "Replay",
        "steps": [
            {"id": "1", "type": "trigger", "title": "Cron", "description": "Every morning"},
            {"id": "2", "type": "action", "title": "Email", "description": "Send digest"}
        ]
    }"#;

    #[tokio::test]
    async fn test_replays_plan_from_file() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("plan.json");
        std::fs::write(&path, PLAN_JSON).unwrap();

        let plan = FilePlanGenerator::new(&path)
            .generate("anything")
            .await
            .expect("Failed to replay plan");
        assert_eq!(plan.name, "Replay");
        assert_eq!(plan.steps.len(), 2);
    }

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let result = FilePlanGenerator::new(dir.path().join("absent.json"))
            .generate("anything")
            .await;
        assert!(matches!(result, Err(ArchitectError::FileSystem { .. })));
    }

    #[tokio::test]
    async fn test_malformed_file_is_an_error() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("plan.json");
        std::fs::write(&path, "{not json").unwrap();

        let result = FilePlanGenerator::new(&path).generate("anything").await;
        assert!(matches!(result, Err(ArchitectError::Serialization { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_is_applied() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("plan.json");
        std::fs::write(&path, PLAN_JSON).unwrap();

        let generator = FilePlanGenerator::new(&path).with_latency(Duration::from_secs(3));
        let started = tokio::time::Instant::now();
        generator.generate("slow").await.unwrap();
        assert!(started.elapsed() >= Duration::from_secs(3));
    }
}
