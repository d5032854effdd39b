use anyhow::{Context, Result};
use async_trait::async_trait;
use crate::core::{Algorithm, AlgorithmInput, AlgorithmStep, StepBatch};
use crate::input::source::{StepResult, StepSource, StepSourceError};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Accepted step file layouts
///
/// - a batch written by `save_batch`
/// - a raw step-service response: `{"steps": [...], "complexity": {...}}`
/// - a bare array of steps
#[derive(Deserialize)]
#[serde(untagged)]
enum StepFile {
    Batch(StepBatch),
    Response {
        steps: Vec<AlgorithmStep>,
        #[serde(default)]
        complexity: BTreeMap<String, Value>,
    },
    Steps(Vec<AlgorithmStep>),
}

/// Decode step file contents, attributing bare steps to `algorithm`
///
/// A saved batch keeps the algorithm it was recorded for.
pub fn parse_batch(text: &str, algorithm: Algorithm) -> StepResult<StepBatch> {
    let file: StepFile =
        serde_json::from_str(text).map_err(|e| StepSourceError::Decode(e.to_string()))?;

    let batch = match file {
        StepFile::Batch(batch) => {
            if batch.algorithm != algorithm {
                warn!(
                    requested = %algorithm,
                    recorded = %batch.algorithm,
                    "Step file was recorded for a different algorithm"
                );
            }
            batch
        }
        StepFile::Response { steps, complexity } => {
            let mut batch = StepBatch::new(algorithm, steps);
            batch.complexity = complexity
                .into_iter()
                .map(|(key, value)| match value {
                    Value::String(text) => (key, text),
                    other => (key, other.to_string()),
                })
                .collect();
            batch
        }
        StepFile::Steps(steps) => StepBatch::new(algorithm, steps),
    };

    Ok(batch)
}

/// Read a step file from disk
pub async fn load_batch(path: &Path, algorithm: Algorithm) -> StepResult<StepBatch> {
    let text = tokio::fs::read_to_string(path).await?;
    let batch = parse_batch(&text, algorithm)?;
    info!(path = %path.display(), steps = batch.steps.len(), "Loaded step file");
    Ok(batch)
}

/// Write a batch so it can be replayed later without the step service
pub fn save_batch(path: &Path, batch: &StepBatch) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(batch).context("Failed to encode steps")?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;

    info!(path = %path.display(), steps = batch.steps.len(), "Saved step file");
    Ok(())
}

/// Replays steps from a JSON file
pub struct FileStepSource {
    path: PathBuf,
    name: String,
}

impl FileStepSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path.display().to_string();
        Self { path, name }
    }
}

#[async_trait]
impl StepSource for FileStepSource {
    fn name(&self) -> &str {
        &self.name
    }

    /// The input is ignored; the file already fixes the run
    async fn fetch(&self, algorithm: Algorithm, _input: &AlgorithmInput) -> StepResult<StepBatch> {
        load_batch(&self.path, algorithm).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_bare_steps() {
        let text = json!([
            {"type": "call", "n": 3, "description": "factorial(3)"},
            {"type": "base_case", "n": 1, "description": "base"}
        ])
        .to_string();

        let batch = parse_batch(&text, Algorithm::Factorial).unwrap();
        assert_eq!(batch.algorithm, Algorithm::Factorial);
        assert_eq!(batch.steps.len(), 2);
        assert!(batch.complexity.is_empty());
    }

    #[test]
    fn test_parse_service_response() {
        let text = json!({
            "steps": [{"type": "visit", "node": 1, "description": "Visiting node 1"}],
            "complexity": {"time": "O(n)", "space": "O(h)"}
        })
        .to_string();

        let batch = parse_batch(&text, Algorithm::Preorder).unwrap();
        assert_eq!(batch.steps[0].node(), Some(1));
        assert_eq!(batch.complexity["space"], "O(h)");
    }

    #[test]
    fn test_saved_batch_keeps_algorithm() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runs").join("dfs.json");
        let batch = StepBatch::new(
            Algorithm::Dfs,
            vec![AlgorithmStep::new("pop", "Pop node 0").with("current", json!(0))],
        );
        save_batch(&path, &batch).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let loaded = parse_batch(&text, Algorithm::Bfs).unwrap();
        assert_eq!(loaded.algorithm, Algorithm::Dfs);
        assert_eq!(loaded.steps, batch.steps);
        assert_eq!(loaded.fetched_at, batch.fetched_at);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            parse_batch("{\"nope\": 1}", Algorithm::Bubble),
            Err(StepSourceError::Decode(_))
        ));
        assert!(matches!(
            parse_batch("[{\"description\": \"no type\"}]", Algorithm::Bubble),
            Err(StepSourceError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn test_file_source_fetch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("steps.json");
        std::fs::write(&path, json!([{"type": "compare", "description": "c"}]).to_string()).unwrap();

        let source = FileStepSource::new(&path);
        let batch = source
            .fetch(Algorithm::Bubble, &AlgorithmInput::Array(vec![1]))
            .await
            .unwrap();
        assert_eq!(batch.steps[0].kind, "compare");

        let missing = FileStepSource::new(dir.path().join("missing.json"));
        let err = missing
            .fetch(Algorithm::Bubble, &AlgorithmInput::Array(vec![1]))
            .await
            .unwrap_err();
        assert!(matches!(err, StepSourceError::Io(_)));
    }
}
