use async_trait::async_trait;
use crate::core::{Algorithm, AlgorithmInput, AlgorithmStep, StepBatch};
use crate::input::source::{StepResult, StepSource, StepSourceError};
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};

/// Step source for testing without the step service
///
/// Serves batches injected per algorithm, in order. With no batch queued
/// it either fails or, if auto-generate is enabled, synthesizes a short
/// run. Every request is recorded for later inspection.
pub struct MockStepSource {
    name: String,
    queued: Mutex<HashMap<Algorithm, VecDeque<StepResult<StepBatch>>>>,
    requests: Mutex<Vec<(Algorithm, AlgorithmInput)>>,
    auto_generate: bool,
}

impl MockStepSource {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            queued: Mutex::new(HashMap::new()),
            requests: Mutex::new(Vec::new()),
            auto_generate: false,
        }
    }

    /// Synthesize steps when nothing is queued
    pub fn set_auto_generate(&mut self, enabled: bool) {
        self.auto_generate = enabled;
    }

    /// Queue steps to serve for `algorithm`
    pub fn inject_steps(&self, algorithm: Algorithm, steps: Vec<AlgorithmStep>) {
        self.inject(algorithm, Ok(StepBatch::new(algorithm, steps)));
    }

    /// Queue a failure to serve for `algorithm`
    pub fn inject_error(&self, algorithm: Algorithm, error: StepSourceError) {
        self.inject(algorithm, Err(error));
    }

    fn inject(&self, algorithm: Algorithm, result: StepResult<StepBatch>) {
        self.queued
            .lock()
            .entry(algorithm)
            .or_default()
            .push_back(result);
    }

    /// All requests received so far, oldest first
    pub fn take_requests(&self) -> Vec<(Algorithm, AlgorithmInput)> {
        self.requests.lock().drain(..).collect()
    }

    fn generate(algorithm: Algorithm, count: usize) -> StepBatch {
        let steps = (0..count)
            .map(|i| AlgorithmStep::new("mock", &format!("{} step {}", algorithm.display_name(), i + 1)))
            .collect();
        StepBatch::new(algorithm, steps)
    }
}

#[async_trait]
impl StepSource for MockStepSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, algorithm: Algorithm, input: &AlgorithmInput) -> StepResult<StepBatch> {
        self.requests.lock().push((algorithm, input.clone()));

        let queued = self
            .queued
            .lock()
            .get_mut(&algorithm)
            .and_then(VecDeque::pop_front);

        match queued {
            Some(result) => result,
            None if self.auto_generate => Ok(Self::generate(algorithm, 5)),
            None => Err(StepSourceError::Status {
                code: 404,
                message: format!("No steps queued for {algorithm}"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_serves_injected_in_order() {
        let source = MockStepSource::new("mock");
        source.inject_steps(Algorithm::Bubble, vec![AlgorithmStep::new("compare", "first")]);
        source.inject_error(Algorithm::Bubble, StepSourceError::Network("down".into()));

        let input = AlgorithmInput::Array(vec![2, 1]);
        let batch = source.fetch(Algorithm::Bubble, &input).await.unwrap();
        assert_eq!(batch.steps[0].description, "first");

        let err = source.fetch(Algorithm::Bubble, &input).await.unwrap_err();
        assert!(matches!(err, StepSourceError::Network(_)));

        let err = source.fetch(Algorithm::Bubble, &input).await.unwrap_err();
        assert!(matches!(err, StepSourceError::Status { code: 404, .. }));

        let requests = source.take_requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[0], (Algorithm::Bubble, input));
        assert!(source.take_requests().is_empty());
    }

    #[tokio::test]
    async fn test_auto_generate() {
        let mut source = MockStepSource::new("mock");
        source.set_auto_generate(true);

        let batch = source
            .fetch(Algorithm::Fibonacci, &AlgorithmInput::Number(4))
            .await
            .unwrap();
        assert_eq!(batch.algorithm, Algorithm::Fibonacci);
        assert_eq!(batch.steps.len(), 5);
        assert_eq!(batch.steps[4].description, "Fibonacci step 5");
    }
}
