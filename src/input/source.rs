use async_trait::async_trait;
use crate::core::{Algorithm, AlgorithmInput, InputError, StepBatch};
use thiserror::Error;

/// Errors raised while obtaining a step sequence
#[derive(Debug, Error)]
pub enum StepSourceError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Step service returned {code}: {message}")]
    Status { code: u16, message: String },

    #[error("Malformed step data: {0}")]
    Decode(String),

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Input(#[from] InputError),
}

/// Result type for step source operations
pub type StepResult<T> = Result<T, StepSourceError>;

/// Where step sequences come from
///
/// Implementations:
/// - `HttpStepSource` asks the step-generation service
/// - `FileStepSource` reads a previously saved batch
/// - `MockStepSource` serves canned batches for tests
#[async_trait]
pub trait StepSource: Send + Sync {
    /// Name shown in logs and status lines
    fn name(&self) -> &str;

    /// Produce the ordered steps of `algorithm` run on `input`
    async fn fetch(&self, algorithm: Algorithm, input: &AlgorithmInput) -> StepResult<StepBatch>;
}
