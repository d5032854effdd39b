pub mod file;
pub mod http;
#[cfg(test)]
pub mod mock;
pub mod random;
pub mod source;

pub use file::{load_batch, parse_batch, save_batch, FileStepSource};
pub use http::{HttpStepSource, DEFAULT_BASE_URL};
#[cfg(test)]
pub use mock::MockStepSource;
pub use random::random_input;
pub use source::{StepResult, StepSource, StepSourceError};
