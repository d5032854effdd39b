pub mod algorithm;
pub mod pseudocode;
pub mod step;

pub use algorithm::{Algorithm, AlgorithmFamily, AlgorithmInput, InputError};
pub use step::{annotate, AlgorithmStep, StepBatch, StepFrame};
