use coscientist_model::ModelError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

/// Failures that abort a cycle.
///
/// Collaborator failures never appear here: they degrade the affected stage
/// inside the cycle report instead.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Data integrity error: {0}")]
    DataIntegrity(String),
}

impl From<ModelError> for EngineError {
    fn from(err: ModelError) -> Self {
        Self::DataIntegrity(err.to_string())
    }
}
