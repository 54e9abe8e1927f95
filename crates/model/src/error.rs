use thiserror::Error;

pub type Result<T> = std::result::Result<T, ModelError>;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Invalid research goal: {0}")]
    InvalidGoal(String),

    #[error("Duplicate hypothesis id: {0}")]
    DuplicateId(String),

    #[error("Unknown parent hypothesis: {0}")]
    UnknownParent(String),

    #[error("Hypothesis not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
