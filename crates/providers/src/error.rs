use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProviderError>;

/// Failure taxonomy for collaborator calls.
///
/// `Transient` is worth retrying. `Config` never is: the call would fail the
/// same way again until someone fixes a key, a model id or a URL. `Malformed`
/// means the collaborator answered but the payload was unusable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Transient provider error: {0}")]
    Transient(String),

    #[error("Provider configuration error: {0}")]
    Config(String),

    #[error("Malformed provider response: {0}")]
    Malformed(String),
}

impl ProviderError {
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}
