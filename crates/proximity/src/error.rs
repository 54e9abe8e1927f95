use coscientist_providers::ProviderError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProximityError>;

#[derive(Error, Debug)]
pub enum ProximityError {
    #[error("Embedding error: {0}")]
    Embedding(#[from] ProviderError),
}
