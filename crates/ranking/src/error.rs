use coscientist_model::ModelError;
use coscientist_providers::ProviderError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RankingError>;

#[derive(Error, Debug)]
pub enum RankingError {
    #[error("Judge error: {0}")]
    Judge(#[from] ProviderError),

    #[error("Store error: {0}")]
    Store(#[from] ModelError),

    #[error("Unknown contestant: {0}")]
    UnknownContestant(String),
}
