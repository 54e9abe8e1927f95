use coscientist_model::ModelError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LiteratureError>;

#[derive(Error, Debug)]
pub enum LiteratureError {
    #[error("Store error: {0}")]
    Store(#[from] ModelError),
}
