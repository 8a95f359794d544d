use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("{0}")]
    Store(String),
    #[error("Malformed item: {0}")]
    Decode(String),
    #[error("Not found")]
    NotFound,
}
