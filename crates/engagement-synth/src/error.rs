use thiserror::Error;

#[derive(Debug, Error)]
pub enum SynthError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("precondition violated: {0}")]
    Precondition(String),
}

pub type SynthResult<T> = Result<T, SynthError>;
