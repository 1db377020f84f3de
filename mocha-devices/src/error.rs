use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("invalid value: {0}")]
    InvalidValue(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("search corpus not set; call set_corpus before searching")]
    CorpusNotSet,
}
