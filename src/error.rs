use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("dictionary `{0}` is not bundled")]
    UnknownDictionary(String),

    #[error("dictionary `{0}` has no words")]
    EmptyDictionary(String),

    #[error("unsupported duration {0}s (expected one of 15, 30, 60, 120)")]
    UnsupportedDuration(u64),

    #[error("failed to install log subscriber: {0}")]
    Logging(String),
}
