use thiserror::Error;

#[derive(Error, Debug)]
pub enum PopularError {
    /// Upstream or transport failure. The message is shown to the user verbatim.
    #[error("{0}")]
    Api(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<reqwest::Error> for PopularError {
    fn from(err: reqwest::Error) -> Self {
        PopularError::Api(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PopularError>;
