use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Failed to retrieve articles: {0}")]
    Retrieval(String),

    #[error("Data integrity error: {0}")]
    DataIntegrity(String),

    #[error("No signed-in user")]
    MissingUser,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(#[from] tokio_rusqlite::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Errors that should never be shown to the user, only logged.
    pub fn is_internal(&self) -> bool {
        matches!(self, AppError::DataIntegrity(_) | AppError::MissingUser)
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
