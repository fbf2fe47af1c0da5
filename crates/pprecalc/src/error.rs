use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("SQLError: Incorrect username/password")]
    DatabaseAccessDenied,

    #[error("SQLError: Database does not exist")]
    DatabaseMissing,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Failed to fetch beatmap {map_id}: {message}")]
    MapFetchFailed { map_id: u32, message: String },

    #[error("Beatmap {0} is not valid UTF-8")]
    MapDecodeFailed(u32),

    #[error("Failed to spawn compute engine: {0}")]
    EngineSpawnFailed(String),

    #[error("Compute engine timed out after {0:?}")]
    EngineTimedOut(std::time::Duration),

    #[error("Compute engine output too short ({0} bytes)")]
    EngineOutputTooShort(usize),

    #[error("Worker task failed: {0}")]
    WorkerFailed(String),

    #[error("Invalid selection filter: {0}")]
    InvalidFilter(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this error is a "file not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }

    /// Check if this error happened while establishing the database connection
    pub fn is_connection_setup(&self) -> bool {
        matches!(self, Error::DatabaseAccessDenied | Error::DatabaseMissing)
    }
}
