use thiserror::Error;

/// Errors that can occur in store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid goal {id} in {path}: {source}")]
    InvalidGoal {
        path: String,
        id: i64,
        #[source]
        source: dayline_core::Error,
    },

    #[error(transparent)]
    Core(#[from] dayline_core::Error),
}

impl StoreError {
    /// True for unknown-goal errors, so front ends can answer 404 / "not found".
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::Core(dayline_core::Error::NotFound(_)))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, StoreError::Core(dayline_core::Error::Validation(_)))
    }
}

pub type Result<T, E = StoreError> = std::result::Result<T, E>;
