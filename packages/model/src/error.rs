use thiserror::Error;

pub type ImportResult<T> = Result<T, ImportError>;

/// A flow document that could not be loaded
///
/// Import is all-or-nothing: on any of these the caller keeps its current flow.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Malformed flow document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid flow structure: {0}")]
    Structure(String),
}

impl ImportError {
    pub fn structure(message: impl Into<String>) -> Self {
        Self::Structure(message.into())
    }
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to serialize flow: {0}")]
    Json(#[from] serde_json::Error),
}
