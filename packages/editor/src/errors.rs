//! Error types for the editor

use patternflow_model::{ExportError, ImportError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("Mutation error: {0}")]
    Mutation(#[from] crate::mutations::MutationError),
}
