//! Error types for the editor

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Mutation rejected: {0}")]
    Rejected(#[from] crate::mutations::RejectReason),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
