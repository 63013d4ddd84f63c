//! Error types for project files and bundles

use formwork_model::NodeId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProjectError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Expected a JSON object at the top level")]
    NotAnObject,

    #[error("Duplicate node id: {0}")]
    DuplicateId(NodeId),

    #[error("Unknown document kind '{0}' (expected form, email or page)")]
    UnknownDocumentKind(String),

    #[error("Unsupported export version: {version}")]
    UnsupportedVersion { version: String },

    #[error("Project file not found: {path}")]
    NotFound { path: String },

    #[error("Editor error: {0}")]
    Editor(#[from] formwork_editor::EditorError),
}

pub type ProjectResult<T> = Result<T, ProjectError>;
