//! Writing project files and export bundles.

use std::path::Path;

use tracing::{debug, info};

use crate::error::ProjectResult;
use crate::types::{ExportBundle, ProjectDocument};

/// Serialize a project, pretty-printed or compact
pub fn to_json_string(document: &ProjectDocument, pretty: bool) -> ProjectResult<String> {
    let json = if pretty {
        serde_json::to_string_pretty(document)?
    } else {
        serde_json::to_string(document)?
    };
    debug!(project_id = %document.id, json_len = json.len(), "Serialized project");
    Ok(json)
}

/// Write a project file, going through a temporary file in the same directory
pub fn save_project(document: &ProjectDocument, path: &Path, pretty: bool) -> ProjectResult<()> {
    let json = to_json_string(document, pretty)?;
    write_atomic(path, &json)?;

    info!(project_id = %document.id, path = %path.display(), "Project saved");
    Ok(())
}

/// Serialize an export bundle for `document` (pretty JSON)
pub fn export_bundle(document: &ProjectDocument) -> ProjectResult<String> {
    let bundle = ExportBundle::from_document(document);
    let json = serde_json::to_string_pretty(&bundle)?;

    info!(
        project_id = %document.id,
        exported = ?bundle.export_date,
        "Bundle exported"
    );
    Ok(json)
}

/// Write an export bundle for `document` to `path`
pub fn save_export(document: &ProjectDocument, path: &Path) -> ProjectResult<()> {
    let json = export_bundle(document)?;
    write_atomic(path, &json)
}

fn write_atomic(path: &Path, contents: &str) -> ProjectResult<()> {
    let temp_path = path.with_extension("json.tmp");
    std::fs::write(&temp_path, contents.as_bytes())?;

    if let Err(e) = std::fs::rename(&temp_path, path) {
        let _ = std::fs::remove_file(&temp_path);
        tracing::error!(path = %path.display(), error = %e, "Failed to move temp file into place");
        return Err(e.into());
    }
    Ok(())
}
