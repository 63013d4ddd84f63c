//! Loading project files and importing export bundles.

use std::path::Path;

use formwork_editor::TreeStore;
use formwork_model::Node;
use tracing::{debug, info, warn};

use crate::error::{ProjectError, ProjectResult};
use crate::types::{ExportBundle, ProjectDocument, EXPORT_VERSION};

const BUNDLE_FIELDS: [&str; 3] = ["project", "elements", "settings"];
const DOCUMENT_FIELDS: [&str; 3] = ["id", "elements", "settings"];

fn require_fields(value: &serde_json::Value, fields: &[&'static str]) -> ProjectResult<()> {
    let object = value.as_object().ok_or(ProjectError::NotAnObject)?;
    for &field in fields {
        if !object.contains_key(field) {
            warn!(field, "Rejecting payload with missing field");
            return Err(ProjectError::MissingField(field));
        }
    }
    Ok(())
}

fn check_unique_ids(elements: &[Node]) -> ProjectResult<()> {
    let tree = formwork_model::Tree::from_elements(elements.to_vec());
    match tree.duplicate_id() {
        Some(id) => Err(ProjectError::DuplicateId(id)),
        None => Ok(()),
    }
}

/// Parse a project file
pub fn from_json_string(json: &str) -> ProjectResult<ProjectDocument> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    require_fields(&value, &DOCUMENT_FIELDS)?;

    let document: ProjectDocument = serde_json::from_value(value)?;
    check_unique_ids(&document.elements)?;

    debug!(
        project_id = %document.id,
        elements = document.elements.len(),
        "Deserialized project from JSON"
    );
    Ok(document)
}

/// Load a project file from disk
pub fn load_project(path: &Path) -> ProjectResult<ProjectDocument> {
    if !path.exists() {
        return Err(ProjectError::NotFound {
            path: path.display().to_string(),
        });
    }

    let json = std::fs::read_to_string(path)?;
    let document = from_json_string(&json)?;

    info!(
        project_id = %document.id,
        path = %path.display(),
        "Project loaded"
    );
    Ok(document)
}

/// Validate an export bundle and turn it back into a project document.
///
/// Checks run in order: top-level fields present, format version, typed
/// model (kinds, slot counts), unique ids.
pub fn import_bundle(json: &str) -> ProjectResult<ProjectDocument> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    require_fields(&value, &BUNDLE_FIELDS)?;

    if let Some(version) = value.get("version").and_then(|v| v.as_str()) {
        if version != EXPORT_VERSION {
            return Err(ProjectError::UnsupportedVersion {
                version: version.to_string(),
            });
        }
    }

    let bundle: ExportBundle = serde_json::from_value(value)?;
    check_unique_ids(&bundle.elements)?;

    info!(
        project_id = %bundle.project.id,
        exported = ?bundle.export_date,
        "Bundle imported"
    );
    Ok(bundle.into_document())
}

/// Import a bundle straight into `store`. The store is untouched on any error.
pub fn import_into_store(store: &mut TreeStore, json: &str) -> ProjectResult<ProjectDocument> {
    let document = import_bundle(json)?;
    store.replace_tree(document.tree())?;
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::save::export_bundle;
    use crate::types::DocumentSettings;

    fn sample_document() -> ProjectDocument {
        let mut store = TreeStore::new("sample");
        store.add_node(formwork_model::ElementKind::Columns, None);
        store.add_node(formwork_model::ElementKind::Menu, None);

        let mut doc = ProjectDocument::new("sample", DocumentSettings::default());
        doc.set_tree(store.tree());
        doc
    }

    #[test]
    fn import_rejects_missing_fields() {
        for field in BUNDLE_FIELDS {
            let mut value: serde_json::Value =
                serde_json::from_str(&export_bundle(&sample_document()).unwrap()).unwrap();
            value.as_object_mut().unwrap().remove(field);

            let result = import_bundle(&value.to_string());
            assert!(matches!(result, Err(ProjectError::MissingField(f)) if f == field));
        }
    }

    #[test]
    fn import_accepts_only_required_fields() {
        let doc = import_bundle(r#"{"project":{"id":"p","name":"P"},"settings":{},"elements":[]}"#)
            .unwrap();
        assert_eq!(doc.id, "p");
        assert!(doc.elements.is_empty());

        let unnamed = import_bundle(r#"{"project":{"id":"q"},"settings":{},"elements":[]}"#).unwrap();
        assert_eq!(unnamed.id, "q");
    }

    #[test]
    fn import_rejects_non_object() {
        assert!(matches!(import_bundle("[]"), Err(ProjectError::NotAnObject)));
    }

    #[test]
    fn import_rejects_other_versions() {
        let mut value: serde_json::Value =
            serde_json::from_str(&export_bundle(&sample_document()).unwrap()).unwrap();
        value["version"] = "2.0".into();

        let result = import_bundle(&value.to_string());
        assert!(matches!(result, Err(ProjectError::UnsupportedVersion { .. })));
    }

    #[test]
    fn import_rejects_slot_length_mismatch() {
        let json = r#"{
            "project": { "id": "p", "name": "P" },
            "settings": {},
            "exportDate": "2024-05-01T10:00:00Z",
            "version": "1.0",
            "elements": [
                { "id": "g", "type": "columns", "columnCount": 3, "children": [null] }
            ]
        }"#;

        assert!(matches!(import_bundle(json), Err(ProjectError::Json(_))));
    }

    #[test]
    fn import_rejects_duplicate_ids() {
        let json = r#"{
            "project": { "id": "p", "name": "P" },
            "settings": {},
            "exportDate": "2024-05-01T10:00:00Z",
            "version": "1.0",
            "elements": [
                { "id": "a", "type": "group", "children": [ { "id": "a", "type": "divider" } ] }
            ]
        }"#;

        assert!(matches!(import_bundle(json), Err(ProjectError::DuplicateId(_))));
    }

    #[test]
    fn failed_import_leaves_store_untouched() {
        let mut store = TreeStore::new("sample");
        store.add_node(formwork_model::ElementKind::Text, None);
        let before = store.snapshot();

        let result = import_into_store(&mut store, r#"{ "project": {}, "elements": [] }"#);
        assert!(result.is_err());
        assert!(std::sync::Arc::ptr_eq(&before, &store.snapshot()));
    }

    #[test]
    fn load_missing_file_is_not_found() {
        let result = load_project(Path::new("/definitely/not/here.json"));
        assert!(matches!(result, Err(ProjectError::NotFound { .. })));
    }
}
