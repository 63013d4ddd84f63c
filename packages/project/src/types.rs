//! Persisted document shapes.
//!
//! A project file is `{ id, elements, settings }`. An export bundle wraps the
//! same data with the project identity, an export timestamp and a format
//! version.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use formwork_model::{Node, Tree};
use serde::{Deserialize, Serialize};

use crate::error::ProjectError;

/// Export format version written into every bundle
pub const EXPORT_VERSION: &str = "1.0";

/// What the document renders as
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    #[default]
    Form,
    Email,
    Page,
}

impl DocumentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DocumentKind::Form => "form",
            DocumentKind::Email => "email",
            DocumentKind::Page => "page",
        }
    }
}

impl FromStr for DocumentKind {
    type Err = ProjectError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "form" => Ok(DocumentKind::Form),
            "email" => Ok(DocumentKind::Email),
            "page" => Ok(DocumentKind::Page),
            other => Err(ProjectError::UnknownDocumentKind(other.to_string())),
        }
    }
}

fn default_root_columns() -> usize {
    1
}

/// Document-level settings. Keys this crate does not know are kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSettings {
    #[serde(default)]
    pub document_kind: DocumentKind,
    #[serde(default)]
    pub title: String,
    #[serde(default = "default_root_columns")]
    pub root_columns: usize,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Default for DocumentSettings {
    fn default() -> Self {
        Self {
            document_kind: DocumentKind::default(),
            title: String::new(),
            root_columns: default_root_columns(),
            extra: serde_json::Map::new(),
        }
    }
}

/// On-disk project file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDocument {
    pub id: String,
    pub elements: Vec<Node>,
    pub settings: DocumentSettings,
}

impl ProjectDocument {
    pub fn new(id: impl Into<String>, settings: DocumentSettings) -> Self {
        Self {
            id: id.into(),
            elements: Vec::new(),
            settings,
        }
    }

    /// Display name; falls back to the id when the title is empty
    pub fn name(&self) -> &str {
        if self.settings.title.is_empty() {
            &self.id
        } else {
            &self.settings.title
        }
    }

    /// Element tree laid out with the document's root columns
    pub fn tree(&self) -> Tree {
        Tree::from_elements(self.elements.clone()).with_root_columns(self.settings.root_columns)
    }

    /// Replace the elements (and root layout) with those of `tree`
    pub fn set_tree(&mut self, tree: &Tree) {
        self.elements = tree.elements.clone();
        self.settings.root_columns = tree.root_columns;
    }
}

/// Identity of the exported project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRef {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// Portable export of a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportBundle {
    pub project: ProjectRef,
    pub elements: Vec<Node>,
    pub settings: DocumentSettings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl ExportBundle {
    /// Bundle `document`, stamped with the current time
    pub fn from_document(document: &ProjectDocument) -> Self {
        Self {
            project: ProjectRef {
                id: document.id.clone(),
                name: document.name().to_string(),
            },
            elements: document.elements.clone(),
            settings: document.settings.clone(),
            export_date: Some(Utc::now()),
            version: Some(EXPORT_VERSION.to_string()),
        }
    }

    pub fn into_document(self) -> ProjectDocument {
        ProjectDocument {
            id: self.project.id,
            elements: self.elements,
            settings: self.settings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_keep_unknown_keys() {
        let json = r##"{ "documentKind": "email", "title": "Weekly", "accent": "#ff0066" }"##;
        let settings: DocumentSettings = serde_json::from_str(json).unwrap();

        assert_eq!(settings.document_kind, DocumentKind::Email);
        assert_eq!(settings.root_columns, 1);
        assert_eq!(settings.extra["accent"], "#ff0066");

        let back = serde_json::to_value(&settings).unwrap();
        assert_eq!(back["accent"], "#ff0066");
        assert_eq!(back["rootColumns"], 1);
    }

    #[test]
    fn document_kind_parses_wire_names() {
        for kind in [DocumentKind::Form, DocumentKind::Email, DocumentKind::Page] {
            assert_eq!(kind.as_str().parse::<DocumentKind>().unwrap(), kind);
        }
        assert!(matches!(
            "letter".parse::<DocumentKind>(),
            Err(ProjectError::UnknownDocumentKind(_))
        ));
    }

    #[test]
    fn name_falls_back_to_id() {
        let mut doc = ProjectDocument::new("contact", DocumentSettings::default());
        assert_eq!(doc.name(), "contact");

        doc.settings.title = "Contact us".into();
        assert_eq!(doc.name(), "Contact us");
    }

    #[test]
    fn bundle_uses_camel_case_and_version() {
        let doc = ProjectDocument::new("contact", DocumentSettings::default());
        let json = serde_json::to_value(ExportBundle::from_document(&doc)).unwrap();

        assert_eq!(json["version"], EXPORT_VERSION);
        assert_eq!(json["project"]["id"], "contact");
        assert!(json["exportDate"].as_str().unwrap().contains('T'));
    }

    #[test]
    fn bundle_stamps_are_optional() {
        let json = r#"{ "project": { "id": "p" }, "elements": [], "settings": {} }"#;
        let bundle: ExportBundle = serde_json::from_str(json).unwrap();

        assert_eq!(bundle.project.name, "");
        assert!(bundle.export_date.is_none());
        assert!(bundle.version.is_none());
    }
}
