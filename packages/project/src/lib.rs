//! `formwork-project`: project files and export bundles for Formwork.
//!
//! - **Save/Load**: `{ id, elements, settings }` project files on disk
//! - **Export**: bundles stamped with the project identity, date and format version
//! - **Import**: validated before anything reaches a [`formwork_editor::TreeStore`]
//!
//! # Usage
//!
//! ```rust,no_run
//! use formwork_project::{load_project, save_project, DocumentSettings, ProjectDocument};
//! use std::path::Path;
//!
//! let doc = ProjectDocument::new("contact-form", DocumentSettings::default());
//! save_project(&doc, Path::new("contact-form.json"), true).unwrap();
//!
//! let loaded = load_project(Path::new("contact-form.json")).unwrap();
//! assert_eq!(loaded.id, "contact-form");
//! ```

pub mod error;
pub mod load;
pub mod save;
pub mod types;

pub use error::{ProjectError, ProjectResult};
pub use load::{from_json_string, import_bundle, import_into_store, load_project};
pub use save::{export_bundle, save_export, save_project, to_json_string};
pub use types::{
    DocumentKind, DocumentSettings, ExportBundle, ProjectDocument, ProjectRef, EXPORT_VERSION,
};
