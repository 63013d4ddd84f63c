use formwork_project::{DocumentKind, DocumentSettings};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "formwork.config.json";

/// Formwork configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directory new and imported projects are written to
    #[serde(default = "default_projects_dir")]
    pub projects_dir: String,

    /// Kind given to new projects
    #[serde(default)]
    pub document_kind: DocumentKind,

    /// Root column count for new projects
    #[serde(default = "default_root_columns")]
    pub root_columns: usize,

    /// Pretty-print project files
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

fn default_projects_dir() -> String {
    "projects".to_string()
}

fn default_root_columns() -> usize {
    1
}

fn default_pretty() -> bool {
    true
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            tracing::info!(path = %config_path.display(), "Loaded config");
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    /// Get absolute path to the projects directory
    pub fn get_projects_dir(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.projects_dir)
    }

    /// Path a project with `id` is written to by default
    pub fn project_path(&self, cwd: &str, id: &str) -> PathBuf {
        self.get_projects_dir(cwd).join(format!("{}.json", id))
    }

    /// Settings for a freshly created project
    pub fn new_settings(&self, title: &str) -> DocumentSettings {
        DocumentSettings {
            document_kind: self.document_kind,
            title: title.to_string(),
            root_columns: self.root_columns.max(1),
            ..DocumentSettings::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            projects_dir: default_projects_dir(),
            document_kind: DocumentKind::default(),
            root_columns: default_root_columns(),
            pretty: default_pretty(),
        }
    }
}

/// Resolve a user-supplied path against the working directory
pub fn resolve(cwd: &str, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        PathBuf::from(cwd).join(path)
    }
}
