//! Project configuration loader for describing the bundle layout.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::project::BundleLayout;

const DEFAULT_CONFIG_FILE: &str = "webroot.config.json";

/// Discoverable project configuration for the post-processing pipeline.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BundleConfig {
    /// Path of the redirect template used for synthesized directory indexes.
    pub redirect_template_file: String,
    /// Filename given to synthesized directory indexes.
    pub index_file_name: String,
    /// Filenames a static server serves by default for a directory request.
    pub default_serve_file_names: Vec<String>,
    /// Maximum tolerated absolute output path length before compression.
    pub max_path_len: usize,
}

impl Default for BundleConfig {
    fn default() -> Self {
        let layout = BundleLayout::default();
        Self {
            redirect_template_file: layout.redirect_template_file,
            index_file_name: layout.index_file_name,
            default_serve_file_names: layout.default_serve_file_names,
            max_path_len: layout.max_path_len,
        }
    }
}

impl BundleConfig {
    /// Attempt to load configuration from the provided directory.
    ///
    /// When the configuration file does not exist or fails to parse we fall
    /// back to default values so downstream callers can continue operating
    /// with sensible assumptions.
    pub fn discover(project_dir: &Path) -> Self {
        let candidate = project_dir.join(DEFAULT_CONFIG_FILE);
        Self::from_path(&candidate).unwrap_or_default()
    }

    /// Read configuration from a specific JSON file.
    pub fn from_path(path: &Path) -> Option<Self> {
        let content = fs::read_to_string(path).ok()?;
        serde_json::from_str(&content).ok()
    }

    /// Convert the configuration into an owned layout description.
    pub fn into_layout(self) -> BundleLayout {
        BundleLayout {
            redirect_template_file: self.redirect_template_file,
            index_file_name: self.index_file_name,
            default_serve_file_names: self.default_serve_file_names,
            max_path_len: self.max_path_len,
        }
    }
}
