//! Layout description consumed by the post-processing pipeline.

/// Knobs describing how the servable tree is shaped.
///
/// Defaults match what a generic static file server expects; callers that
/// load a [`crate::config::BundleConfig`] get a layout via
/// [`crate::config::BundleConfig::into_layout`].
#[derive(Debug, Clone)]
pub struct BundleLayout {
    /// Path of the redirect template substituted into synthesized indexes.
    pub redirect_template_file: String,
    /// Filename given to synthesized directory indexes.
    pub index_file_name: String,
    /// Filenames a static server serves by default for a directory request.
    pub default_serve_file_names: Vec<String>,
    /// Maximum tolerated absolute output path length before compression.
    pub max_path_len: usize,
}

impl Default for BundleLayout {
    fn default() -> Self {
        Self {
            redirect_template_file: "redirect.html".into(),
            index_file_name: "index.html".into(),
            default_serve_file_names: vec!["index.html".into(), "index.htm".into()],
            max_path_len: 255,
        }
    }
}
