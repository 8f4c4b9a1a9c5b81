//! MIME type to file extension resolution.

/// Overrides consulted before the registry.
///
/// `text/javascript` is missing from some registry builds, and `text/html`
/// is pinned so the registry's `.htm`-first ordering cannot change document
/// names.
const EXTENSION_OVERRIDES: &[(&str, &str)] = &[("text/javascript", ".js"), ("text/html", ".html")];

/// Extension used when a MIME type resolves to nothing.
const DEFAULT_FILE_EXTENSION: &str = ".html";

/// Resolve a declared MIME type to a file extension, dot included.
pub fn extension_for_mime(mime_type: &str) -> String {
    let mime_type = mime_type.trim();

    if let Some((_, extension)) = EXTENSION_OVERRIDES
        .iter()
        .find(|(known, _)| mime_type.eq_ignore_ascii_case(known))
    {
        return (*extension).to_string();
    }

    mime_guess::get_mime_extensions_str(mime_type)
        .and_then(|extensions| extensions.first())
        .map(|extension| format!(".{extension}"))
        .unwrap_or_else(|| DEFAULT_FILE_EXTENSION.to_string())
}
