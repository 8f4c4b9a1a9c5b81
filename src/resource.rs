//! Captured resource records and their on-disk path derivation.

/// Name a generic static file server returns for a bare directory request.
pub const DEFAULT_INDEX_FILE: &str = "index.html";

/// A single web resource captured from the target site.
///
/// Records are immutable values: the rewrite stages never mutate one in place,
/// they build a replacement through [`CapturedResource::with_data`] or
/// [`CapturedResource::with_resource_url`] and swap it into the store. The
/// `capture_key` is fixed at construction and survives every replacement, so a
/// record stays addressable by its original fetch URL even after its
/// `resource_url` has been rewritten to a local path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedResource {
    capture_key: String,
    mime_type: String,
    data: Vec<u8>,
    resource_url: String,
    charset: String,
    query: String,
}

impl CapturedResource {
    /// Create a record for a freshly captured resource.
    pub fn new(
        capture_key: impl Into<String>,
        mime_type: impl Into<String>,
        data: Vec<u8>,
        resource_url: impl Into<String>,
        charset: impl Into<String>,
        query: impl Into<String>,
    ) -> Self {
        Self {
            capture_key: capture_key.into(),
            mime_type: mime_type.into(),
            data,
            resource_url: resource_url.into(),
            charset: charset.into(),
            query: query.into(),
        }
    }

    /// The original fetch URL identifying this record in the store.
    pub fn capture_key(&self) -> &str {
        &self.capture_key
    }

    /// Declared content type, possibly empty.
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Raw byte payload.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Full fetch URL initially; the rewritten relative path after the
    /// rewrite stage has run.
    pub fn resource_url(&self) -> &str {
        &self.resource_url
    }

    /// Text encoding used when patching this resource's body.
    pub fn charset(&self) -> &str {
        &self.charset
    }

    /// Original URL query string, possibly empty.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// New record with a replaced byte payload.
    pub fn with_data(&self, data: Vec<u8>) -> Self {
        Self {
            data,
            ..self.clone()
        }
    }

    /// New record with a replaced resource URL. The capture key is unchanged.
    pub fn with_resource_url(&self, resource_url: impl Into<String>) -> Self {
        Self {
            resource_url: resource_url.into(),
            ..self.clone()
        }
    }

    /// Relative file path this record occupies under the output root.
    ///
    /// Derived from `resource_url`: the URL-decoded path component, with
    /// `index.html` appended for trailing-slash paths and the leading `/`
    /// stripped. Deriving twice from the same `resource_url` yields the same
    /// result.
    pub fn relative_file_path(&self) -> String {
        let mut path = url_path_component(&self.resource_url);
        if path.ends_with('/') {
            path.push_str(DEFAULT_INDEX_FILE);
        }
        path.trim_start_matches('/').to_string()
    }

    /// Directory portion of [`Self::relative_file_path`], empty for files at
    /// the output root.
    pub fn directory(&self) -> String {
        let relative = self.relative_file_path();
        match relative.rsplit_once('/') {
            Some((directory, _)) => directory.to_string(),
            None => String::new(),
        }
    }

    /// Final filename component of [`Self::relative_file_path`].
    pub fn file_name(&self) -> String {
        let relative = self.relative_file_path();
        match relative.rsplit_once('/') {
            Some((_, name)) => name.to_string(),
            None => relative,
        }
    }
}

/// Normalize a fetch URL the way the capture boundary is expected to.
///
/// Directory requests must be stored under an explicit document name so the
/// store key and the locate strings stay stable; a trailing-slash URL gains
/// `index.html`.
pub fn normalize_capture_url(url: &str) -> String {
    if url.ends_with('/') {
        format!("{url}{DEFAULT_INDEX_FILE}")
    } else {
        url.to_string()
    }
}

/// URL-decoded path component of an absolute URL or a bare path string.
pub(crate) fn url_path_component(value: &str) -> String {
    let raw = raw_url_path(value);
    match urlencoding::decode(&raw) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => raw,
    }
}

/// Path component as it appears in the URL, byte for byte.
///
/// Purely textual slicing: no percent-encoding, no dot-segment resolution,
/// no case folding. The locate strings searched for during rewriting must
/// match link text exactly as it was captured, so any normalization here
/// would make raw, unnormalized links miss their substitution.
pub(crate) fn raw_url_path(value: &str) -> String {
    let end = value.find(['?', '#']).unwrap_or(value.len());
    let trimmed = &value[..end];
    match strip_scheme(trimmed) {
        Some(rest) => match rest.find('/') {
            Some(slash) => rest[slash..].to_string(),
            None => String::new(),
        },
        // Already-rewritten relative paths carry no scheme.
        None => trimmed.to_string(),
    }
}

/// Network-location component (host, port, userinfo) of an absolute URL,
/// case and all; empty for scheme-less values.
pub(crate) fn raw_url_netloc(value: &str) -> &str {
    match strip_scheme(value) {
        Some(rest) => &rest[..rest.find(['/', '?', '#']).unwrap_or(rest.len())],
        None => "",
    }
}

/// Raw path and query components of a URL or path string.
pub(crate) fn split_url_parts(value: &str) -> (String, String) {
    let without_fragment = &value[..value.find('#').unwrap_or(value.len())];
    let query = match without_fragment.split_once('?') {
        Some((_, query)) => query.to_string(),
        None => String::new(),
    };
    (raw_url_path(value), query)
}

/// The remainder after a valid `scheme://` prefix, when one is present.
fn strip_scheme(value: &str) -> Option<&str> {
    let (scheme, rest) = value.split_once("://")?;
    let mut chars = scheme.chars();
    let first = chars.next()?;
    let valid = first.is_ascii_alphabetic()
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    valid.then_some(rest)
}
