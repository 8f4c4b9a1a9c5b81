//! Mapping captured resource URLs onto filesystem-safe relative paths.
//!
//! This module splits the responsibilities into focused submodules so that
//! extension inference, illegal-character stripping, and path-length
//! compression can be tested independently. The mapper in this file chains
//! them in the order the rewrite stage depends on.

mod compress;
mod extension;
mod sanitize;

pub use compress::compress_file_path;
pub use extension::extension_for_mime;
pub use sanitize::strip_illegal_path_chars;

use std::path::Path;

use md5::{Digest, Md5};

use crate::resource::{split_url_parts, CapturedResource};

/// Map a captured resource onto its rewritten, filesystem-safe path.
///
/// The URL path gains an extension inferred from the record's MIME type; a
/// non-empty query string is folded into the filename as an MD5 digest so
/// captures of the same path that differ only by query land in distinct
/// files. The result is stripped of illegal filesystem characters and, when
/// the absolute output path would exceed `max_path_len`, compressed with a
/// hashed directory segment. Deterministic for identical inputs.
pub fn map_resource_path(
    resource: &CapturedResource,
    output_dir: &Path,
    max_path_len: usize,
) -> String {
    let (path, query) = split_url_parts(resource.resource_url());
    let extension = extension_for_mime(resource.mime_type());

    let named = if !query.is_empty() {
        let digest = hex::encode(Md5::digest(query.as_bytes()));
        format!("{path}_{digest}{extension}")
    } else if path.ends_with(&extension) {
        path
    } else {
        format!("{path}{extension}")
    };

    compress_file_path(output_dir, &strip_illegal_path_chars(&named), max_path_len)
}
