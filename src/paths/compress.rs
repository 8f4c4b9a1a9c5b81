//! Hashed compression of over-long output paths.

use std::path::Path;

use md5::{Digest, Md5};

/// Room reserved for the 32-hex-character hash segment plus its separator.
const HASH_SEGMENT_RESERVE: usize = 33;

/// Compress a mapped URL path when the absolute output path would exceed
/// `max_path_len`.
///
/// Directory components are accumulated from the one just above the filename
/// toward the root until their combined length exceeds the deviation, then
/// the accumulated span is replaced with a single directory named after the
/// MD5 digest of the removed names. The first component and the filename are
/// never touched. Accumulation stops as soon as the threshold is exceeded,
/// so the result is a best-effort bound rather than a guarantee of fitting
/// within `max_path_len`. Paths that already fit are returned unchanged.
pub fn compress_file_path(output_dir: &Path, url_path: &str, max_path_len: usize) -> String {
    let file_path = url_path.trim_start_matches('/');
    let full_path_len = output_dir.join(file_path).as_os_str().len();

    if full_path_len <= max_path_len {
        return url_path.to_string();
    }

    let deviation = full_path_len - max_path_len + HASH_SEGMENT_RESERVE;

    let parts: Vec<&str> = file_path.split('/').collect();
    let file_name = parts[parts.len() - 1];

    let mut removed: Vec<&str> = Vec::new();
    let mut removed_len = 0;
    for index in (1..parts.len().saturating_sub(1)).rev() {
        removed.push(parts[index]);
        removed_len += parts[index].len();
        if removed_len > deviation {
            break;
        }
    }

    let digest = hex::encode(Md5::digest(removed.concat().as_bytes()));

    let kept = parts.len().saturating_sub(removed.len() + 1);
    let mut compressed: Vec<&str> = parts[..kept].to_vec();
    compressed.push(&digest);
    compressed.push(file_name);

    format!("/{}", compressed.join("/"))
}
