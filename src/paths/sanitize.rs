//! Stripping characters that common filesystems refuse in path components.

/// Characters removed from every mapped path.
const ILLEGAL_PATH_CHARS: &[char] = &['~', '*', ':', '<', '>', '|', '?', '"'];

/// Remove every illegal filesystem character from the whole path.
pub fn strip_illegal_path_chars(path: &str) -> String {
    path.chars()
        .filter(|c| !ILLEGAL_PATH_CHARS.contains(c))
        .collect()
}
