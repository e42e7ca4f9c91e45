use std::path::{Path, PathBuf};

use unicode_normalization::UnicodeNormalization;

/// Directory name for a playlist: `/` becomes `_` and `:` becomes `-`.
pub fn sanitize_playlist(name: &str) -> String {
    let name: String = name.nfc().collect();
    name.trim().replace('/', "_").replace(':', "-")
}

/// `root/<playlist>` or `root` itself when there is no playlist.
pub fn playlist_dir(root: &Path, playlist: Option<&str>) -> PathBuf {
    match playlist.map(sanitize_playlist) {
        Some(name) if !name.is_empty() => root.join(name),
        _ => root.to_path_buf(),
    }
}

/// Title-derived output name, safe to use as a single path component.
pub fn final_file_name(title: &str, ext: &str) -> String {
    let stem = sanitize_filename::sanitize(title.trim());
    let stem = if stem.is_empty() { "video".to_string() } else { stem };
    if ext.is_empty() {
        stem
    } else {
        format!("{}.{}", stem, ext)
    }
}
