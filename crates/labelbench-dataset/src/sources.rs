//! Discovery of normalized source images and path comparison helpers.

use std::io;
use std::path::{Component, Path, PathBuf};

/// Extensions accepted as source images (compared case-insensitively).
pub const SOURCE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// True when `path` has one of the [`SOURCE_EXTENSIONS`].
pub fn is_source_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            SOURCE_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
        .unwrap_or(false)
}

/// List the source images directly inside `dir`, sorted by file name.
///
/// Subdirectories are not descended into.
pub fn discover_source_images(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut images = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() && is_source_image(&entry.path()) {
            images.push(entry.path());
        }
    }
    images.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(images)
}

/// Absolute, lexically cleaned form of `path`.
///
/// Relative paths are resolved against the working directory, `.` segments
/// are dropped and `..` pops the previous segment. Symlinks are not
/// followed, so the result can be compared for paths that do not exist yet.
pub fn normalize_path(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        match std::env::current_dir() {
            Ok(cwd) => cwd.join(path),
            Err(_) => path.to_path_buf(),
        }
    };

    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}
