//! Mapping stored entry names onto relative destination paths.

use std::path::{Component, Path, PathBuf};

/// Turn a stored entry name into a path relative to the destination.
///
/// Components that are empty, `.` or `..` are dropped, as is a leading
/// root or drive prefix, so the result never climbs out of the destination.
/// On Windows each component is also passed through [`windows_component`].
/// Returns `None` when nothing is left.
pub fn entry_relative_path(name: &str) -> Option<PathBuf> {
    let separators: &[char] = if cfg!(windows) { &['/', '\\'] } else { &['/'] };

    let mut path = PathBuf::new();
    for part in name.split(separators) {
        if part.is_empty() || part == "." || part == ".." {
            continue;
        }
        // Drive prefixes such as `C:` only parse as such on Windows
        for component in Path::new(part).components() {
            let Component::Normal(normal) = component else {
                continue;
            };
            if cfg!(windows) {
                let sanitized = windows_component(&normal.to_string_lossy());
                if !sanitized.is_empty() {
                    path.push(sanitized);
                }
            } else {
                path.push(normal);
            }
        }
    }

    if path.as_os_str().is_empty() {
        None
    } else {
        Some(path)
    }
}

/// Make one name component legal on Windows: reserved characters become
/// `_` and trailing dots are stripped.
pub fn windows_component(part: &str) -> String {
    part.chars()
        .map(|c| match c {
            ':' | '<' | '>' | '|' | '"' | '?' | '*' => '_',
            c => c,
        })
        .collect::<String>()
        .trim_end_matches('.')
        .to_string()
}
