//! Path normalization and decomposition
//!
//! Everything here is lexical: paths are never touched on disk. Results always
//! use `/` as separator and never carry a trailing slash (except the root).

use std::path::Path;

/// Normalize a path into a consistent textual form
///
/// Backslashes become `/`, duplicate separators and `.` segments are dropped,
/// `..` segments are collapsed where possible and any trailing slash is removed.
pub fn clean_path(path: impl AsRef<Path>) -> String {
    let raw = path.as_ref().to_string_lossy().replace('\\', "/");
    if raw.is_empty() {
        return String::new();
    }

    let absolute = raw.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();

    for segment in raw.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(last) if *last != ".." && !is_drive(last) => {
                    segments.pop();
                }
                // Can't go above the root
                _ if absolute => {}
                Some(last) if is_drive(last) => {}
                _ => segments.push(".."),
            },
            other => segments.push(other),
        }
    }

    let joined = segments.join("/");
    match (absolute, joined.is_empty()) {
        (true, _) => format!("/{}", joined),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}

/// Windows drive prefix such as `C:`
fn is_drive(segment: &str) -> bool {
    let bytes = segment.as_bytes();
    bytes.len() == 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

/// Last component of a path (file or folder name)
pub fn file_name(path: impl AsRef<Path>) -> String {
    let cleaned = clean_path(path);
    match cleaned.rfind('/') {
        Some(idx) => cleaned[idx + 1..].to_string(),
        None if cleaned == "." => String::new(),
        None => cleaned,
    }
}

/// File name without its final extension (`a.tar.gz` -> `a.tar`)
pub fn complete_base_name(path: impl AsRef<Path>) -> String {
    let name = file_name(path);
    match name.rfind('.') {
        Some(idx) => name[..idx].to_string(),
        None => name,
    }
}

/// Final extension without the dot (`a.tar.gz` -> `gz`)
pub fn suffix(path: impl AsRef<Path>) -> String {
    let name = file_name(path);
    match name.rfind('.') {
        Some(idx) => name[idx + 1..].to_string(),
        None => String::new(),
    }
}

/// Normalized directory containing `path`
pub fn parent_dir(path: impl AsRef<Path>) -> String {
    let cleaned = clean_path(path);
    if cleaned.is_empty() {
        return cleaned;
    }
    match cleaned.rfind('/') {
        Some(0) => "/".to_string(),
        Some(idx) => cleaned[..idx].to_string(),
        None => ".".to_string(),
    }
}

/// `path` relative to `base`, or `None` if it does not live under `base`
pub fn relative_to(path: impl AsRef<Path>, base: impl AsRef<Path>) -> Option<String> {
    let path = clean_path(path);
    let base = clean_path(base);
    if base.is_empty() {
        return None;
    }
    if path == base {
        return Some(".".to_string());
    }

    let prefix = if base.ends_with('/') {
        base
    } else {
        format!("{}/", base)
    };
    path.strip_prefix(&prefix).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_path() {
        assert_eq!(clean_path("/home//vnotex/./vnote/"), "/home/vnotex/vnote");
        assert_eq!(clean_path("/home/a/../b"), "/home/b");
        assert_eq!(clean_path("C:\\Users\\me\\notes\\"), "C:/Users/me/notes");
        assert_eq!(clean_path("/"), "/");
        assert_eq!(clean_path("/.."), "/");
        assert_eq!(clean_path("a/.."), ".");
        assert_eq!(clean_path("../x"), "../x");
        assert_eq!(clean_path(""), "");
    }

    #[test]
    fn test_file_name_and_extension() {
        assert_eq!(file_name("/notes/daily/today.md"), "today.md");
        assert_eq!(complete_base_name("/notes/archive.tar.gz"), "archive.tar");
        assert_eq!(suffix("/notes/archive.tar.gz"), "gz");
        assert_eq!(suffix("/notes/README"), "");
        assert_eq!(complete_base_name("/notes/README"), "README");
    }

    #[test]
    fn test_parent_dir() {
        assert_eq!(parent_dir("/notes/daily/today.md"), "/notes/daily");
        assert_eq!(parent_dir("/today.md"), "/");
        assert_eq!(parent_dir("today.md"), ".");
        assert_eq!(parent_dir(""), "");
    }

    #[test]
    fn test_relative_to() {
        assert_eq!(
            relative_to("/notes/daily/today.md", "/notes/"),
            Some("daily/today.md".to_string())
        );
        assert_eq!(relative_to("/other/today.md", "/notes"), None);
        assert_eq!(relative_to("/notesextra/a.md", "/notes"), None);
        assert_eq!(relative_to("/", "/"), Some(".".to_string()));
        assert_eq!(relative_to("/a.md", "/"), Some("a.md".to_string()));
    }
}
