//! File context loading.
//!
//! Builds the single text blob used as the conversation's first user turn:
//! either one file's contents verbatim, or a recursive concatenation of every
//! allow-listed file under a directory, each tagged with its path.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

/// Errors that can occur while loading file context.
#[derive(Debug, Error)]
pub enum ContextError {
    /// The input path does not exist.
    #[error("input path not found: {0}")]
    PathNotFound(PathBuf),
    /// A file's contents are not valid UTF-8.
    #[error("{0} is not valid UTF-8 text")]
    Decode(PathBuf),
    /// Any other filesystem failure.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: io::Error,
    },
    /// Directory traversal failed.
    #[error("directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Load the context blob for `path`.
///
/// A regular file is returned verbatim; the extension allow-list only
/// applies to directory traversal. Traversal is sorted by file name at every
/// level, so two runs over the same tree produce identical output.
pub fn load(path: &Path, extensions: &[String]) -> Result<String, ContextError> {
    if !path.exists() {
        return Err(ContextError::PathNotFound(path.to_path_buf()));
    }
    if path.is_file() {
        return read_file(path);
    }

    let extensions: Vec<String> = extensions.iter().map(|e| normalize_extension(e)).collect();

    let mut concat = String::new();
    let walker = WalkDir::new(path)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_hidden(entry));
    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        if !extensions.contains(&file_extension(entry.path())) {
            continue;
        }
        concat.push_str(&format!("File: {}\n", entry.path().display()));
        concat.push_str(&read_file(entry.path())?);
        concat.push_str("\n\n");
    }
    Ok(concat)
}

/// A dotfile or dot-directory anywhere below the root is pruned; the root
/// itself is always walked, even when the operator passed a hidden path.
fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name().to_string_lossy().starts_with('.')
}

/// Extension including its leading dot, or an empty string for none.
fn file_extension(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}

/// Accept endings written either as `py` or `.py`.
fn normalize_extension(ending: &str) -> String {
    if ending.starts_with('.') {
        ending.to_string()
    } else {
        format!(".{}", ending)
    }
}

fn read_file(path: &Path) -> Result<String, ContextError> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::InvalidData => ContextError::Decode(path.to_path_buf()),
        io::ErrorKind::NotFound => ContextError::PathNotFound(path.to_path_buf()),
        _ => ContextError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, rel: &str, contents: &str) {
        let path = dir.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_missing_path_fails() {
        let dir = TempDir::new().unwrap();
        let result = load(&dir.path().join("nope"), &[]);
        assert!(matches!(result, Err(ContextError::PathNotFound(_))));
    }

    #[test]
    fn test_single_file_returned_verbatim() {
        let dir = TempDir::new().unwrap();
        write(&dir, "notes.txt", "hello");

        // The allow-list is ignored for a single file
        let text = load(&dir.path().join("notes.txt"), &[]).unwrap();
        assert_eq!(text, "hello");
    }

    #[test]
    fn test_invalid_utf8_is_decode_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("blob.txt"), [0xff, 0xfe, 0x41]).unwrap();

        let result = load(&dir.path().join("blob.txt"), &[]);
        assert!(matches!(result, Err(ContextError::Decode(_))));
    }

    #[test]
    fn test_directory_concatenation_has_headers_and_separators() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a.py", "print(1)");

        let text = load(dir.path(), &["py".to_string()]).unwrap();
        let expected = format!("File: {}\nprint(1)\n\n", dir.path().join("a.py").display());
        assert_eq!(text, expected);
    }

    #[test]
    fn test_hidden_files_and_directories_excluded() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a.py", "visible");
        write(&dir, ".secret.py", "dotfile");
        write(&dir, ".hidden/b.py", "in dot dir");

        let text = load(dir.path(), &["py".to_string()]).unwrap();
        assert_eq!(text.matches("File: ").count(), 1);
        assert!(text.contains("visible"));
        assert!(!text.contains("dotfile"));
        assert!(!text.contains("in dot dir"));
    }

    #[test]
    fn test_extension_filter_applies_to_directories() {
        let dir = TempDir::new().unwrap();
        write(&dir, "kept.py", "python");
        write(&dir, "skipped.rs", "rust");
        write(&dir, "no_extension", "bare");

        let text = load(dir.path(), &["py".to_string()]).unwrap();
        assert!(text.contains("python"));
        assert!(!text.contains("rust"));
        assert!(!text.contains("bare"));
    }

    #[test]
    fn test_empty_allow_list_excludes_everything() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a.py", "python");
        write(&dir, "b.rs", "rust");

        let text = load(dir.path(), &[]).unwrap();
        assert_eq!(text, "");
    }

    #[test]
    fn test_endings_accepted_with_or_without_dot() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a.py", "python");

        let bare = load(dir.path(), &["py".to_string()]).unwrap();
        let dotted = load(dir.path(), &[".py".to_string()]).unwrap();
        assert_eq!(bare, dotted);
        assert!(bare.contains("python"));
    }

    #[test]
    fn test_traversal_is_deterministic_and_sorted() {
        let dir = TempDir::new().unwrap();
        write(&dir, "b.py", "second");
        write(&dir, "a.py", "first");
        write(&dir, "sub/c.py", "third");

        let first = load(dir.path(), &["py".to_string()]).unwrap();
        let second = load(dir.path(), &["py".to_string()]).unwrap();
        assert_eq!(first, second);

        let a = first.find("a.py").unwrap();
        let b = first.find("b.py").unwrap();
        let c = first.find("c.py").unwrap();
        assert!(a < b && b < c);
    }

    #[test]
    fn test_nested_files_are_included() {
        let dir = TempDir::new().unwrap();
        write(&dir, "deep/er/still/d.py", "nested");

        let text = load(dir.path(), &["py".to_string()]).unwrap();
        assert!(text.contains("nested"));
        assert!(text.contains(&dir.path().join("deep/er/still/d.py").display().to_string()));
    }
}
