//! Base URI resolution for the rendered document.
//!
//! Relative links and images in a Markdown file are relative to the file's
//! directory, so the web view loads the document against that directory's
//! `file://` URI.

use std::env;
use std::path::{Component, Path, PathBuf};
use url::Url;

/// Returns the `file://` URI of the directory containing `path`.
///
/// The path is made absolute against the current directory and normalized
/// lexically; it does not have to exist. Returns `None` when no absolute
/// form can be built or the directory cannot be expressed as a URI.
pub fn base_uri_for_file(path: impl AsRef<Path>) -> Option<String> {
    let path = canonicalize(path.as_ref())?;
    let dir = path.parent().unwrap_or(&path);
    directory_uri(dir)
}

/// Converts an absolute directory path to a URI with a trailing slash, so
/// relative references resolve inside the directory.
pub fn directory_uri(dir: &Path) -> Option<String> {
    Url::from_directory_path(dir).ok().map(String::from)
}

/// Absolute, normalized form of `path`: `.` components dropped, `..` applied
/// to the preceding component. Symlinks are left alone.
fn canonicalize(path: &Path) -> Option<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        env::current_dir().ok()?.join(path)
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
    Some(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[cfg(unix)]
    #[test]
    fn directory_of_absolute_file() {
        assert_eq!(
            base_uri_for_file("/a/b/c.md").as_deref(),
            Some("file:///a/b/")
        );
    }

    #[cfg(unix)]
    #[test]
    fn dot_segments_are_normalized() {
        assert_eq!(
            base_uri_for_file("/a/./b/../c/d.md").as_deref(),
            Some("file:///a/c/")
        );
        assert_eq!(base_uri_for_file("/x.md").as_deref(), Some("file:///"));
    }

    #[cfg(unix)]
    #[test]
    fn special_characters_are_percent_encoded() {
        assert_eq!(
            base_uri_for_file("/notes/my docs/read me.md").as_deref(),
            Some("file:///notes/my%20docs/")
        );
    }

    #[test]
    #[serial(cwd)]
    fn relative_path_resolves_against_current_dir() {
        let cwd = env::current_dir().unwrap();
        let expected = directory_uri(&cwd.join("docs")).unwrap();
        assert_eq!(base_uri_for_file("docs/guide.md"), Some(expected));
    }

    #[test]
    fn existing_file_in_temp_dir() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("notes.md");
        std::fs::write(&file, "# Notes").unwrap();

        let uri = base_uri_for_file(&file).unwrap();
        let parsed = Url::parse(&uri).unwrap();
        assert_eq!(parsed.scheme(), "file");
        assert!(uri.ends_with('/'));
        assert_eq!(
            parsed.join("notes.md").unwrap().to_file_path().unwrap(),
            canonicalize(&file).unwrap()
        );
    }

    #[cfg(target_os = "linux")]
    #[test]
    #[serial(cwd)]
    fn deleted_current_dir_leaves_relative_paths_unresolved() {
        let original = env::current_dir().unwrap();
        let dir = tempfile::tempdir().unwrap();
        env::set_current_dir(dir.path()).unwrap();
        std::fs::remove_dir(dir.path()).unwrap();

        let relative = base_uri_for_file("notes.md");
        let absolute = base_uri_for_file("/a/b/c.md");
        env::set_current_dir(&original).unwrap();

        assert_eq!(relative, None);
        assert_eq!(absolute.as_deref(), Some("file:///a/b/"));
    }

    #[test]
    fn relative_directory_is_not_a_uri() {
        assert_eq!(directory_uri(Path::new("relative/dir")), None);
    }
}
