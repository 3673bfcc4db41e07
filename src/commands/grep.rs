//! Pattern search over a file or directory tree.

use std::fs;
use std::path::Path;

use regex::{Regex, RegexBuilder};
use walkdir::WalkDir;

use crate::error::AppError;
use crate::fsutil::{self, FileKind};
use crate::session::Session;

/// Extensions short-circuited as binary during a recursive search: the file
/// is reported as matching without scanning its content.
const BINARY_EXTENSIONS: [&str; 22] = [
    "bin", "class", "dll", "exe", "gif", "gz", "ico", "jpeg", "jpg", "mp3", "mp4", "o", "pdf",
    "png", "pyc", "so", "tar", "tgz", "wav", "woff", "woff2", "zip",
];

/// Options for a pattern search.
#[derive(Debug, Clone, Copy, Default)]
pub struct GrepOptions {
    /// Walk directories instead of requiring a single file.
    pub recursive: bool,
    /// Case-insensitive matching.
    pub ignore_case: bool,
}

/// Search `token` for lines matching `pattern`.
///
/// Matches are reported as `<path>:<line>:<text>` with 1-based line
/// numbers. Recursive searches report paths relative to the search root and
/// silently skip unreadable files.
pub fn execute(
    session: &Session,
    pattern: &str,
    token: &str,
    options: GrepOptions,
) -> Result<Vec<String>, AppError> {
    // Compile before touching the filesystem.
    let regex = RegexBuilder::new(pattern)
        .case_insensitive(options.ignore_case)
        .build()
        .map_err(|source| AppError::InvalidPattern { pattern: pattern.to_string(), source })?;

    let path = session.resolve(token);
    match fsutil::classify(&path)? {
        FileKind::File => {
            let content = fs::read(&path).map_err(|err| AppError::from_io(err, &path))?;
            Ok(scan_lines(&regex, &path.display().to_string(), &content))
        }
        FileKind::Directory => {
            if !options.recursive {
                return Err(AppError::is_a_directory(&path));
            }
            Ok(scan_tree(&regex, &path))
        }
        FileKind::Other => Err(AppError::unsupported(&path)),
    }
}

/// Scan one file's content, tolerating invalid UTF-8 via lossy decoding.
fn scan_lines(regex: &Regex, display_path: &str, content: &[u8]) -> Vec<String> {
    let text = String::from_utf8_lossy(content);
    text.lines()
        .enumerate()
        .filter(|(_, line)| regex.is_match(line))
        .map(|(index, line)| format!("{display_path}:{}:{line}", index + 1))
        .collect()
}

/// Walk a directory tree; I/O errors never abort the walk.
fn scan_tree(regex: &Regex, root: &Path) -> Vec<String> {
    let mut matches = Vec::new();

    for entry in WalkDir::new(root).into_iter().filter_map(Result::ok) {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let display = path.strip_prefix(root).unwrap_or(path).display().to_string();

        if has_binary_extension(path) {
            matches.push(format!("{display}: binary file matches"));
            continue;
        }

        // Unreadable files are skipped, not fatal.
        let Ok(content) = fs::read(path) else {
            tracing::debug!(path = %path.display(), "skipping unreadable file");
            continue;
        };
        matches.extend(scan_lines(regex, &display, &content));
    }
    matches
}

fn has_binary_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| BINARY_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn session_in(dir: &Path) -> Session {
        Session::new(dir.to_path_buf()).unwrap()
    }

    fn populated_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("data1")).unwrap();
        fs::write(dir.path().join("data1/test1.txt"), "TEST 1").unwrap();
        fs::write(dir.path().join("data1/test2.txt"), "TEST 2").unwrap();
        fs::write(dir.path().join("testD.txt"), "TEST D").unwrap();
        dir
    }

    #[test]
    fn matches_lines_in_single_file() {
        let dir = populated_dir();
        let session = session_in(dir.path());

        let result = execute(&session, "TEST", "testD.txt", GrepOptions::default()).unwrap();
        assert_eq!(result.len(), 1);
        assert!(result[0].contains("testD.txt"));
        assert!(result[0].contains("TEST D"));
    }

    #[test]
    fn reports_one_based_line_numbers_per_match() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("multi.txt"), "TEST\nTEST\n").unwrap();
        let session = session_in(dir.path());

        let result = execute(&session, "TEST", "multi.txt", GrepOptions::default()).unwrap();
        assert_eq!(result.len(), 2);
        assert!(result[0].contains(":1:"));
        assert!(result[1].contains(":2:"));
    }

    #[test]
    fn no_match_returns_empty() {
        let dir = populated_dir();
        let session = session_in(dir.path());

        let result = execute(&session, "LALALA", "testD.txt", GrepOptions::default()).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn case_sensitivity_follows_the_flag() {
        let dir = populated_dir();
        let session = session_in(dir.path());

        let exact = execute(&session, "test", "testD.txt", GrepOptions::default()).unwrap();
        assert!(exact.is_empty());

        let options = GrepOptions { recursive: false, ignore_case: true };
        let folded = execute(&session, "test", "testD.txt", options).unwrap();
        assert_eq!(folded.len(), 1);
    }

    #[test]
    fn recursive_search_reports_relative_paths() {
        let dir = populated_dir();
        let session = session_in(dir.path());

        let options = GrepOptions { recursive: true, ignore_case: false };
        let joined = execute(&session, "TEST", ".", options).unwrap().join(" ");
        assert!(joined.contains("test1.txt"));
        assert!(joined.contains("test2.txt"));
        assert!(joined.contains("testD.txt"));
        assert!(!joined.contains(&dir.path().display().to_string()));
    }

    #[test]
    fn binary_extensions_short_circuit() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("blob.png"), [0u8, 159, 146, 150]).unwrap();
        let session = session_in(dir.path());

        let options = GrepOptions { recursive: true, ignore_case: false };
        let result = execute(&session, "anything", ".", options).unwrap();
        assert_eq!(result, vec!["blob.png: binary file matches".to_string()]);
    }

    #[test]
    fn invalid_pattern_fails_before_filesystem_access() {
        let dir = TempDir::new().unwrap();
        let session = session_in(dir.path());

        let err = execute(&session, ")t", "does-not-even-exist", GrepOptions::default())
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidPattern { .. }));
    }

    #[test]
    fn directory_without_recursive_fails() {
        let dir = populated_dir();
        let session = session_in(dir.path());

        let err = execute(&session, "TEST", "data1", GrepOptions::default()).unwrap_err();
        assert!(matches!(err, AppError::IsADirectory(_)));
    }

    #[test]
    fn missing_path_fails() {
        let dir = TempDir::new().unwrap();
        let session = session_in(dir.path());

        let err = execute(&session, "x", "nope.txt", GrepOptions::default()).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
