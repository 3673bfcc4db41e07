//! Copy files and directory trees.

use std::io;
use std::path::{Path, PathBuf};

use crate::error::AppError;
use crate::fsutil::{self, FileKind};
use crate::session::Session;

/// Copy `src_token` to `dst_token`.
///
/// A regular-file source overwrites a file destination or lands inside a
/// directory destination. A directory source requires `recursive` and
/// merges into an existing destination directory.
///
/// Returns the resolved destination actually written, which the undo layer
/// records for reversal.
pub fn execute(
    session: &Session,
    src_token: &str,
    dst_token: &str,
    recursive: bool,
) -> Result<PathBuf, AppError> {
    let source = session.resolve(src_token);
    let destination = session.resolve(dst_token);

    let source_kind = fsutil::classify(&source)?;
    let destination_kind = fsutil::classify(&destination).ok();

    match source_kind {
        FileKind::File => {
            let target = match destination_kind {
                Some(FileKind::Directory) => destination.join(fsutil::base_name(&source)),
                _ => destination,
            };
            // fs::copy truncates the destination before reading, so a
            // self-copy would empty the file.
            if target == source {
                return Err(same_file(&source, &target));
            }
            fsutil::copy_file(&source, &target)?;
            Ok(target)
        }
        FileKind::Directory => {
            if destination_kind == Some(FileKind::File) {
                // cp: cannot overwrite non-directory with directory
                return Err(AppError::is_a_directory(&destination));
            }
            if !recursive {
                return Err(AppError::is_a_directory(&source));
            }
            // A destination at or below the source would merge the tree
            // into itself, truncating every file on the way.
            if destination.starts_with(&source) {
                return Err(same_file(&source, &destination));
            }
            fsutil::copy_tree(&source, &destination)?;
            Ok(destination)
        }
        FileKind::Other => Err(AppError::unsupported(&source)),
    }
}

fn same_file(source: &Path, target: &Path) -> AppError {
    AppError::Io(io::Error::new(
        io::ErrorKind::InvalidInput,
        format!("'{}' and '{}' are the same file", source.display(), target.display()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn session_in(dir: &Path) -> Session {
        Session::new(dir.to_path_buf()).unwrap()
    }

    fn populated_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("data1")).unwrap();
        fs::write(dir.path().join("data1/test1.txt"), "TEST 1").unwrap();
        fs::write(dir.path().join("data1/test2.txt"), "TEST 2").unwrap();
        fs::write(dir.path().join("data1/empty.txt"), "").unwrap();
        fs::write(dir.path().join("testD.txt"), "TEST D").unwrap();
        dir
    }

    #[test]
    fn copies_file_to_new_name() {
        let dir = populated_dir();
        let session = session_in(dir.path());

        let target = execute(&session, "testD.txt", "copy.txt", false).unwrap();
        assert_eq!(target, dir.path().join("copy.txt"));
        assert_eq!(fs::read_to_string(target).unwrap(), "TEST D");
    }

    #[test]
    fn copies_file_into_directory() {
        let dir = populated_dir();
        let session = session_in(dir.path());

        let target = execute(&session, "testD.txt", "data1", false).unwrap();
        assert_eq!(target, dir.path().join("data1/testD.txt"));
        assert!(target.exists());
    }

    #[test]
    fn overwrites_existing_file_destination() {
        let dir = populated_dir();
        let session = session_in(dir.path());

        execute(&session, "testD.txt", "data1/test2.txt", false).unwrap();
        assert_eq!(fs::read_to_string(dir.path().join("data1/test2.txt")).unwrap(), "TEST D");
    }

    #[test]
    fn copies_directory_recursively() {
        let dir = populated_dir();
        let session = session_in(dir.path());

        execute(&session, "data1", "data11", true).unwrap();
        for name in ["test1.txt", "test2.txt", "empty.txt"] {
            assert!(dir.path().join("data11").join(name).exists(), "missing {name}");
        }
        assert_eq!(fs::read_to_string(dir.path().join("data11/test1.txt")).unwrap(), "TEST 1");
    }

    #[test]
    fn refuses_copying_file_onto_itself() {
        let dir = populated_dir();
        let session = session_in(dir.path());

        let err = execute(&session, "testD.txt", "testD.txt", false).unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
        assert_eq!(fs::read_to_string(dir.path().join("testD.txt")).unwrap(), "TEST D");

        // Into-directory placement resolving back to the source is the
        // same self-copy.
        let err = execute(&session, "testD.txt", ".", false).unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
        assert_eq!(fs::read_to_string(dir.path().join("testD.txt")).unwrap(), "TEST D");
    }

    #[test]
    fn refuses_copying_directory_into_itself() {
        let dir = populated_dir();
        let session = session_in(dir.path());

        let err = execute(&session, "data1", "data1", true).unwrap_err();
        assert!(matches!(err, AppError::Io(_)));

        let err = execute(&session, "data1", "data1/nested", true).unwrap_err();
        assert!(matches!(err, AppError::Io(_)));

        assert_eq!(fs::read_to_string(dir.path().join("data1/test1.txt")).unwrap(), "TEST 1");
        assert!(!dir.path().join("data1/nested").exists());
    }

    #[test]
    fn fails_for_missing_source() {
        let dir = populated_dir();
        let session = session_in(dir.path());

        let err = execute(&session, "nope.txt", "copy.txt", false).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(!dir.path().join("copy.txt").exists());
    }

    #[test]
    fn refuses_directory_over_file() {
        let dir = populated_dir();
        let session = session_in(dir.path());

        let err = execute(&session, "data1", "testD.txt", true).unwrap_err();
        assert!(matches!(err, AppError::IsADirectory(_)));
        assert_eq!(fs::read_to_string(dir.path().join("testD.txt")).unwrap(), "TEST D");
    }

    #[test]
    fn refuses_directory_source_without_recursive() {
        let dir = populated_dir();
        let session = session_in(dir.path());

        let err = execute(&session, "data1", "data11", false).unwrap_err();
        assert!(matches!(err, AppError::IsADirectory(_)));
        assert!(!dir.path().join("data11").exists());
    }
}
