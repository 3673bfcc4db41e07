//! Session state: the current working directory of one command-execution
//! context, and the path resolution every command goes through.

use std::path::{Path, PathBuf};

use crate::error::AppError;
use crate::fsutil::{self, FileKind};

/// One live command-execution context.
///
/// The session owns exactly one piece of mutable state, the current
/// directory. It is passed explicitly into every operation so multiple
/// sessions can coexist (and tests never touch the process working
/// directory).
#[derive(Debug, Clone)]
pub struct Session {
    current_dir: PathBuf,
}

impl Session {
    /// Create a session rooted at the given directory.
    ///
    /// The directory must exist: the current directory is always a
    /// resolvable directory on the host filesystem.
    pub fn new(current_dir: PathBuf) -> Result<Self, AppError> {
        match fsutil::classify(&current_dir)? {
            FileKind::Directory => Ok(Self { current_dir }),
            _ => Err(AppError::not_a_directory(&current_dir)),
        }
    }

    /// Create a session rooted at the process working directory.
    pub fn current() -> Result<Self, AppError> {
        Ok(Self { current_dir: std::env::current_dir()? })
    }

    /// The session's current directory.
    pub fn current_dir(&self) -> &Path {
        &self.current_dir
    }

    /// Resolve a user-supplied path token against the current directory.
    ///
    /// Handles `/`, `.`, `..`, `~` and relative segments; performs no
    /// existence check and touches no filesystem state. Callers validate
    /// the result per operation.
    pub fn resolve(&self, token: &str) -> PathBuf {
        match token {
            "/" => PathBuf::from("/"),
            "" | "." => self.current_dir.clone(),
            ".." => {
                // Root's parent is root.
                self.current_dir
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| self.current_dir.clone())
            }
            _ => {
                if let Some(rest) = token.strip_prefix('~') {
                    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("/"));
                    return fsutil::normalize_path(&home.join(rest.trim_start_matches('/')));
                }
                // `join` passes absolute tokens through unchanged.
                fsutil::normalize_path(&self.current_dir.join(token))
            }
        }
    }

    /// Change the current directory.
    pub fn cd(&mut self, token: &str) -> Result<(), AppError> {
        let target = self.resolve(token);
        match fsutil::classify(&target)? {
            FileKind::Directory => {
                self.current_dir = target;
                Ok(())
            }
            _ => Err(AppError::not_a_directory(&target)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn session_in(dir: &Path) -> Session {
        Session::new(dir.to_path_buf()).unwrap()
    }

    #[test]
    fn resolve_root_and_dot_tokens() {
        let dir = TempDir::new().unwrap();
        let session = session_in(dir.path());

        assert_eq!(session.resolve("/"), PathBuf::from("/"));
        assert_eq!(session.resolve("."), dir.path());
        assert_eq!(session.resolve(""), dir.path());
    }

    #[test]
    fn resolve_parent_of_root_is_root() {
        let session = Session { current_dir: PathBuf::from("/") };
        assert_eq!(session.resolve(".."), PathBuf::from("/"));
    }

    #[test]
    fn resolve_joins_and_normalizes_relative_tokens() {
        let dir = TempDir::new().unwrap();
        let session = session_in(dir.path());

        assert_eq!(session.resolve("sub/file.txt"), dir.path().join("sub/file.txt"));
        assert_eq!(session.resolve("a/../b"), dir.path().join("b"));
        assert_eq!(session.resolve("/etc/hosts"), PathBuf::from("/etc/hosts"));
    }

    #[test]
    fn resolve_expands_home_prefix() {
        let dir = TempDir::new().unwrap();
        let session = session_in(dir.path());
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("/"));

        assert_eq!(session.resolve("~"), home);
        assert_eq!(session.resolve("~/notes"), home.join("notes"));
    }

    #[test]
    fn cd_moves_into_subdirectory_and_back() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        let mut session = session_in(dir.path());

        session.cd("sub").unwrap();
        assert_eq!(session.current_dir(), dir.path().join("sub"));

        session.cd("..").unwrap();
        assert_eq!(session.current_dir(), dir.path());
    }

    #[test]
    fn cd_dot_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let mut session = session_in(dir.path());
        session.cd(".").unwrap();
        assert_eq!(session.current_dir(), dir.path());
    }

    #[test]
    fn cd_fails_for_missing_or_non_directory_targets() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("plain.txt"), "x").unwrap();
        let mut session = session_in(dir.path());

        let err = session.cd("nope").unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let err = session.cd("plain.txt").unwrap_err();
        assert!(matches!(err, AppError::NotADirectory(_)));
    }
}
