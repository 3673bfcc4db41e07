//! File content reading in text or raw-byte mode.

use std::fs;

use crate::error::AppError;
use crate::fsutil::{self, FileKind};
use crate::session::Session;

/// How `cat` should return the file content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReadMode {
    /// Decode as UTF-8 and return one string.
    #[default]
    Text,
    /// Return the raw byte sequence.
    Bytes,
}

/// Content of a file read by [`execute`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileContent {
    Text(String),
    Bytes(Vec<u8>),
}

/// Read the file at `token` in the requested mode.
///
/// Symbolic links are followed. Any non-regular-file target, including the
/// empty token (which resolves to the current directory), fails with
/// `IsADirectory`.
pub fn execute(session: &Session, token: &str, mode: ReadMode) -> Result<FileContent, AppError> {
    let path = session.resolve(token);
    match fsutil::classify(&path)? {
        FileKind::File => {}
        _ => return Err(AppError::is_a_directory(&path)),
    }

    match mode {
        ReadMode::Text => {
            let text = fs::read_to_string(&path).map_err(|err| AppError::from_io(err, &path))?;
            Ok(FileContent::Text(text))
        }
        ReadMode::Bytes => {
            let bytes = fs::read(&path).map_err(|err| AppError::from_io(err, &path))?;
            Ok(FileContent::Bytes(bytes))
        }
    }
}
