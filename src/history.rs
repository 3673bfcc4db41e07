//! History/undo subsystem: the append-only command log, the in-memory undo
//! stack, and the trash area that backs up files before destructive
//! mutation.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::AppError;
use crate::fsutil::{self, FileKind};

/// Everything needed to reverse one completed destructive operation.
///
/// One variant per operation kind, each carrying only the fields its
/// reversal needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UndoEntry {
    /// A completed `cp`: reversal deletes the copy.
    Copy { destination: PathBuf, recursive: bool },
    /// A completed `mv`: reversal moves the destination back.
    Move { source: PathBuf, destination: PathBuf },
    /// A completed `rm`: reversal restores the trash backup.
    Remove { source: PathBuf, backup: PathBuf, recursive: bool },
}

/// File-backed command log plus process-local undo stack and trash area.
///
/// Single-writer: the log is opened, written and closed per call, so a
/// concurrent reader sees line-granular consistency, but a second writing
/// process is not supported.
#[derive(Debug)]
pub struct HistoryService {
    history_file: PathBuf,
    trash_dir: PathBuf,
    stack: Vec<UndoEntry>,
}

impl HistoryService {
    /// Open (creating if absent) the history log and trash directory.
    pub fn new(history_file: PathBuf, trash_dir: PathBuf) -> Result<Self, AppError> {
        if !history_file.exists() {
            fs::write(&history_file, "")?;
        }
        fs::create_dir_all(&trash_dir)?;
        Ok(Self { history_file, trash_dir, stack: Vec::new() })
    }

    /// The trash directory backing this service.
    pub fn trash_dir(&self) -> &Path {
        &self.trash_dir
    }

    /// Append a command to the log.
    ///
    /// The sequence id is the 1-based line count of the log at append time,
    /// so it is recomputed from the file on every call.
    pub fn add(&self, command: &str) -> Result<(), AppError> {
        let content = fs::read_to_string(&self.history_file)?;
        let next_id = content.lines().count() + 1;

        let mut file = OpenOptions::new().append(true).open(&self.history_file)?;
        writeln!(file, "{next_id} {command}")?;
        Ok(())
    }

    /// Read log entries, most recent first.
    ///
    /// `length == 0` returns nothing; a negative `length` or one exceeding
    /// the log size returns the whole reversed log.
    pub fn get(&self, length: isize) -> Result<Vec<String>, AppError> {
        if length == 0 {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.history_file)?;
        let mut lines: Vec<String> = content.lines().map(str::to_string).collect();
        lines.reverse();

        if length > 0 && (length as usize) < lines.len() {
            lines.truncate(length as usize);
        }
        Ok(lines)
    }

    /// Record a reversible operation.
    pub fn push_undo(&mut self, entry: UndoEntry) {
        self.stack.push(entry);
    }

    /// Take the most recent reversible operation, if any.
    ///
    /// An empty stack is a normal outcome, not an error.
    pub fn pop_undo(&mut self) -> Option<UndoEntry> {
        self.stack.pop()
    }

    /// Copy `path` into the trash before it is destroyed.
    ///
    /// The backup keeps the original base name, suffixed `_1`, `_2`, ... on
    /// collision. The chosen path is returned even when the source vanished
    /// between check and copy; callers must tolerate a missing backup.
    pub fn backup(&self, path: &Path) -> Result<PathBuf, AppError> {
        let name = fsutil::base_name(path);
        let mut backup_path = self.trash_dir.join(&name);
        let mut counter = 1;
        while backup_path.exists() {
            backup_path = self.trash_dir.join(format!("{name}_{counter}"));
            counter += 1;
        }

        match fsutil::classify(path) {
            Ok(FileKind::File) => fsutil::copy_file(path, &backup_path)?,
            Ok(FileKind::Directory) => fsutil::copy_tree(path, &backup_path)?,
            Ok(FileKind::Other) | Err(AppError::NotFound(_)) => {
                tracing::debug!(path = %path.display(), "nothing copied into trash");
            }
            Err(err) => return Err(err),
        }
        Ok(backup_path)
    }
}
