//! Directory listing in plain (columnar) and detailed (`-l`) form.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Local};

use crate::error::AppError;
use crate::fsutil::{self, FileKind};
use crate::session::Session;

/// Options for a directory listing.
#[derive(Debug, Clone, Copy, Default)]
pub struct LsOptions {
    /// Include entries whose name starts with `.`.
    pub hidden: bool,
    /// One line per entry with permissions, size and mtime.
    pub detailed: bool,
}

/// List the directory at `token` (current directory when `None`).
///
/// Returns the output lines without trailing newlines. An empty directory
/// yields a single empty line.
pub fn execute(
    session: &Session,
    token: Option<&str>,
    options: LsOptions,
) -> Result<Vec<String>, AppError> {
    let path = session.resolve(token.unwrap_or(""));
    match fsutil::classify(&path)? {
        FileKind::Directory => {}
        _ => return Err(AppError::not_a_directory(&path)),
    }

    let mut names: Vec<String> = Vec::new();
    for entry in fs::read_dir(&path).map_err(|err| AppError::from_io(err, &path))? {
        let entry = entry.map_err(AppError::Io)?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if !options.hidden && name.starts_with('.') {
            continue;
        }
        names.push(name);
    }
    names.sort();

    if options.detailed { detailed_lines(&path, &names) } else { Ok(plain_lines(&names)) }
}

/// Columnar layout: bands of `k = n / 6 + 1` consecutive entries per line,
/// each entry left-aligned to the longest name plus two padding spaces.
fn plain_lines(names: &[String]) -> Vec<String> {
    if names.is_empty() {
        return vec![String::new()];
    }

    let k = names.len() / 6 + 1;
    let column_width = names.iter().map(String::len).max().unwrap_or(0) + 2;

    names
        .chunks(k)
        .map(|band| {
            band.iter().map(|name| format!("{name:<column_width$}")).collect::<String>()
        })
        .collect()
}

/// One line per entry: permission string, size right-aligned to 8 columns,
/// mtime as `Mon DD HH:MM`, then the name.
fn detailed_lines(dir: &Path, names: &[String]) -> Result<Vec<String>, AppError> {
    let mut lines = Vec::with_capacity(names.len());
    for name in names {
        let entry_path = dir.join(name);
        let meta =
            fs::symlink_metadata(&entry_path).map_err(|err| AppError::from_io(err, &entry_path))?;

        let modified: DateTime<Local> = meta.modified()?.into();
        lines.push(format!(
            "{} {:>8} {} {}",
            permission_string(&meta),
            meta.len(),
            modified.format("%b %d %H:%M"),
            name,
        ));
    }
    Ok(lines)
}

/// POSIX-style permission string, e.g. `drwxr-xr-x`.
#[cfg(unix)]
fn permission_string(meta: &fs::Metadata) -> String {
    use std::os::unix::fs::MetadataExt;

    let mode = meta.mode();
    let file_type = meta.file_type();
    let kind = if file_type.is_dir() {
        'd'
    } else if file_type.is_symlink() {
        'l'
    } else if file_type.is_file() {
        '-'
    } else {
        '?'
    };

    let mut out = String::with_capacity(10);
    out.push(kind);
    for shift in [6u32, 3, 0] {
        let bits = (mode >> shift) & 0o7;
        out.push(if bits & 0o4 != 0 { 'r' } else { '-' });
        out.push(if bits & 0o2 != 0 { 'w' } else { '-' });
        out.push(if bits & 0o1 != 0 { 'x' } else { '-' });
    }
    out
}

#[cfg(not(unix))]
fn permission_string(meta: &fs::Metadata) -> String {
    let kind = if meta.file_type().is_dir() { 'd' } else { '-' };
    let write = if meta.permissions().readonly() { '-' } else { 'w' };
    format!("{kind}r{write}-------")
}
