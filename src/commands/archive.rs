//! Archive creation and extraction (tar and gzip-compressed tar).

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use tar::{Archive, Builder};

use crate::error::AppError;
use crate::fsutil::{self, FileKind};
use crate::session::Session;

/// Supported archive formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Tar,
    TarGz,
}

impl ArchiveFormat {
    /// Suffix appended to the target name, replacing any existing one.
    pub fn suffix(self) -> &'static str {
        match self {
            ArchiveFormat::Tar => "tar",
            ArchiveFormat::TarGz => "tar.gz",
        }
    }
}

impl FromStr for ArchiveFormat {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "tar" => Ok(ArchiveFormat::Tar),
            "tar.gz" | "targz" | "tgz" => Ok(ArchiveFormat::TarGz),
            other => Err(AppError::InvalidArchiveFormat(other.to_string())),
        }
    }
}

/// Build an archive of `dir_token` at `name_token`.
///
/// Any existing suffix on the target name is stripped before the format's
/// own suffix is applied. Returns the path of the archive written.
pub fn create(
    session: &Session,
    format: ArchiveFormat,
    dir_token: &str,
    name_token: &str,
) -> Result<PathBuf, AppError> {
    let source = session.resolve(dir_token);
    match fsutil::classify(&source)? {
        FileKind::Directory => {}
        _ => return Err(AppError::not_a_directory(&source)),
    }

    let target = with_format_suffix(&session.resolve(name_token), format);
    let file = File::create(&target).map_err(|err| AppError::from_io(err, &target))?;

    let result = match format {
        ArchiveFormat::Tar => build_tar(file, &source),
        ArchiveFormat::TarGz => build_tar_gz(file, &source),
    };
    result.map_err(|err| archive_error(err, &target))?;
    Ok(target)
}

/// Extract the archive at `name_token` into the session's current directory.
pub fn unpack(session: &Session, format: ArchiveFormat, name_token: &str) -> Result<(), AppError> {
    let path = session.resolve(name_token);
    match fsutil::classify(&path)? {
        FileKind::File => {}
        // Mirrors the archive contract: anything that is not a regular
        // file is "not an archive".
        _ => return Err(AppError::not_a_directory(&path)),
    }

    let file = File::open(&path).map_err(|err| AppError::from_io(err, &path))?;
    let result = match format {
        ArchiveFormat::Tar => Archive::new(file).unpack(session.current_dir()),
        ArchiveFormat::TarGz => Archive::new(GzDecoder::new(file)).unpack(session.current_dir()),
    };
    result.map_err(|err| archive_error(err, &path))
}

fn build_tar(file: File, source: &Path) -> io::Result<()> {
    let mut builder = Builder::new(file);
    builder.append_dir_all(".", source)?;
    builder.finish()
}

fn build_tar_gz(file: File, source: &Path) -> io::Result<()> {
    let encoder = GzEncoder::new(file, Compression::default());
    let mut builder = Builder::new(encoder);
    builder.append_dir_all(".", source)?;
    builder.into_inner()?.finish()?;
    Ok(())
}

fn with_format_suffix(target: &Path, format: ArchiveFormat) -> PathBuf {
    let stem = target
        .file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.split('.').next().unwrap_or(name))
        .unwrap_or("archive");
    target.with_file_name(format!("{stem}.{}", format.suffix()))
}

/// Corrupt or malformed archive content maps to `InvalidArchiveFormat`;
/// permission failures keep their own kind.
fn archive_error(err: io::Error, path: &Path) -> AppError {
    match err.kind() {
        io::ErrorKind::PermissionDenied => AppError::permission_denied(path),
        _ => AppError::InvalidArchiveFormat(format!("{}: {err}", path.display())),
    }
}
