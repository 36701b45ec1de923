//! Reading and writing the record file.
//!
//! The whole collection lives in one JSON file holding an array of flat
//! string objects. It is read once when a store is opened and rewritten in
//! full after every mutation.

use std::fs::{self, File, Permissions};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use log::debug;
use tempfile::NamedTempFile;

use crate::error::{Error, Result};
use crate::record::Record;

const FILE_DESCRIPTION: &str = "record";

fn get_record_reader(path: &Path) -> Result<Option<File>> {
    match File::open(path) {
        Ok(reader) => Ok(Some(reader)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::io_error(
            FILE_DESCRIPTION.to_string(),
            path.display().to_string(),
            e,
        )),
    }
}

/// Loads the full collection from `path`.
///
/// A missing file is an empty collection. Anything else that is not a JSON
/// array of objects with string values is rejected, including an empty file.
///
/// # Arguments
///
/// * `path` - Path to the record file
///
/// # Returns
///
/// The stored records in file order, or an empty vector if the file doesn't
/// exist.
///
/// # Errors
///
/// Returns an error if:
/// - The file exists but cannot be read
/// - The file is not valid JSON, or not an array of flat string maps
pub fn load_records(path: &Path) -> Result<Vec<Record>> {
    let Some(reader) = get_record_reader(path)? else {
        debug!("No record file at `{}`, starting empty", path.display());
        return Ok(Vec::new());
    };

    let records: Vec<Record> = serde_json::from_reader(BufReader::new(reader)).map_err(|e| {
        Error::json_error("reading".to_string(), path.display().to_string(), e)
    })?;

    debug!("Loaded {} records from `{}`", records.len(), path.display());
    Ok(records)
}

/// Resolves where a rewrite of `path` has to land.
///
/// An existing file is followed through any symlinks so the rename replaces
/// the real file and leaves the links pointing at it. Its permissions are
/// returned so the replacement keeps them.
fn resolve_target(path: &Path) -> std::io::Result<(PathBuf, Option<Permissions>)> {
    match fs::symlink_metadata(path) {
        Ok(_) => {
            let target = fs::canonicalize(path)?;
            let permissions = fs::metadata(&target)?.permissions();
            Ok((target, Some(permissions)))
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok((path.to_path_buf(), None)),
        Err(e) => Err(e),
    }
}

/// Rewrites the record file at `path` with `records`.
///
/// The collection is written to a temporary file next to the target and
/// renamed over it, so an interrupted write never leaves a truncated file.
/// When `path` is a symlink the file it points to is the one replaced, and an
/// existing file keeps its permissions. The parent directory must already
/// exist.
///
/// # Arguments
///
/// * `path` - Path to the record file, or a symlink to it
/// * `records` - The full collection to write
///
/// # Errors
///
/// Returns an error if:
/// - An existing file or symlink at `path` cannot be resolved
/// - The temporary file cannot be created, written, synced or renamed into place
pub fn write_records(path: &Path, records: &[Record]) -> Result<()> {
    let io_error = |e: std::io::Error| {
        Error::io_error(
            FILE_DESCRIPTION.to_string(),
            path.display().to_string(),
            e,
        )
    };

    let (target, permissions) = resolve_target(path).map_err(io_error)?;

    let directory = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let temp_file = NamedTempFile::new_in(directory).map_err(io_error)?;

    {
        let mut writer = BufWriter::new(temp_file.as_file());
        serde_json::to_writer(&mut writer, records).map_err(|e| {
            Error::json_error("writing".to_string(), path.display().to_string(), e)
        })?;
        writer.flush().map_err(io_error)?;
    }

    if let Some(permissions) = permissions {
        temp_file
            .as_file()
            .set_permissions(permissions)
            .map_err(io_error)?;
    }

    temp_file.as_file().sync_all().map_err(io_error)?;
    temp_file.persist(&target).map_err(|e| io_error(e.error))?;

    debug!("Wrote {} records to `{}`", records.len(), target.display());
    Ok(())
}
