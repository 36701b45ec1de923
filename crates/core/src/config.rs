//! Store location and record layout for the snippet manager.
//!
//! This module resolves the path of the record file, expanding shell
//! variables like `~`, and names the fields and indexes every store opened
//! for the snippet manager is expected to use.

use std::fs;
use std::path::Path;

use log::debug;

use crate::error::{Error, Result};
use crate::store::RecordStore;

/// Default location of the record file
const DEFAULT_STORE_PATH: &str = "~/.local/cm/cm.json";

pub const COMMAND_FIELD: &str = "command";
pub const TAG_FIELD: &str = "tag";
pub const DESCRIPTION_FIELD: &str = "description";

/// Fields that must be unique across stored commands.
pub const DEFAULT_INDEXES: [&str; 2] = [COMMAND_FIELD, DESCRIPTION_FIELD];

/// Resolves the record file path.
///
/// If a custom path is provided, uses that path. Otherwise, uses the default
/// store path. Shell expansions like `~` are resolved.
///
/// # Arguments
///
/// * `store_path_arg` - Optional custom record file path
///
/// # Returns
///
/// The resolved absolute path to the record file
///
/// # Examples
///
/// ```
/// use cm_core::config::get_store_path;
///
/// let default_path = get_store_path(&None);
/// assert!(default_path.ends_with("cm.json"));
///
/// let custom_path = get_store_path(&Some("/tmp/commands.json".to_string()));
/// assert_eq!(custom_path, "/tmp/commands.json");
/// ```
pub fn get_store_path(store_path_arg: &Option<String>) -> String {
    let store_path = match store_path_arg {
        Some(store_path) => store_path,
        None => DEFAULT_STORE_PATH,
    };

    shellexpand::tilde(store_path).to_string()
}

/// Opens the store at `path` with [`DEFAULT_INDEXES`] declared.
///
/// Index declarations are not saved with the records, so every process that
/// opens the snippet store should go through here to get the same
/// constraints.
///
/// # Arguments
///
/// * `path` - Path to the record file
///
/// # Returns
///
/// A store holding every saved record, with `command` and `description`
/// declared unique
///
/// # Errors
///
/// Returns an error if the existing file cannot be read or parsed.
pub fn open_command_store<P: AsRef<Path>>(path: P) -> Result<RecordStore> {
    let mut store = RecordStore::open(path)?;
    for index in DEFAULT_INDEXES {
        store.set_index(index);
    }

    Ok(store)
}

/// Creates the directory the record file lives in, if it is missing.
///
/// The store never creates directories itself, so this has to run before the
/// first mutation of a fresh install.
///
/// # Arguments
///
/// * `path` - Path to the record file whose directory should exist
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_store_directory<P: AsRef<Path>>(path: P) -> Result<()> {
    let Some(directory) = path.as_ref().parent() else {
        return Ok(());
    };
    if directory.as_os_str().is_empty() || directory.is_dir() {
        return Ok(());
    }

    debug!("Creating store directory `{}`", directory.display());
    fs::create_dir_all(directory).map_err(|e| {
        Error::io_error(
            "store directory".to_string(),
            directory.display().to_string(),
            e,
        )
    })
}
