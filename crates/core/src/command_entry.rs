//! Typed view over the records the snippet manager stores.
//!
//! The store itself only knows flat string maps. This module gives those
//! maps their application shape (a shell command, a short tag and a short
//! description) along with the checks a record must pass before insert.

use std::fmt::{Display, Formatter};

use crate::config::{COMMAND_FIELD, DESCRIPTION_FIELD, TAG_FIELD};
use crate::error::Error::{FieldTooLong, MissingField};
use crate::error::Result;
use crate::record::{field_equals, from_pairs, Record};
use crate::store::RecordStore;

pub const MAX_TAG_LENGTH: usize = 20;
pub const MAX_DESCRIPTION_LENGTH: usize = 30;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandEntry {
    pub command: String,
    pub tag: String,
    pub description: String,
}

impl CommandEntry {
    pub fn new(command: &str, tag: &str, description: &str) -> Self {
        Self {
            command: command.to_string(),
            tag: tag.to_string(),
            description: description.to_string(),
        }
    }

    /// Reads an entry out of a stored record.
    ///
    /// Missing fields read as empty strings, since records written by hand or
    /// by older versions may lack them.
    pub fn from_record(record: &Record) -> Self {
        let get = |field: &str| record.get(field).cloned().unwrap_or_default();

        Self {
            command: get(COMMAND_FIELD),
            tag: get(TAG_FIELD),
            description: get(DESCRIPTION_FIELD),
        }
    }

    pub fn to_record(&self) -> Record {
        from_pairs([
            (COMMAND_FIELD, self.command.as_str()),
            (TAG_FIELD, self.tag.as_str()),
            (DESCRIPTION_FIELD, self.description.as_str()),
        ])
    }

    /// Checks the entry is fit to be stored.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The command or the tag is empty
    /// - The tag is longer than [`MAX_TAG_LENGTH`] characters
    /// - The description is longer than [`MAX_DESCRIPTION_LENGTH`] characters
    pub fn validate(&self) -> Result<()> {
        if self.command.is_empty() {
            return Err(MissingField(COMMAND_FIELD.to_string()));
        }

        if self.tag.is_empty() {
            return Err(MissingField(TAG_FIELD.to_string()));
        }

        check_length(TAG_FIELD, &self.tag, MAX_TAG_LENGTH)?;
        check_length(DESCRIPTION_FIELD, &self.description, MAX_DESCRIPTION_LENGTH)
    }

    /// Validates the entry and inserts it into `store`.
    ///
    /// # Errors
    ///
    /// Returns a validation error, or any error from [`RecordStore::insert`].
    pub fn insert_into(&self, store: &mut RecordStore) -> Result<()> {
        self.validate()?;
        store.insert(self.to_record())
    }
}

fn check_length(field: &str, value: &str, max: usize) -> Result<()> {
    let actual = value.chars().count();
    if actual > max {
        return Err(FieldTooLong {
            field: field.to_string(),
            max,
            actual,
        });
    }

    Ok(())
}

impl From<&Record> for CommandEntry {
    fn from(record: &Record) -> Self {
        Self::from_record(record)
    }
}

impl From<CommandEntry> for Record {
    fn from(entry: CommandEntry) -> Self {
        entry.to_record()
    }
}

impl Display for CommandEntry {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        if self.description.is_empty() {
            write!(formatter, "[{}] {}", self.tag, self.command)
        } else {
            write!(
                formatter,
                "[{}] {} ({})",
                self.tag, self.command, self.description
            )
        }
    }
}

/// All entries in listing order: sorted by tag, ties kept in stored order.
///
/// Listing positions are how a picked line is mapped back to its command,
/// so callers must resolve them against this same ordering.
pub fn sorted_by_tag(store: &RecordStore) -> Vec<CommandEntry> {
    let mut entries: Vec<CommandEntry> = store
        .find(|_| true)
        .into_iter()
        .map(CommandEntry::from_record)
        .collect();
    entries.sort_by(|a, b| a.tag.cmp(&b.tag));
    entries
}

/// The command at `position` in [`sorted_by_tag`] order.
pub fn command_at(store: &RecordStore, position: usize) -> Option<String> {
    sorted_by_tag(store)
        .into_iter()
        .nth(position)
        .map(|entry| entry.command)
}

pub fn find_by_command(store: &RecordStore, command: &str) -> Option<CommandEntry> {
    store
        .find(|record| field_equals(record, COMMAND_FIELD, command))
        .first()
        .map(|record| CommandEntry::from_record(record))
}

/// Deletes the entry stored under `command`. Returns whether one was removed.
///
/// # Errors
///
/// Returns an error if the store cannot be rewritten.
pub fn remove_command(store: &mut RecordStore, command: &str) -> Result<bool> {
    let removed = store.delete(|record| field_equals(record, COMMAND_FIELD, command))?;
    Ok(removed > 0)
}

/// Replaces the entry stored under `command` with `edit`'s result.
///
/// `edit` receives the current entry and returns `None` to keep it as is.
/// The edited fields are merged over the stored record, so fields this
/// module does not know about survive. The replacement is validated but,
/// like every store update, not checked for uniqueness.
///
/// # Errors
///
/// Returns an error if the store cannot be rewritten. An edited entry that
/// fails validation leaves the store untouched and returns the validation
/// error.
pub fn replace_command<F>(store: &mut RecordStore, command: &str, mut edit: F) -> Result<bool>
where
    F: FnMut(CommandEntry) -> Option<CommandEntry>,
{
    let Some(current) = find_by_command(store, command) else {
        return Ok(false);
    };
    let Some(edited) = edit(current) else {
        return Ok(false);
    };
    edited.validate()?;

    let replaced = store.update(
        |mut record| {
            record.extend(edited.to_record());
            Some(record)
        },
        |record| field_equals(record, COMMAND_FIELD, command),
    )?;

    Ok(replaced > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use tempfile::{tempdir, TempDir};

    fn create_test_store(entries: &[CommandEntry]) -> (TempDir, RecordStore) {
        let dir = tempdir().unwrap();
        let mut store = RecordStore::open(dir.path().join("cm.json")).unwrap();
        store.set_index(COMMAND_FIELD);
        store.set_index(DESCRIPTION_FIELD);
        for entry in entries {
            entry.insert_into(&mut store).unwrap();
        }
        (dir, store)
    }

    #[test]
    fn test_validate_valid() {
        assert!(CommandEntry::new("ls -la", "fs", "list files").validate().is_ok());
        assert!(CommandEntry::new("ls -la", "fs", "").validate().is_ok());
    }

    #[test]
    fn test_validate_missing_command() {
        let result = CommandEntry::new("", "fs", "list").validate();
        assert!(matches!(result, Err(MissingField(field)) if field == "command"));
    }

    #[test]
    fn test_validate_missing_tag() {
        let result = CommandEntry::new("ls", "", "list").validate();
        assert!(matches!(result, Err(MissingField(field)) if field == "tag"));
    }

    #[test]
    fn test_validate_whitespace_is_present() {
        assert!(CommandEntry::new(" ", " ", "").validate().is_ok());
    }

    #[test]
    fn test_validate_lengths() {
        let tag = "t".repeat(MAX_TAG_LENGTH);
        let description = "d".repeat(MAX_DESCRIPTION_LENGTH);
        assert!(CommandEntry::new("ls", &tag, &description).validate().is_ok());

        let result = CommandEntry::new("ls", &format!("{tag}x"), "").validate();
        assert!(matches!(result, Err(FieldTooLong { max: 20, actual: 21, .. })));

        let result = CommandEntry::new("ls", "fs", &format!("{description}x")).validate();
        assert!(matches!(result, Err(FieldTooLong { max: 30, actual: 31, .. })));
    }

    #[test]
    fn test_record_conversion() {
        let entry = CommandEntry::new("git status", "git", "status");
        let record: Record = entry.clone().into();
        let fields: Vec<&str> = record.keys().map(String::as_str).collect();
        assert_eq!(fields, vec!["command", "tag", "description"]);
        assert_eq!(CommandEntry::from(&record), entry);
    }

    #[test]
    fn test_from_record_missing_description() {
        let record = from_pairs([("command", "pwd"), ("tag", "fs")]);
        let entry = CommandEntry::from_record(&record);
        assert_eq!(entry, CommandEntry::new("pwd", "fs", ""));
    }

    #[test]
    fn test_display() {
        let entry = CommandEntry::new("ls -la", "fs", "list files");
        assert_eq!(format!("{entry}"), "[fs] ls -la (list files)");
        let entry = CommandEntry::new("pwd", "fs", "");
        assert_eq!(format!("{entry}"), "[fs] pwd");
    }

    #[test]
    fn test_sorted_by_tag_is_stable() {
        let (_dir, store) = create_test_store(&[
            CommandEntry::new("kubectl get pods", "k8s", "pods"),
            CommandEntry::new("ls -la", "fs", "list files"),
            CommandEntry::new("df -h", "fs", "disk usage"),
        ]);

        let commands: Vec<String> = sorted_by_tag(&store)
            .into_iter()
            .map(|entry| entry.command)
            .collect();
        assert_eq!(commands, vec!["ls -la", "df -h", "kubectl get pods"]);
        assert_eq!(command_at(&store, 2), Some("kubectl get pods".to_string()));
        assert_eq!(command_at(&store, 3), None);
    }

    #[test]
    fn test_insert_into_rejects_invalid_before_store() {
        let (_dir, mut store) = create_test_store(&[]);
        let result = CommandEntry::new("ls", "", "list").insert_into(&mut store);
        assert!(matches!(result, Err(MissingField(_))));
        assert!(store.is_empty());
    }

    #[test]
    fn test_insert_into_duplicate_description() {
        let (_dir, mut store) =
            create_test_store(&[CommandEntry::new("ls", "fs", "list files")]);
        let result = CommandEntry::new("ls -la", "fs", "list files").insert_into(&mut store);
        assert!(matches!(result, Err(Error::DuplicateEntry { .. })));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_remove_command() {
        let (_dir, mut store) = create_test_store(&[
            CommandEntry::new("ls", "fs", "list"),
            CommandEntry::new("pwd", "fs", "where"),
        ]);

        assert!(remove_command(&mut store, "ls").unwrap());
        assert!(!remove_command(&mut store, "ls").unwrap());
        assert!(find_by_command(&store, "ls").is_none());
        assert!(find_by_command(&store, "pwd").is_some());
    }

    #[test]
    fn test_replace_command() {
        let (_dir, mut store) = create_test_store(&[
            CommandEntry::new("ls", "fs", "list"),
            CommandEntry::new("pwd", "fs", "where"),
        ]);

        let replaced = replace_command(&mut store, "ls", |mut entry| {
            entry.command = "ls -la".to_string();
            entry.description = "list all".to_string();
            Some(entry)
        })
        .unwrap();

        assert!(replaced);
        assert_eq!(
            CommandEntry::from_record(&store.records()[0]),
            CommandEntry::new("ls -la", "fs", "list all")
        );
    }

    #[test]
    fn test_replace_command_keeps_unknown_fields() {
        let (_dir, mut store) = create_test_store(&[]);
        store
            .insert(from_pairs([
                ("command", "ls"),
                ("tag", "fs"),
                ("description", "list"),
                ("shell", "zsh"),
            ]))
            .unwrap();

        replace_command(&mut store, "ls", |mut entry| {
            entry.tag = "files".to_string();
            Some(entry)
        })
        .unwrap();

        assert_eq!(store.records()[0]["tag"], "files");
        assert_eq!(store.records()[0]["shell"], "zsh");
    }

    #[test]
    fn test_replace_command_no_edit() {
        let (_dir, mut store) = create_test_store(&[CommandEntry::new("ls", "fs", "list")]);
        assert!(!replace_command(&mut store, "ls", |_| None).unwrap());
        assert!(!replace_command(&mut store, "missing", Some).unwrap());
        assert_eq!(
            CommandEntry::from_record(&store.records()[0]),
            CommandEntry::new("ls", "fs", "list")
        );
    }

    #[test]
    fn test_replace_command_invalid_edit() {
        let (_dir, mut store) = create_test_store(&[CommandEntry::new("ls", "fs", "list")]);
        let result = replace_command(&mut store, "ls", |mut entry| {
            entry.tag = String::new();
            Some(entry)
        });
        assert!(matches!(result, Err(MissingField(_))));
        assert_eq!(store.records()[0]["tag"], "fs");
    }
}
