//! The JSON-backed record store.
//!
//! A [`RecordStore`] holds the whole collection in memory, bound to one file.
//! Reads never touch the disk; every successful mutation rewrites the file
//! before returning.
//!
//! Indexed fields are uniqueness constraints checked on insert only.
//! [`RecordStore::update`] does not re-check them, so a mutator can introduce
//! a duplicate. Index declarations are not persisted and have to be made
//! again, identically, every time a store is opened.

use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::error::{Error, Result};
use crate::file_handling::{load_records, write_records};
use crate::record::{field_equals, Record};

#[derive(Debug)]
pub struct RecordStore {
    path: PathBuf,
    records: Vec<Record>,
    indexes: Vec<String>,
}

impl RecordStore {
    /// Opens the store backed by `path`, loading every record it holds.
    ///
    /// A missing file gives an empty store. Neither the file nor its parent
    /// directory is created until the first mutation, and the directory must
    /// exist by then.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or is not a
    /// JSON array of flat string objects.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use cm_core::store::RecordStore;
    ///
    /// let mut store = RecordStore::open("/home/me/.local/cm/cm.json")?;
    /// store.set_index("command");
    /// let everything = store.find(|_| true);
    /// println!("{} commands", everything.len());
    /// # Ok::<(), cm_core::error::Error>(())
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let records = load_records(&path)?;

        Ok(Self {
            path,
            records,
            indexes: Vec::new(),
        })
    }

    /// Declares `field` as unique across the collection.
    ///
    /// Existing records are not checked; only later inserts are.
    pub fn set_index(&mut self, field: &str) {
        if !self.indexes.iter().any(|index| index == field) {
            self.indexes.push(field.to_string());
        }
    }

    pub fn indexes(&self) -> &[String] {
        &self.indexes
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn check_unique<'a, I>(&self, record: &Record, others: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a Record> + Clone,
    {
        for index in &self.indexes {
            let Some(value) = record.get(index) else {
                continue;
            };

            if others
                .clone()
                .into_iter()
                .any(|existing| field_equals(existing, index, value))
            {
                warn!("Rejected insert, {index} `{value}` is already stored");
                return Err(Error::duplicate_entry(index, value));
            }
        }

        Ok(())
    }

    /// Appends `record` and rewrites the file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateEntry`] without changing anything if any
    /// indexed field of `record` repeats the value of an existing record.
    /// Returns an IO or JSON error if the file cannot be rewritten, in which
    /// case the in-memory collection is left as it was.
    pub fn insert(&mut self, record: Record) -> Result<()> {
        self.check_unique(&record, &self.records)?;

        self.records.push(record);
        if let Err(e) = write_records(&self.path, &self.records) {
            self.records.pop();
            return Err(e);
        }

        info!("Inserted record, {} stored", self.records.len());
        Ok(())
    }

    /// Appends all `records` with a single rewrite of the file.
    ///
    /// Every record is checked against the stored collection and against the
    /// records before it in the batch. One collision rejects the whole batch.
    ///
    /// # Errors
    ///
    /// Same as [`RecordStore::insert`].
    pub fn insert_all(&mut self, records: Vec<Record>) -> Result<()> {
        for (position, record) in records.iter().enumerate() {
            self.check_unique(record, self.records.iter().chain(&records[..position]))?;
        }

        let previous_len = self.records.len();
        let inserted = records.len();
        self.records.extend(records);
        if let Err(e) = write_records(&self.path, &self.records) {
            self.records.truncate(previous_len);
            return Err(e);
        }

        info!("Inserted {inserted} records, {} stored", self.records.len());
        Ok(())
    }

    /// Returns the records matching `predicate`, in stored order.
    pub fn find<P>(&self, predicate: P) -> Vec<&Record>
    where
        P: Fn(&Record) -> bool,
    {
        self.records
            .iter()
            .filter(|&record| predicate(record))
            .collect()
    }

    /// Hands a copy of every record matching `predicate` to `mutator`.
    ///
    /// When the mutator returns `Some`, that record takes the matched
    /// record's position; `None` leaves the record untouched. The file is
    /// rewritten once afterwards. Indexed fields are not re-validated.
    ///
    /// Returns the number of records that were replaced.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be rewritten; the in-memory
    /// collection is then unchanged.
    pub fn update<M, P>(&mut self, mut mutator: M, predicate: P) -> Result<usize>
    where
        M: FnMut(Record) -> Option<Record>,
        P: Fn(&Record) -> bool,
    {
        let mut replaced = 0;
        let updated: Vec<Record> = self
            .records
            .iter()
            .map(|record| {
                if !predicate(record) {
                    return record.clone();
                }

                match mutator(record.clone()) {
                    Some(replacement) => {
                        replaced += 1;
                        replacement
                    }
                    None => record.clone(),
                }
            })
            .collect();

        write_records(&self.path, &updated)?;
        self.records = updated;

        info!("Updated {replaced} records");
        Ok(replaced)
    }

    /// Removes every record matching `predicate` and rewrites the file.
    ///
    /// Returns the number of records removed, which may be zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be rewritten; the in-memory
    /// collection is then unchanged.
    pub fn delete<P>(&mut self, predicate: P) -> Result<usize>
    where
        P: Fn(&Record) -> bool,
    {
        let remaining: Vec<Record> = self
            .records
            .iter()
            .filter(|&record| !predicate(record))
            .cloned()
            .collect();
        let removed = self.records.len() - remaining.len();

        write_records(&self.path, &remaining)?;
        self.records = remaining;

        info!("Deleted {removed} records");
        Ok(removed)
    }
}
