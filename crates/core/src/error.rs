use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Duplicate entry: a record with {} `{}` already exists", .field, .value)]
    DuplicateEntry { field: String, value: String },

    #[error("IO error with {} file at path `{}`: {}", .file_description, .path, .original)]
    Io {
        file_description: String,
        path: String,
        original: std::io::Error,
    },

    #[error("Error {} record file at `{}`: {}", .action, .path, .original)]
    Json {
        action: String,
        path: String,
        original: serde_json::Error,
    },

    #[error("Required field `{}` is missing or empty", .0)]
    MissingField(String),

    #[error("Field `{}` is {} characters long, the limit is {}", .field, .actual, .max)]
    FieldTooLong {
        field: String,
        max: usize,
        actual: usize,
    },
}

impl Error {
    pub fn duplicate_entry(field: &str, value: &str) -> Self {
        Self::DuplicateEntry {
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    pub fn io_error(file_description: String, path: String, original: std::io::Error) -> Self {
        Self::Io {
            file_description,
            path,
            original,
        }
    }

    pub fn json_error(action: String, path: String, original: serde_json::Error) -> Self {
        Self::Json {
            action,
            path,
            original,
        }
    }

    /// Whether this is the one error a caller can recover from by retrying
    /// with a different record.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::DuplicateEntry { .. })
    }
}
