//! cm Core Library
//!
//! This crate provides the storage layer of `cm`, a personal command-snippet
//! manager that keeps short shell commands together with a tag and a
//! description so they can be browsed and typed back into a terminal.
//!
//! # Key Features
//!
//! - **Record Store**: An embedded collection of flat string records persisted
//!   as a single JSON array, rewritten atomically after every change
//! - **Unique Indexes**: Named fields that no two records may share a value for,
//!   enforced on insert
//! - **Predicate Queries**: Find, update and delete records with closures
//! - **Command Entries**: Typed `command`/`tag`/`description` view with validation
//! - **Configuration**: Default store location and the index set the snippet
//!   manager relies on
//!
//! # Examples
//!
//! Adding a command and listing everything stored:
//!
//! ```no_run
//! use cm_core::command_entry::{sorted_by_tag, CommandEntry};
//! use cm_core::config::{ensure_store_directory, get_store_path, open_command_store};
//!
//! let path = get_store_path(&None);
//! ensure_store_directory(&path)?;
//! let mut store = open_command_store(&path)?;
//!
//! CommandEntry::new("ls -la", "fs", "list files").insert_into(&mut store)?;
//!
//! for (position, entry) in sorted_by_tag(&store).iter().enumerate() {
//!     println!("{position}: {entry}");
//! }
//! # Ok::<(), cm_core::error::Error>(())
//! ```

pub mod command_entry;
pub mod config;
pub mod error;
pub mod file_handling;
pub mod record;
pub mod store;
