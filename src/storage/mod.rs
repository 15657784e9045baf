//! Storage layer for restorepoint
//!
//! Provides the append-only metadata store and the atomic JSON file I/O it
//! is built on.

pub mod file_io;
pub mod metadata;

pub use file_io::{read_json, write_json_atomic, FileLock};
pub use metadata::{InMemoryMetadataStore, JsonMetadataStore, MetadataStore};
