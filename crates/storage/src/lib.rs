#![forbid(unsafe_code)]

pub mod records;
pub mod repository;
pub mod sqlite;

pub use repository::{InMemoryStore, LocalStore, Storage, StorageError, keys};
