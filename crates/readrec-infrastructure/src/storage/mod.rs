//! File-based configuration storage.

pub mod catalog_storage;
pub mod secret_storage;
