//! Key-value persistence providers.
//!
//! [`KeyValueStore`] abstracts the durable storage collaborator. Two
//! providers ship with the crate:
//!
//! - [`MemoryStore`]: moka-backed, process lifetime, optional quota
//! - [`FileStore`]: one file per key, atomic replace

mod file;
mod memory;
mod traits;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use traits::{validate_key, BoxFuture, KeyValueStore, StorageError, MAX_KEY_LEN};

#[cfg(test)]
pub use tests::FailingStore;
