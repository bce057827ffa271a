//! In-process storage backends for HBnB and the backend factory.
//!
//! [`MemoryRepository`], [`FileRepository`] and [`BlobRepository`] share one
//! table shape and identity semantics and differ only in what they persist.
//! [`Backend`] wraps those three plus the SQLite backend so the server can
//! pick one from configuration.

mod backend;
mod blob;
mod file;
mod io;
mod memory;
mod table;

pub mod error;

pub use backend::{Backend, BackendKind, StorageConfig};
pub use blob::BlobRepository;
pub use error::{Error, Result};
pub use file::FileRepository;
pub use memory::MemoryRepository;
