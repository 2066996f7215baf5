mod chunk_store;
mod config;
mod error;

pub use chunk_store::{ChunkRange, ChunkStore, ChunkStoreBuilder, ChunkStoreRef};
pub use config::{open_object_storage, Config};
pub use error::{Error, Result};
