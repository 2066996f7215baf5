use snafu::{Location, Snafu};
use tansu_common::ChunkIndex;
use tansu_utils::object_storage::ObjectStorageError;

#[derive(Snafu, Debug)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("object storage operation failed"))]
    ObjectStorage {
        #[snafu(implicit)]
        location: Location,
        #[snafu(source)]
        error: ObjectStorageError,
    },

    #[snafu(display("no object storage backend for scheme {scheme:?}"))]
    UnsupportedBackend {
        scheme: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("chunk size must be a positive number of bytes"))]
    InvalidChunkSize {
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("chunk store is closed"))]
    Closed {
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("chunk {index} must be exactly {expected} bytes, got {actual}"))]
    ChunkSizeMismatch {
        index: ChunkIndex,
        expected: usize,
        actual: usize,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("chunk {index} is past the last chunk {last_index}"))]
    InvalidChunkIndex {
        index: ChunkIndex,
        last_index: ChunkIndex,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("chunk {index} not found"))]
    ChunkNotFound {
        index: ChunkIndex,
        #[snafu(implicit)]
        location: Location,
    },
}

impl Error {
    /// Distinguishes "never written" from a backend failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::ChunkNotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
