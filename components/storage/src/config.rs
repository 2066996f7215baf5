use serde::{Deserialize, Serialize};
use snafu::ResultExt;
use tansu_common::{DEFAULT_CHUNK_SIZE, DEFAULT_STORE_NAME, TANSU_DEBUG_OBJECT_STORAGE};
use tansu_utils::object_storage::{self, ObjectStorage};

use crate::error::{ObjectStorageSnafu, Result, UnsupportedBackendSnafu};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Size of every chunk except possibly the last.
    pub chunk_size: usize,
    /// Declared total size of the logical stream.
    /// `None` means the length is unknown and every chunk is a full chunk.
    pub total_size: Option<usize>,
    /// Namespace all chunk keys are written under, so independent stores
    /// can share one backend.
    pub name: String,

    // ======== Object Storage Configs ===>
    pub object_storage_dsn: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE, // 4MB
            total_size: None,
            name: DEFAULT_STORE_NAME.to_string(),
            object_storage_dsn: TANSU_DEBUG_OBJECT_STORAGE.to_string(),
        }
    }
}

/// Resolve an object storage backend from a DSN.
///
/// `memory://` opens an in-memory store, `file://<path>` or a bare path
/// opens a local filesystem store rooted at that path, and `minio://` or
/// `s3://` open an S3-compatible store configured from the environment.
pub fn open_object_storage(dsn: &str) -> Result<ObjectStorage> {
    match dsn.split_once("://") {
        None => object_storage::new_local_object_store(dsn).context(ObjectStorageSnafu),
        Some(("memory", _)) => Ok(object_storage::new_memory_object_store()),
        Some(("file", path)) => {
            object_storage::new_local_object_store(path).context(ObjectStorageSnafu)
        }
        Some(("minio" | "s3", _)) => {
            object_storage::new_minio_store().context(ObjectStorageSnafu)
        }
        Some((scheme, _)) => UnsupportedBackendSnafu { scheme }.fail(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.chunk_size, DEFAULT_CHUNK_SIZE);
        assert_eq!(config.total_size, None);
        assert_eq!(config.name, DEFAULT_STORE_NAME);
        assert_eq!(config.object_storage_dsn, TANSU_DEBUG_OBJECT_STORAGE);
    }

    #[test]
    fn config_survives_serialization() {
        let config = Config {
            chunk_size: 16 << 10,
            total_size: Some(100 << 10),
            name: "movie-0".to_string(),
            object_storage_dsn: "memory://".to_string(),
        };
        let encoded = serde_json::to_string(&config).unwrap();
        let decoded: Config = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded.chunk_size, config.chunk_size);
        assert_eq!(decoded.total_size, config.total_size);
        assert_eq!(decoded.name, config.name);
        assert_eq!(decoded.object_storage_dsn, config.object_storage_dsn);
    }

    #[test]
    fn dsn_dispatch() {
        assert!(open_object_storage("memory://").is_ok());

        let tempdir = tempfile::tempdir().unwrap();
        let bare = tempdir.path().to_str().unwrap();
        assert!(open_object_storage(bare).is_ok());
        assert!(open_object_storage(&format!("file://{bare}")).is_ok());

        let err = open_object_storage("carrier-pigeon://coop").unwrap_err();
        assert!(matches!(
            err,
            Error::UnsupportedBackend { ref scheme, .. } if scheme == "carrier-pigeon"
        ));
    }
}
