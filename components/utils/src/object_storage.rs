// Copyright 2026 tansu
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::{path::Path, sync::Arc};

use object_store::aws::AmazonS3Builder;
// callers need the trait in scope to use the handle
pub use object_store::ObjectStore;

pub type ObjectStorage = Arc<dyn ObjectStore>;

pub type ObjectStorageError = object_store::Error;

pub type ObjectStoragePath = object_store::path::Path;

pub fn is_not_found_error(e: &ObjectStorageError) -> bool {
    matches!(e, ObjectStorageError::NotFound { .. })
}

pub fn new_memory_object_store() -> ObjectStorage {
    Arc::new(object_store::memory::InMemory::new())
}

pub fn new_local_object_store<P: AsRef<Path>>(
    path: P,
) -> Result<ObjectStorage, ObjectStorageError> {
    let path = path.as_ref();
    std::fs::create_dir_all(path).map_err(|e| ObjectStorageError::Generic {
        store: "LocalFileSystem",
        source: Box::new(e),
    })?;
    let object_sto: Arc<dyn ObjectStore> =
        Arc::new(object_store::local::LocalFileSystem::new_with_prefix(path)?);
    Ok(object_sto)
}

pub fn new_minio_store() -> Result<ObjectStorage, ObjectStorageError> {
    let object_sto: Arc<dyn ObjectStore> = Arc::new(
        AmazonS3Builder::from_env()
            .with_region("auto")
            .with_endpoint("http://localhost:9000")
            .with_allow_http(true)
            .with_bucket_name("tansu")
            .build()?,
    );
    Ok(object_sto)
}
