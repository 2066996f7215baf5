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

use std::{
    fmt::{Debug, Formatter},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use bytes::{Bytes, BytesMut};
use futures::{future::try_join_all, TryStreamExt};
use snafu::{ensure, ResultExt};
use tansu_common::{
    cal_last_chunk_index, cal_last_chunk_size, ChunkIndex, ChunkSize, CHUNK_INDEX_PREFIX,
    DEFAULT_STORE_NAME, TANSU_DEBUG_OBJECT_STORAGE,
};
use tansu_utils::object_storage::{
    is_not_found_error, ObjectStorage, ObjectStoragePath, ObjectStore,
};
use tracing::debug;

use crate::{
    config::{open_object_storage, Config},
    error::{
        ChunkNotFoundSnafu, ChunkSizeMismatchSnafu, ClosedSnafu, InvalidChunkIndexSnafu,
        InvalidChunkSizeSnafu, ObjectStorageSnafu, Result,
    },
};

pub struct ChunkStoreBuilder {
    pub chunk_size: ChunkSize,
    pub total_size: Option<usize>,
    pub name: String,
    pub object_storage_dsn: String,
}

impl ChunkStoreBuilder {
    pub fn new(chunk_size: ChunkSize) -> Self {
        Self {
            chunk_size,
            total_size: None,
            name: DEFAULT_STORE_NAME.to_string(),
            object_storage_dsn: TANSU_DEBUG_OBJECT_STORAGE.to_string(),
        }
    }

    pub fn with_total_size(mut self, total_size: usize) -> Self {
        self.total_size = Some(total_size);
        self
    }

    pub fn with_name<N: AsRef<str>>(mut self, name: N) -> Self {
        self.name = name.as_ref().to_string();
        self
    }

    pub fn with_object_storage_dsn<D: AsRef<str>>(mut self, dsn: D) -> Self {
        self.object_storage_dsn = dsn.as_ref().to_string();
        self
    }

    pub fn build(self) -> Result<ChunkStore> {
        let object_storage = open_object_storage(&self.object_storage_dsn)?;
        self.build_with_object_storage(object_storage)
    }

    pub fn build_with_object_storage(self, object_storage: ObjectStorage) -> Result<ChunkStore> {
        ensure!(self.chunk_size > 0, InvalidChunkSizeSnafu);

        // A zero total size means the stream length is unknown.
        let total_size = self.total_size.filter(|total| *total > 0);
        let last_chunk = total_size.map(|total| {
            (
                cal_last_chunk_index(total, self.chunk_size),
                cal_last_chunk_size(total, self.chunk_size),
            )
        });

        debug!(
            "create chunk store {:?}, chunk size {}",
            &self.name, self.chunk_size
        );
        Ok(ChunkStore {
            chunk_size: self.chunk_size,
            total_size,
            last_chunk,
            name: self.name,
            closed: AtomicBool::new(false),
            object_storage,
        })
    }
}

pub type ChunkStoreRef = Arc<ChunkStore>;

/// Addresses a logical byte stream as fixed-size chunks stored one object
/// per chunk in the backend, under `<name>/index/<chunk-index>`.
///
/// When the stream's total size is declared, the chunk at the highest index
/// may be shorter than `chunk_size`; every other chunk is exactly
/// `chunk_size` bytes and writes of any other length are rejected before
/// they reach the backend.
pub struct ChunkStore {
    chunk_size: ChunkSize,
    total_size: Option<usize>,
    // (index, size) of the highest valid chunk, present iff total_size is.
    last_chunk: Option<(ChunkIndex, ChunkSize)>,
    name: String,
    closed: AtomicBool,
    object_storage: ObjectStorage,
}

impl Debug for ChunkStore {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChunkStore")
            .field("name", &self.name)
            .field("chunk_size", &self.chunk_size)
            .field("total_size", &self.total_size)
            .finish()
    }
}

/// Byte range within a single chunk.
///
/// `length: None` reads from `offset` to the end of the chunk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChunkRange {
    pub offset: usize,
    pub length: Option<usize>,
}

impl ChunkStore {
    pub fn with_config(config: Config) -> Result<Self> {
        let mut builder = ChunkStoreBuilder::new(config.chunk_size)
            .with_name(&config.name)
            .with_object_storage_dsn(&config.object_storage_dsn);
        if let Some(total) = config.total_size {
            builder = builder.with_total_size(total);
        }
        builder.build()
    }

    pub fn chunk_size(&self) -> ChunkSize {
        self.chunk_size
    }

    pub fn total_size(&self) -> Option<usize> {
        self.total_size
    }

    pub fn last_chunk_index(&self) -> Option<ChunkIndex> {
        self.last_chunk.map(|(index, _)| index)
    }

    pub fn last_chunk_size(&self) -> Option<ChunkSize> {
        self.last_chunk.map(|(_, size)| size)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Store one chunk. `data` must be exactly the size the index calls
    /// for; an existing chunk at the same index is overwritten.
    pub async fn put(&self, index: ChunkIndex, data: Bytes) -> Result<()> {
        self.check_open()?;

        if let Some((last_index, _)) = self.last_chunk {
            ensure!(
                index <= last_index,
                InvalidChunkIndexSnafu { index, last_index }
            );
        }

        let expected = self.expected_chunk_size(index);
        ensure!(
            data.len() == expected,
            ChunkSizeMismatchSnafu {
                index,
                expected,
                actual: data.len(),
            }
        );

        let path = self.chunk_path(index);
        self.object_storage
            .put(&path, data)
            .await
            .context(ObjectStorageSnafu)?;
        Ok(())
    }

    /// Read back a full chunk.
    pub async fn get(&self, index: ChunkIndex) -> Result<Bytes> {
        self.check_open()?;
        self.read_chunk(index).await
    }

    /// Read a byte range out of one chunk.
    ///
    /// A range covering the whole chunk returns the same bytes as [`get`].
    /// Ranges are clamped to the bytes the chunk actually has, so reading
    /// past the end yields the available suffix (possibly empty) rather
    /// than an error.
    ///
    /// [`get`]: ChunkStore::get
    pub async fn get_range(&self, index: ChunkIndex, range: ChunkRange) -> Result<Bytes> {
        self.check_open()?;
        let buf = self.read_chunk(index).await?;

        let offset = range.offset.min(buf.len());
        let end = match range.length {
            Some(length) => offset.saturating_add(length).min(buf.len()),
            None => buf.len(),
        };
        if offset == 0 && end == buf.len() {
            return Ok(buf);
        }
        // A view into the reassembled buffer; the stored payload is
        // untouched.
        Ok(buf.slice(offset..end))
    }

    /// Refuse all further operations. The backend and everything written
    /// to it are left intact.
    pub async fn close(&self) -> Result<()> {
        ensure!(!self.closed.swap(true, Ordering::AcqRel), ClosedSnafu);
        Ok(())
    }

    /// Close the store and delete every object under its namespace.
    ///
    /// Every delete is awaited; the first backend failure propagates, so a
    /// clean return means the namespace is really empty.
    pub async fn destroy(&self) -> Result<()> {
        ensure!(!self.closed.swap(true, Ordering::AcqRel), ClosedSnafu);

        let prefix = ObjectStoragePath::from(self.name.clone());
        let mut entries = self.object_storage.list(Some(&prefix));
        let mut keys = Vec::new();
        while let Some(meta) = entries.try_next().await.context(ObjectStorageSnafu)? {
            keys.push(meta.location);
        }

        debug!(
            "destroy chunk store {:?}, deleting {} objects",
            &self.name,
            keys.len()
        );
        try_join_all(keys.iter().map(|key| self.object_storage.delete(key)))
            .await
            .context(ObjectStorageSnafu)?;
        Ok(())
    }

    fn check_open(&self) -> Result<()> {
        ensure!(!self.closed.load(Ordering::Acquire), ClosedSnafu);
        Ok(())
    }

    fn chunk_path(&self, index: ChunkIndex) -> ObjectStoragePath {
        ObjectStoragePath::from(format!("{}/{}/{}", self.name, CHUNK_INDEX_PREFIX, index))
    }

    fn expected_chunk_size(&self, index: ChunkIndex) -> ChunkSize {
        match self.last_chunk {
            Some((last_index, last_size)) if index == last_index => last_size,
            _ => self.chunk_size,
        }
    }

    async fn read_chunk(&self, index: ChunkIndex) -> Result<Bytes> {
        let path = self.chunk_path(index);
        let result = match self.object_storage.get(&path).await {
            Ok(result) => result,
            Err(e) if is_not_found_error(&e) => return ChunkNotFoundSnafu { index }.fail(),
            Err(e) => return Err(e).context(ObjectStorageSnafu),
        };

        // The payload may arrive in one block or as a sequence of
        // segments; reassemble in delivery order before any slicing.
        let mut stream = result.into_stream();
        let mut buf = BytesMut::with_capacity(self.expected_chunk_size(index));
        while let Some(segment) = stream.try_next().await.context(ObjectStorageSnafu)? {
            buf.extend_from_slice(&segment);
        }
        Ok(buf.freeze())
    }
}
