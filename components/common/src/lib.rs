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

pub const TANSU: &str = "tansu";

/// Namespace used when the caller does not name the store.
pub const DEFAULT_STORE_NAME: &str = "tansu-chunk-store";

/// Every chunk lives under `<store-name>/index/<chunk-index>`.
pub const CHUNK_INDEX_PREFIX: &str = "index";

pub const TANSU_DEBUG_OBJECT_STORAGE: &str = "/tmp/tansu.data";

// The default chunk size is 4MB.
pub const DEFAULT_CHUNK_SIZE: usize = 4 << 20;

pub type ChunkIndex = usize;
pub type ChunkSize = usize;

/// Index of the highest valid chunk for a stream of `total_size` bytes.
///
/// Only meaningful for a bounded stream; `total_size` must be non-zero.
pub fn cal_last_chunk_index(total_size: usize, chunk_size: usize) -> ChunkIndex {
    (total_size + chunk_size - 1) / chunk_size - 1
}

/// Byte length of the chunk at [`cal_last_chunk_index`]; every chunk below
/// it is exactly `chunk_size` long.
pub fn cal_last_chunk_size(total_size: usize, chunk_size: usize) -> ChunkSize {
    let remainder = total_size % chunk_size;
    if remainder == 0 {
        chunk_size
    } else {
        remainder
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_chunk_geometry() {
        // chunk = 4, total = 10 => chunks of 4, 4, 2.
        assert_eq!(cal_last_chunk_index(10, 4), 2);
        assert_eq!(cal_last_chunk_size(10, 4), 2);

        // total is an exact multiple, the last chunk is a full chunk.
        assert_eq!(cal_last_chunk_index(8, 4), 1);
        assert_eq!(cal_last_chunk_size(8, 4), 4);

        // a stream smaller than one chunk.
        assert_eq!(cal_last_chunk_index(3, 4), 0);
        assert_eq!(cal_last_chunk_size(3, 4), 3);

        // single byte stream.
        assert_eq!(cal_last_chunk_index(1, 4), 0);
        assert_eq!(cal_last_chunk_size(1, 4), 1);
    }

    #[test]
    fn last_chunk_size_stays_in_range() {
        for chunk_size in 1..=16 {
            for total_size in 1..=256 {
                let last = cal_last_chunk_size(total_size, chunk_size);
                assert!(last >= 1 && last <= chunk_size);

                let last_index = cal_last_chunk_index(total_size, chunk_size);
                assert_eq!(last_index * chunk_size + last, total_size);
            }
        }
    }
}
