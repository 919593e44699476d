//! Blob chunking
//!
//! A blob is written as one or more BLOB_DATA entries, each filling what is
//! left of a page, followed by a single BLOB_IDX entry that records the total
//! size and how many chunks to look for. Chunk indices run on across pages.

use crate::error::{NvsError, Result};

use super::entry::{EntryHeader, ItemType};
use super::partition::Partition;
use super::{data_slots, CHUNK_ANY, ENTRY_SIZE, MAX_BLOB_CHUNK_SIZE, MAX_ENTRIES};

/// Index of the first chunk of every blob
const CHUNK_START: u8 = 0;

impl Partition {
    /// Write `data` as a chunked blob starting on the current page.
    ///
    /// Fails with `PageFull` only when the current page has no slot at all;
    /// otherwise pages are allocated here as needed.
    pub(super) fn write_blob(&mut self, key: &str, data: &[u8], ns_index: u8) -> Result<()> {
        if self.current.is_full() {
            return Err(NvsError::PageFull);
        }

        let total_size = u32::try_from(data.len())
            .map_err(|_| NvsError::Input(format!("Blob `{}` is too large", key)))?;

        let mut chunk_count: u8 = 0;
        let mut offset = 0;

        loop {
            let tailroom = MAX_ENTRIES
                .checked_sub(self.current.entry_num() + 1)
                .ok_or_else(|| {
                    NvsError::PageOverflow(format!(
                        "no room for blob `{}` header on page {}",
                        key,
                        self.current.sequence()
                    ))
                })?
                * ENTRY_SIZE;

            let chunk_size = tailroom.min(data.len() - offset);
            debug_assert!(chunk_size <= MAX_BLOB_CHUNK_SIZE);
            let chunk = &data[offset..offset + chunk_size];

            let chunk_index = CHUNK_START
                .checked_add(chunk_count)
                .filter(|index| *index != CHUNK_ANY)
                .ok_or_else(|| {
                    NvsError::Input(format!("Blob `{}` needs too many chunks", key))
                })?;

            let header = EntryHeader::data(ns_index, ItemType::BlobData, key, chunk_index, chunk)?;
            tracing::trace!(
                "Page {}: blob `{}` chunk {} ({} bytes) at slot {}",
                self.current.sequence(),
                key,
                chunk_index,
                chunk_size,
                self.current.entry_num()
            );
            self.current.write_slots(&header.to_bytes(), 1)?;
            self.current.write_slots(chunk, data_slots(chunk_size))?;

            chunk_count += 1;
            offset += chunk_size;

            let remaining = data.len() - offset;
            if remaining > 0 || tailroom - chunk_size < ENTRY_SIZE {
                self.create_new_page(false)?;
            }
            if remaining == 0 {
                break;
            }
        }

        let index = EntryHeader::blob_index(ns_index, key, total_size, chunk_count, CHUNK_START)?;
        tracing::trace!(
            "Page {}: blob `{}` index, {} bytes in {} chunks",
            self.current.sequence(),
            key,
            total_size,
            chunk_count
        );
        self.current.write_slots(&index.to_bytes(), 1)
    }
}
