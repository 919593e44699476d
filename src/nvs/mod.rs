//! NVS Partition Module
//!
//! Encodes entries into the page layout read by the device's NVS library.
//!
//! ## Responsibilities
//! - Fixed 4096-byte pages with header, slot bitmap and 126 entry slots
//! - Primitive, string and multi-page blob entries
//! - CRC32 on page headers, entry headers and data
//! - Page lifecycle (ACTIVE → FULL) and the trailing reserved page
//!
//! ## Page Format
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ Header (32 bytes)                                       │
//! │   State (4) | Seq (4) | Ver (1) | 0xFF (19) | CRC (4)   │
//! ├─────────────────────────────────────────────────────────┤
//! │ Bitmap (32 bytes): 2 bits per entry slot                │
//! ├─────────────────────────────────────────────────────────┤
//! │ Entry slots: 126 × 32 bytes                             │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Entry Format
//! ```text
//! ┌──────┬──────┬──────┬───────┬─────────┬──────────┬─────────────┐
//! │NS (1)│Type 1│Span 1│Chunk 1│ CRC (4) │ Key (16) │ Payload (8) │
//! └──────┴──────┴──────┴───────┴─────────┴──────────┴─────────────┘
//! ```

mod blob;
pub mod checksum;
mod entry;
mod page;
mod partition;

pub use entry::{encode_key, EntryHeader, ItemType, Payload};
pub use page::{Page, PageState};
pub use partition::Partition;

// =============================================================================
// Shared Constants (used by entry, page, blob, partition)
// =============================================================================

/// Size of one page in bytes
pub const PAGE_SIZE: usize = 4096;

/// Size of one entry slot in bytes
pub const ENTRY_SIZE: usize = 32;

/// Maximum number of entry slots per page
pub const MAX_ENTRIES: usize = 126;

/// Page header size
pub const PAGE_HEADER_SIZE: usize = 32;

/// Offset of the slot bitmap within a page
pub const BITMAP_OFFSET: usize = 32;

/// Size of the slot bitmap in bytes
pub const BITMAP_SIZE: usize = 32;

/// Offset of the first entry slot within a page
pub const FIRST_ENTRY_OFFSET: usize = 64;

/// Page format version written into every header
pub const PAGE_VERSION: u8 = 0xFE;

/// Largest string that fits on a single page (including the NUL)
pub const MAX_STRING_SIZE: usize = 1984;

/// Largest amount of blob data a single page can hold
pub const MAX_BLOB_CHUNK_SIZE: usize = 4000;

/// Chunk index for entries that are not blob fragments
pub const CHUNK_ANY: u8 = 0xFF;

/// Longest key in bytes; the 16th key byte is always NUL
pub const MAX_KEY_LEN: usize = 15;

/// Highest namespace index a partition can allocate
pub const MAX_NAMESPACE_INDEX: u8 = 254;

/// Number of entry slots needed to hold `len` bytes of data
pub(crate) fn data_slots(len: usize) -> usize {
    (len + ENTRY_SIZE - 1) / ENTRY_SIZE
}
