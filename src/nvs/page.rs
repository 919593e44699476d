//! NVS Page
//!
//! One 4096-byte page buffer with its slot bitmap and entry cursor.

use crate::error::{NvsError, Result};

use super::checksum::page_header_crc;
use super::entry::{EntryHeader, ItemType};
use super::{
    data_slots, BITMAP_OFFSET, BITMAP_SIZE, ENTRY_SIZE, FIRST_ENTRY_OFFSET, MAX_ENTRIES,
    MAX_STRING_SIZE, PAGE_HEADER_SIZE, PAGE_SIZE, PAGE_VERSION,
};

/// State word stored in the first four bytes of a page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum PageState {
    Active = 0xFFFF_FFFE,
    Full = 0xFFFF_FFFC,
}

impl PageState {
    pub fn from_word(word: u32) -> Option<Self> {
        match word {
            0xFFFF_FFFE => Some(PageState::Active),
            0xFFFF_FFFC => Some(PageState::Full),
            _ => None,
        }
    }
}

/// A single partition page
///
/// Slots are handed out front to back; `entry_num` is the next free slot and
/// only [`Page::write_slots`] moves it.
pub struct Page {
    buf: Box<[u8; PAGE_SIZE]>,
    bitmap: [u8; BITMAP_SIZE],
    entry_num: usize,
    reserved: bool,
}

impl Page {
    /// Create a page. A reserved page stays all 0xFF, with no header or bitmap.
    pub fn new(sequence: u32, reserved: bool) -> Self {
        let mut page = Self {
            buf: Box::new([0xFF; PAGE_SIZE]),
            bitmap: [0xFF; BITMAP_SIZE],
            entry_num: 0,
            reserved,
        };
        if !reserved {
            page.write_header(sequence);
        }
        page
    }

    fn write_header(&mut self, sequence: u32) {
        let mut header = [0xFF; PAGE_HEADER_SIZE];
        header[0..4].copy_from_slice(&(PageState::Active as u32).to_le_bytes());
        header[4..8].copy_from_slice(&sequence.to_le_bytes());
        header[8] = PAGE_VERSION;
        let crc = page_header_crc(&header);
        header[28..32].copy_from_slice(&crc.to_le_bytes());

        self.buf[..PAGE_HEADER_SIZE].copy_from_slice(&header);
        self.buf[BITMAP_OFFSET..BITMAP_OFFSET + BITMAP_SIZE].copy_from_slice(&self.bitmap);
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Index of the next free entry slot
    pub fn entry_num(&self) -> usize {
        self.entry_num
    }

    /// Number of entry slots still free
    pub fn free_slots(&self) -> usize {
        MAX_ENTRIES - self.entry_num
    }

    pub fn is_full(&self) -> bool {
        self.entry_num >= MAX_ENTRIES
    }

    pub fn is_reserved(&self) -> bool {
        self.reserved
    }

    /// Page state, `None` for the reserved page
    pub fn state(&self) -> Option<PageState> {
        if self.reserved {
            return None;
        }
        PageState::from_word(u32::from_le_bytes([
            self.buf[0],
            self.buf[1],
            self.buf[2],
            self.buf[3],
        ]))
    }

    /// Sequence number from the header
    pub fn sequence(&self) -> u32 {
        u32::from_le_bytes([self.buf[4], self.buf[5], self.buf[6], self.buf[7]])
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..]
    }

    /// Patch the state word of an ACTIVE page to FULL. The header CRC does not
    /// cover the state word, so nothing else changes.
    pub fn mark_full(&mut self) {
        if self.state() == Some(PageState::Active) {
            self.buf[0..4].copy_from_slice(&(PageState::Full as u32).to_le_bytes());
        }
    }

    // =========================================================================
    // Entry Placement
    // =========================================================================

    /// Write a fixed-width value as a single-slot entry.
    pub fn write_primitive(
        &mut self,
        key: &str,
        item_type: ItemType,
        value: &[u8],
        ns_index: u8,
    ) -> Result<()> {
        if self.is_full() {
            return Err(NvsError::PageFull);
        }

        let header = EntryHeader::primitive(ns_index, item_type, key, value)?;
        tracing::trace!(
            "Page {}: {:?} `{}` at slot {}",
            self.sequence(),
            item_type,
            key,
            self.entry_num
        );
        self.write_slots(&header.to_bytes(), 1)
    }

    /// Write a NUL-terminated string. Strings never span pages.
    pub fn write_string(&mut self, key: &str, data: &[u8], ns_index: u8) -> Result<()> {
        if data.len() > MAX_STRING_SIZE {
            return Err(NvsError::Input(format!(
                "Size ({}) exceeds max allowed length `{}` bytes for key `{}`",
                data.len(),
                MAX_STRING_SIZE,
                key
            )));
        }

        let data_entry_count = data_slots(data.len());
        let total_entry_count = data_entry_count + 1;

        if self.is_full() || self.entry_num + total_entry_count >= MAX_ENTRIES {
            return Err(NvsError::PageFull);
        }

        let header = EntryHeader::data(
            ns_index,
            ItemType::Sz,
            key,
            super::CHUNK_ANY,
            data,
        )?;
        tracing::trace!(
            "Page {}: string `{}` ({} bytes) at slot {}",
            self.sequence(),
            key,
            data.len(),
            self.entry_num
        );
        self.write_slots(&header.to_bytes(), 1)?;
        self.write_slots(data, data_entry_count)
    }

    /// Copy `bytes` into the next `slot_count` slots and mark them written.
    ///
    /// Bytes beyond `bytes.len()` in the last slot keep their 0xFF fill.
    pub fn write_slots(&mut self, bytes: &[u8], slot_count: usize) -> Result<()> {
        if self.reserved {
            return Err(NvsError::PageOverflow(
                "reserved page cannot hold entries".to_string(),
            ));
        }
        if self.entry_num + slot_count > MAX_ENTRIES || bytes.len() > slot_count * ENTRY_SIZE {
            return Err(NvsError::PageOverflow(format!(
                "{} bytes in {} slots starting at slot {}",
                bytes.len(),
                slot_count,
                self.entry_num
            )));
        }

        let offset = FIRST_ENTRY_OFFSET + ENTRY_SIZE * self.entry_num;
        self.buf[offset..offset + bytes.len()].copy_from_slice(bytes);

        for _ in 0..slot_count {
            self.mark_slot_written();
            self.entry_num += 1;
        }
        Ok(())
    }

    /// Move the current slot's 2-bit state from EMPTY (0b11) to WRITTEN (0b10)
    fn mark_slot_written(&mut self) {
        let bitnum = self.entry_num * 2;
        let byte_idx = bitnum / 8;
        let bit_offset = bitnum & 7;
        self.bitmap[byte_idx] &= !(1u8 << bit_offset);
        self.buf[BITMAP_OFFSET + byte_idx] = self.bitmap[byte_idx];
    }
}
