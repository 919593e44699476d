//! Entry encoding
//!
//! Builds the 32-byte header slot that starts every entry.

use crate::error::{NvsError, Result};

use super::checksum::entry_crc;
use super::{CHUNK_ANY, ENTRY_SIZE, MAX_KEY_LEN};

/// Type code stored in byte 1 of an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ItemType {
    U8 = 0x01,
    I8 = 0x11,
    U16 = 0x02,
    I16 = 0x12,
    U32 = 0x04,
    I32 = 0x14,
    U64 = 0x08,
    I64 = 0x18,
    /// NUL-terminated string
    Sz = 0x21,
    /// One fragment of a blob
    BlobData = 0x42,
    /// Terminal index of a blob
    BlobIdx = 0x48,
}

impl ItemType {
    /// Map a raw type byte back to an item type
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0x01 => Some(ItemType::U8),
            0x11 => Some(ItemType::I8),
            0x02 => Some(ItemType::U16),
            0x12 => Some(ItemType::I16),
            0x04 => Some(ItemType::U32),
            0x14 => Some(ItemType::I32),
            0x08 => Some(ItemType::U64),
            0x18 => Some(ItemType::I64),
            0x21 => Some(ItemType::Sz),
            0x42 => Some(ItemType::BlobData),
            0x48 => Some(ItemType::BlobIdx),
            _ => None,
        }
    }

    /// Inline width of a primitive type, `None` for variable length types
    pub fn primitive_width(self) -> Option<usize> {
        match self {
            ItemType::U8 | ItemType::I8 => Some(1),
            ItemType::U16 | ItemType::I16 => Some(2),
            ItemType::U32 | ItemType::I32 => Some(4),
            ItemType::U64 | ItemType::I64 => Some(8),
            ItemType::Sz | ItemType::BlobData | ItemType::BlobIdx => None,
        }
    }
}

/// The 8-byte payload field at offset 24 of a header slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payload {
    /// Little-endian value occupying the first `width` bytes
    Primitive { bytes: [u8; 8], width: usize },
    /// Size and CRC of the data slots that follow the header
    Data { size: u16, crc: u32 },
    /// Blob index: total size, chunk count and first chunk index
    BlobIndex {
        total_size: u32,
        chunk_count: u8,
        chunk_start: u8,
    },
}

/// Header slot of one entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryHeader {
    pub ns_index: u8,
    pub item_type: ItemType,
    /// Total slots used, header included
    pub span: u8,
    pub chunk_index: u8,
    pub key: [u8; 16],
    pub payload: Payload,
}

impl EntryHeader {
    /// Header for an inline primitive value
    pub fn primitive(ns_index: u8, item_type: ItemType, key: &str, value: &[u8]) -> Result<Self> {
        let width = item_type.primitive_width().ok_or_else(|| {
            NvsError::Input(format!("{:?} is not a primitive type", item_type))
        })?;
        if value.len() != width {
            return Err(NvsError::Input(format!(
                "{:?} value must be {} bytes, got {}",
                item_type,
                width,
                value.len()
            )));
        }

        let mut bytes = [0xFF; 8];
        bytes[..width].copy_from_slice(value);

        Ok(Self {
            ns_index,
            item_type,
            span: 1,
            chunk_index: CHUNK_ANY,
            key: encode_key(key)?,
            payload: Payload::Primitive { bytes, width },
        })
    }

    /// Header for variable length data (a string or a blob fragment)
    pub fn data(
        ns_index: u8,
        item_type: ItemType,
        key: &str,
        chunk_index: u8,
        data: &[u8],
    ) -> Result<Self> {
        let slots = 1 + super::data_slots(data.len());
        let span = u8::try_from(slots)
            .map_err(|_| NvsError::Input(format!("Data for key `{}` is too large", key)))?;
        let size = u16::try_from(data.len())
            .map_err(|_| NvsError::Input(format!("Data for key `{}` is too large", key)))?;

        Ok(Self {
            ns_index,
            item_type,
            span,
            chunk_index,
            key: encode_key(key)?,
            payload: Payload::Data {
                size,
                crc: super::checksum::crc32(data, super::checksum::CRC_SEED),
            },
        })
    }

    /// Terminal index entry of a blob
    pub fn blob_index(
        ns_index: u8,
        key: &str,
        total_size: u32,
        chunk_count: u8,
        chunk_start: u8,
    ) -> Result<Self> {
        Ok(Self {
            ns_index,
            item_type: ItemType::BlobIdx,
            span: 1,
            chunk_index: CHUNK_ANY,
            key: encode_key(key)?,
            payload: Payload::BlobIndex {
                total_size,
                chunk_count,
                chunk_start,
            },
        })
    }

    /// Serialize the header and fill in its CRC
    pub fn to_bytes(&self) -> [u8; ENTRY_SIZE] {
        let mut slot = [0xFF; ENTRY_SIZE];
        slot[0] = self.ns_index;
        slot[1] = self.item_type as u8;
        slot[2] = self.span;
        slot[3] = self.chunk_index;
        slot[8..24].copy_from_slice(&self.key);

        match self.payload {
            Payload::Primitive { bytes, width } => {
                // Unused payload bytes keep the slot's 0xFF fill
                slot[24..24 + width].copy_from_slice(&bytes[..width]);
            }
            Payload::Data { size, crc } => {
                slot[24..26].copy_from_slice(&size.to_le_bytes());
                slot[28..32].copy_from_slice(&crc.to_le_bytes());
            }
            Payload::BlobIndex {
                total_size,
                chunk_count,
                chunk_start,
            } => {
                slot[24..28].copy_from_slice(&total_size.to_le_bytes());
                slot[28] = chunk_count;
                slot[29] = chunk_start;
            }
        }

        let crc = entry_crc(&slot);
        slot[4..8].copy_from_slice(&crc.to_le_bytes());
        slot
    }
}

/// Check a key's length and pad it to the 16-byte key field
pub fn encode_key(key: &str) -> Result<[u8; 16]> {
    let raw = key.as_bytes();
    if raw.len() > MAX_KEY_LEN {
        return Err(NvsError::Input(format!(
            "Length of key `{}` should be <= {} characters",
            key, MAX_KEY_LEN
        )));
    }

    let mut field = [0u8; 16];
    field[..raw.len()].copy_from_slice(raw);
    Ok(field)
}
