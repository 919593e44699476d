//! Value normalization
//!
//! Turns the textual value of a declaration into the bytes stored in the
//! partition, according to its encoding.

use std::fmt;
use std::str::FromStr;

use base64::Engine as _;

use crate::error::{NvsError, Result};
use crate::nvs::ItemType;

/// Encoding column of a declaration row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    U64,
    I64,
    String,
    Binary,
    Hex2Bin,
    Base64,
}

impl Encoding {
    /// Item type for fixed-width encodings
    pub fn primitive_type(self) -> Option<ItemType> {
        match self {
            Encoding::U8 => Some(ItemType::U8),
            Encoding::I8 => Some(ItemType::I8),
            Encoding::U16 => Some(ItemType::U16),
            Encoding::I16 => Some(ItemType::I16),
            Encoding::U32 => Some(ItemType::U32),
            Encoding::I32 => Some(ItemType::I32),
            Encoding::U64 => Some(ItemType::U64),
            Encoding::I64 => Some(ItemType::I64),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Encoding::U8 => "u8",
            Encoding::I8 => "i8",
            Encoding::U16 => "u16",
            Encoding::I16 => "i16",
            Encoding::U32 => "u32",
            Encoding::I32 => "i32",
            Encoding::U64 => "u64",
            Encoding::I64 => "i64",
            Encoding::String => "string",
            Encoding::Binary => "binary",
            Encoding::Hex2Bin => "hex2bin",
            Encoding::Base64 => "base64",
        }
    }
}

impl FromStr for Encoding {
    type Err = NvsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "u8" => Ok(Encoding::U8),
            "i8" => Ok(Encoding::I8),
            "u16" => Ok(Encoding::U16),
            "i16" => Ok(Encoding::I16),
            "u32" => Ok(Encoding::U32),
            "i32" => Ok(Encoding::I32),
            "u64" => Ok(Encoding::U64),
            "i64" => Ok(Encoding::I64),
            "string" => Ok(Encoding::String),
            "binary" => Ok(Encoding::Binary),
            "hex2bin" => Ok(Encoding::Hex2Bin),
            "base64" => Ok(Encoding::Base64),
            _ => Err(NvsError::UnsupportedEncoding(s.to_string())),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value ready to be placed on a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Little-endian bytes of the declared width
    Primitive { item_type: ItemType, bytes: Vec<u8> },
    /// String bytes including the trailing NUL
    Str(Vec<u8>),
    /// Raw blob bytes
    Blob(Vec<u8>),
}

impl Value {
    /// Normalize `raw` by `encoding`. `key` is only used in error messages.
    pub fn parse(key: &str, raw: &str, encoding: Encoding) -> Result<Self> {
        if let Some(item_type) = encoding.primitive_type() {
            let bytes = parse_primitive(key, raw, item_type)?;
            return Ok(Value::Primitive { item_type, bytes });
        }

        match encoding {
            Encoding::String => {
                let mut bytes = Vec::with_capacity(raw.len() + 1);
                bytes.extend_from_slice(raw.as_bytes());
                bytes.push(0);
                Ok(Value::Str(bytes))
            }
            Encoding::Binary => Ok(Value::Blob(raw.as_bytes().to_vec())),
            Encoding::Hex2Bin => decode_hex(key, raw).map(Value::Blob),
            Encoding::Base64 => decode_base64(key, raw).map(Value::Blob),
            _ => Err(NvsError::UnsupportedEncoding(encoding.to_string())),
        }
    }

    /// Stored length in bytes
    pub(crate) fn len(&self) -> usize {
        match self {
            Value::Primitive { bytes, .. } | Value::Str(bytes) | Value::Blob(bytes) => bytes.len(),
        }
    }
}

fn decode_hex(key: &str, raw: &str) -> Result<Vec<u8>> {
    let digits = raw.trim();
    if digits.len() % 2 != 0 {
        return Err(NvsError::Input(format!(
            "{}: Invalid data length. Should be multiple of 2.",
            key
        )));
    }
    hex::decode(digits).map_err(|e| NvsError::Input(format!("{}: Invalid hex data: {}", key, e)))
}

fn decode_base64(key: &str, raw: &str) -> Result<Vec<u8>> {
    base64::engine::general_purpose::STANDARD
        .decode(raw.trim())
        .map_err(|e| NvsError::Input(format!("{}: Invalid base64 data: {}", key, e)))
}

/// Parse a decimal or `0x` hexadecimal integer (optionally signed) and
/// range-check it against the item type.
fn parse_primitive(key: &str, raw: &str, item_type: ItemType) -> Result<Vec<u8>> {
    let text = raw.trim();
    let (negative, magnitude) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let (digits, radix) = match magnitude
        .strip_prefix("0x")
        .or_else(|| magnitude.strip_prefix("0X"))
    {
        Some(digits) => (digits, 16),
        None => (magnitude, 10),
    };
    if digits.starts_with(&['+', '-'][..]) {
        return Err(NvsError::Input(format!(
            "{}: Invalid integer value `{}`",
            key, raw
        )));
    }

    let parsed = i128::from_str_radix(digits, radix);
    let magnitude = parsed.map_err(|e| {
        NvsError::Input(format!("{}: Invalid integer value `{}`: {}", key, raw, e))
    })?;
    let value = if negative { -magnitude } else { magnitude };

    let out_of_range = || {
        NvsError::Input(format!(
            "{}: Value {} out of range for {:?}",
            key, value, item_type
        ))
    };

    let bytes = match item_type {
        ItemType::U8 => u8::try_from(value).map_err(|_| out_of_range())?.to_le_bytes().to_vec(),
        ItemType::I8 => i8::try_from(value).map_err(|_| out_of_range())?.to_le_bytes().to_vec(),
        ItemType::U16 => u16::try_from(value).map_err(|_| out_of_range())?.to_le_bytes().to_vec(),
        ItemType::I16 => i16::try_from(value).map_err(|_| out_of_range())?.to_le_bytes().to_vec(),
        ItemType::U32 => u32::try_from(value).map_err(|_| out_of_range())?.to_le_bytes().to_vec(),
        ItemType::I32 => i32::try_from(value).map_err(|_| out_of_range())?.to_le_bytes().to_vec(),
        ItemType::U64 => u64::try_from(value).map_err(|_| out_of_range())?.to_le_bytes().to_vec(),
        ItemType::I64 => i64::try_from(value).map_err(|_| out_of_range())?.to_le_bytes().to_vec(),
        ItemType::Sz | ItemType::BlobData | ItemType::BlobIdx => {
            return Err(NvsError::Input(format!(
                "{}: {:?} is not a primitive type",
                key, item_type
            )))
        }
    };

    Ok(bytes)
}
