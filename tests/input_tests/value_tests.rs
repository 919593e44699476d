//! Tests for value normalization
//!
//! These tests verify:
//! - Encoding names parse case-insensitively
//! - Integers parse as decimal or hex and are range checked
//! - String, binary, hex2bin and base64 conversions
//! - Malformed hex2bin / base64 input is an Input error

use nvsgen::nvs::ItemType;
use nvsgen::value::{Encoding, Value};
use nvsgen::NvsError;

// =============================================================================
// Encoding Tests
// =============================================================================

#[test]
fn test_parse_all_encodings() {
    let names = [
        "u8", "i8", "u16", "i16", "u32", "i32", "u64", "i64", "string", "binary", "hex2bin",
        "base64",
    ];
    for name in names {
        let encoding: Encoding = name.parse().unwrap();
        assert_eq!(encoding.as_str(), name);
    }
}

#[test]
fn test_parse_encoding_case_insensitive() {
    assert_eq!("HEX2BIN".parse::<Encoding>().unwrap(), Encoding::Hex2Bin);
    assert_eq!("U32".parse::<Encoding>().unwrap(), Encoding::U32);
}

#[test]
fn test_parse_unknown_encoding() {
    let err = "float".parse::<Encoding>().unwrap_err();
    assert!(matches!(err, NvsError::UnsupportedEncoding(ref e) if e == "float"));
}

// =============================================================================
// Primitive Tests
// =============================================================================

#[test]
fn test_parse_unsigned() {
    let value = Value::parse("k", "513", Encoding::U16).unwrap();
    assert_eq!(
        value,
        Value::Primitive {
            item_type: ItemType::U16,
            bytes: vec![0x01, 0x02],
        }
    );
}

#[test]
fn test_parse_signed_negative() {
    let value = Value::parse("k", "-1", Encoding::I16).unwrap();
    assert_eq!(
        value,
        Value::Primitive {
            item_type: ItemType::I16,
            bytes: vec![0xFF, 0xFF],
        }
    );
}

#[test]
fn test_parse_hex_integer() {
    let value = Value::parse("k", "0xdeadbeef", Encoding::U32).unwrap();
    assert_eq!(
        value,
        Value::Primitive {
            item_type: ItemType::U32,
            bytes: vec![0xEF, 0xBE, 0xAD, 0xDE],
        }
    );
}

#[test]
fn test_parse_integer_extremes() {
    let max = Value::parse("k", "18446744073709551615", Encoding::U64).unwrap();
    assert_eq!(
        max,
        Value::Primitive {
            item_type: ItemType::U64,
            bytes: u64::MAX.to_le_bytes().to_vec(),
        }
    );

    let min = Value::parse("k", "-9223372036854775808", Encoding::I64).unwrap();
    assert_eq!(
        min,
        Value::Primitive {
            item_type: ItemType::I64,
            bytes: i64::MIN.to_le_bytes().to_vec(),
        }
    );
}

#[test]
fn test_parse_integer_out_of_range() {
    for (raw, encoding) in [
        ("256", Encoding::U8),
        ("-1", Encoding::U8),
        ("128", Encoding::I8),
        ("-32769", Encoding::I16),
        ("4294967296", Encoding::U32),
    ] {
        let err = Value::parse("k", raw, encoding).unwrap_err();
        assert!(matches!(err, NvsError::Input(_)), "{} as {}", raw, encoding);
    }
}

#[test]
fn test_parse_integer_malformed() {
    for raw in ["", "abc", "1.5", "--1", "0x", "0x-1"] {
        let err = Value::parse("k", raw, Encoding::I32).unwrap_err();
        assert!(matches!(err, NvsError::Input(_)), "`{}`", raw);
    }
}

// =============================================================================
// Variable Length Tests
// =============================================================================

#[test]
fn test_string_gets_nul() {
    let value = Value::parse("k", "hello", Encoding::String).unwrap();
    assert_eq!(value, Value::Str(b"hello\0".to_vec()));
}

#[test]
fn test_empty_string_is_just_nul() {
    let value = Value::parse("k", "", Encoding::String).unwrap();
    assert_eq!(value, Value::Str(vec![0]));
}

#[test]
fn test_binary_is_raw_bytes() {
    let value = Value::parse("k", "raw data", Encoding::Binary).unwrap();
    assert_eq!(value, Value::Blob(b"raw data".to_vec()));
}

#[test]
fn test_hex2bin() {
    let value = Value::parse("k", " 00ff10Ab ", Encoding::Hex2Bin).unwrap();
    assert_eq!(value, Value::Blob(vec![0x00, 0xFF, 0x10, 0xAB]));
}

#[test]
fn test_hex2bin_odd_length() {
    let err = Value::parse("k", "abc", Encoding::Hex2Bin).unwrap_err();
    assert!(matches!(err, NvsError::Input(_)));
}

#[test]
fn test_hex2bin_invalid_digit() {
    let err = Value::parse("k", "zz", Encoding::Hex2Bin).unwrap_err();
    assert!(matches!(err, NvsError::Input(_)));
}

#[test]
fn test_base64() {
    let value = Value::parse("k", "aGVsbG8=", Encoding::Base64).unwrap();
    assert_eq!(value, Value::Blob(b"hello".to_vec()));
}

#[test]
fn test_base64_malformed() {
    let err = Value::parse("k", "not base64!", Encoding::Base64).unwrap_err();
    assert!(matches!(err, NvsError::Input(_)));
}

#[test]
fn test_empty_blob_values() {
    for encoding in [Encoding::Hex2Bin, Encoding::Base64, Encoding::Binary] {
        let value = Value::parse("k", "", encoding).unwrap();
        assert_eq!(value, Value::Blob(Vec::new()), "{}", encoding);
    }
}
