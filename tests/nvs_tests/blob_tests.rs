//! Tests for multi-page blob chunking
//!
//! These tests verify:
//! - Blobs split into BLOB_DATA chunks plus one BLOB_IDX
//! - Chunk indices are contiguous across pages
//! - Reassembled chunks reproduce the original bytes
//! - Index placement when a chunk exactly fills a page

#[path = "../common/mod.rs"]
mod common;

use common::{decode_page, read_value, DecodedEntry};
use nvsgen::nvs::{ItemType, Partition, PAGE_SIZE};
use nvsgen::value::Value;
use nvsgen::NvsError;

// =============================================================================
// Helper Functions
// =============================================================================

fn partition_with_pages(pages: usize) -> Partition {
    Partition::new(pages * PAGE_SIZE).unwrap()
}

fn decode_all(partition: &Partition) -> Vec<DecodedEntry> {
    let mut entries = Vec::new();
    for (n, page) in partition.pages().iter().enumerate() {
        entries.extend(decode_page(page.as_bytes(), n));
    }
    entries.extend(decode_page(
        partition.current_page().as_bytes(),
        partition.pages().len(),
    ));
    entries
}

fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 7 + 3) as u8).collect()
}

fn chunks_of<'a>(entries: &'a [DecodedEntry], key: &str) -> Vec<&'a DecodedEntry> {
    entries
        .iter()
        .filter(|e| e.key == key && e.item_type == ItemType::BlobData)
        .collect()
}

fn index_of<'a>(entries: &'a [DecodedEntry], key: &str) -> Vec<&'a DecodedEntry> {
    entries
        .iter()
        .filter(|e| e.key == key && e.item_type == ItemType::BlobIdx)
        .collect()
}

// =============================================================================
// Single Page Blobs
// =============================================================================

#[test]
fn test_small_blob_single_chunk() {
    let mut partition = partition_with_pages(3);
    let data = pattern(100);
    partition
        .write_value("blob", &Value::Blob(data.clone()))
        .unwrap();

    let entries = decode_all(&partition);
    let chunks = chunks_of(&entries, "blob");
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].chunk_index, 0);
    assert_eq!(chunks[0].span, 1 + 4);
    assert_eq!(chunks[0].data, data);

    let index = index_of(&entries, "blob");
    assert_eq!(index.len(), 1);
    assert_eq!(index[0].span, 1);
    assert_eq!(index[0].chunk_index, 0xFF);
    assert_eq!(index[0].blob_total_size(), 100);
    assert_eq!(index[0].blob_chunk_count(), 1);
    assert_eq!(index[0].blob_chunk_start(), 0);
    assert_eq!(&index[0].header[30..32], &[0xFF, 0xFF]);

    // Index directly follows the chunk on the same page
    assert_eq!(index[0].page, 0);
    assert_eq!(index[0].slot, 5);
}

#[test]
fn test_empty_blob() {
    let mut partition = partition_with_pages(3);
    partition.write_value("empty", &Value::Blob(Vec::new())).unwrap();

    let entries = decode_all(&partition);
    let chunks = chunks_of(&entries, "empty");
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].span, 1);
    assert!(chunks[0].data.is_empty());

    let index = index_of(&entries, "empty");
    assert_eq!(index[0].blob_total_size(), 0);
    assert_eq!(index[0].blob_chunk_count(), 1);
    assert_eq!(partition.current_page().entry_num(), 2);
}

#[test]
fn test_blob_entries_carry_namespace() {
    let mut partition = partition_with_pages(3);
    partition.write_namespace("ns").unwrap();
    partition.write_entry("blob", "payload", "binary").unwrap();

    let entries = decode_all(&partition);
    assert!(chunks_of(&entries, "blob").iter().all(|e| e.ns == 1));
    assert!(index_of(&entries, "blob").iter().all(|e| e.ns == 1));
}

// =============================================================================
// Multi Page Blobs
// =============================================================================

#[test]
fn test_blob_spanning_two_pages() {
    let mut partition = partition_with_pages(4);
    let data = pattern(5000);
    partition
        .write_value("fw", &Value::Blob(data.clone()))
        .unwrap();

    let entries = decode_all(&partition);
    let chunks = chunks_of(&entries, "fw");
    assert_eq!(chunks.len(), 2);

    // First chunk fills page 0 completely
    assert_eq!(chunks[0].page, 0);
    assert_eq!(chunks[0].chunk_index, 0);
    assert_eq!(chunks[0].data.len(), 4000);
    assert_eq!(chunks[0].span, 126);

    assert_eq!(chunks[1].page, 1);
    assert_eq!(chunks[1].chunk_index, 1);
    assert_eq!(chunks[1].data.len(), 1000);

    let index = index_of(&entries, "fw");
    assert_eq!(index.len(), 1);
    assert_eq!(index[0].page, 1);
    assert_eq!(index[0].blob_chunk_count(), 2);
    assert_eq!(index[0].blob_total_size(), 5000);

    let (_, value) = read_value(&entries, 0, "fw").unwrap();
    assert_eq!(value, data);
}

#[test]
fn test_blob_spanning_many_pages() {
    let mut partition = partition_with_pages(6);
    let data = pattern(12_345);
    partition
        .write_value("big", &Value::Blob(data.clone()))
        .unwrap();

    let entries = decode_all(&partition);
    let chunks = chunks_of(&entries, "big");
    assert_eq!(chunks.len(), 4);
    for (expected, chunk) in chunks.iter().enumerate() {
        assert_eq!(chunk.chunk_index as usize, expected);
        assert_eq!(chunk.page, expected);
    }

    let index = index_of(&entries, "big");
    assert_eq!(index.len(), 1);
    assert_eq!(index[0].blob_chunk_count() as usize, chunks.len());

    let (_, value) = read_value(&entries, 0, "big").unwrap();
    assert_eq!(value, data);
}

#[test]
fn test_blob_exactly_filling_page_puts_index_on_next_page() {
    let mut partition = partition_with_pages(3);
    partition.write_value("exact", &Value::Blob(pattern(4000))).unwrap();

    let entries = decode_all(&partition);
    let chunks = chunks_of(&entries, "exact");
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].page, 0);

    let index = index_of(&entries, "exact");
    assert_eq!(index[0].page, 1);
    assert_eq!(index[0].slot, 0);
    assert_eq!(index[0].blob_chunk_count(), 1);
}

#[test]
fn test_blob_starting_near_page_end() {
    let mut partition = partition_with_pages(3);
    for i in 0..124 {
        partition
            .write_entry(&format!("k{}", i), "1", "u8")
            .unwrap();
    }

    let data = pattern(100);
    partition.write_value("tail", &Value::Blob(data.clone())).unwrap();

    let entries = decode_all(&partition);
    let chunks = chunks_of(&entries, "tail");
    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].page, 0);
    assert_eq!(chunks[0].slot, 124);
    assert_eq!(chunks[0].data.len(), 32);
    assert_eq!(chunks[1].page, 1);
    assert_eq!(chunks[1].data.len(), 68);

    let (_, value) = read_value(&entries, 0, "tail").unwrap();
    assert_eq!(value, data);
}

#[test]
fn test_blob_on_full_page_retries_on_new_page() {
    let mut partition = partition_with_pages(3);
    for i in 0..126 {
        partition
            .write_entry(&format!("k{}", i), "1", "u8")
            .unwrap();
    }

    partition.write_value("b", &Value::Blob(pattern(10))).unwrap();

    let entries = decode_all(&partition);
    let chunks = chunks_of(&entries, "b");
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].page, 1);
    assert_eq!(chunks[0].slot, 0);
}

#[test]
fn test_blob_exceeding_budget() {
    let mut partition = partition_with_pages(2);
    let err = partition
        .write_value("huge", &Value::Blob(pattern(9000)))
        .unwrap_err();
    assert!(matches!(err, NvsError::InsufficientSize));
}
