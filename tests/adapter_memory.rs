//! Integration coverage for the in-memory adapter test double (C3).

use sparse_stream::adapter::memory::MemoryAdapter;
use sparse_stream::adapter::{EnumerationContext, ImageioAdapter};
use std::io::Cursor;

#[test]
fn size_reports_buffer_length() {
    let mut adapter = MemoryAdapter::new(vec![0u8; 4096]);
    assert_eq!(adapter.size().unwrap(), 4096);
}

#[test]
fn zero_context_extents_cover_the_whole_image() {
    let disk = vec![0u8; 8192];
    let mut adapter = MemoryAdapter::new(disk.clone());
    let extents = adapter.extents(EnumerationContext::Zero).unwrap();
    assert_eq!(extents.first().unwrap().start, 0);
    assert_eq!(extents.last().unwrap().end(), disk.len() as u64);
}

#[test]
fn non_incremental_adapter_rejects_dirty_enumeration() {
    let mut adapter = MemoryAdapter::new(vec![1u8; 16]);
    let result = adapter.extents(EnumerationContext::Dirty);
    assert!(result.is_err());
}

#[test]
fn read_from_then_write_to_round_trips_bytes() {
    let mut adapter = MemoryAdapter::new(vec![0u8; 8]);
    let mut source = Cursor::new(b"WXYZ".to_vec());
    adapter.read_from(&mut source, 2, 4).unwrap();

    let mut sink = Vec::new();
    adapter.write_to(&mut sink, 2, 4).unwrap();
    assert_eq!(sink, b"WXYZ");
}
