//! End-to-end test suite: whole-pipeline download→upload fidelity.
//!
//! Mirrors the teacher's `e2e/` suite (one scenario per file), driving the
//! download and upload engines together through an in-memory adapter.

use sparse_stream::adapter::memory::MemoryAdapter;
use sparse_stream::{download, upload};
use std::io::Cursor;

// ─────────────────────────────────────────────────────────────────────────────
// download(I) then upload onto a fresh destination reproduces I byte-for-byte.
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn full_round_trip_reproduces_source_image_byte_for_byte() {
    let mut original = vec![0u8; 3 * 4096];
    original[4096..4096 + 10].copy_from_slice(b"hello-imgs");
    original[2 * 4096..2 * 4096 + 4].copy_from_slice(b"tail");

    let mut source = MemoryAdapter::new(original.clone());
    let mut stream = Vec::new();
    download(&mut source, &mut stream, false).unwrap();

    let mut destination = MemoryAdapter::new(vec![0xFFu8; original.len()]);
    upload(&mut destination, &mut Cursor::new(stream)).unwrap();

    assert_eq!(destination.disk(), original.as_slice());
    assert_eq!(destination.flush_calls, 1);
}

// ─────────────────────────────────────────────────────────────────────────────
// A zero extent leaves the destination region all-zero.
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn zero_extents_leave_destination_all_zero() {
    let mut disk = vec![0u8; 3 * 4096];
    disk[4096..8192].fill(0); // middle block is the only run guaranteed zero
    let mut source = MemoryAdapter::new(disk);
    let mut stream = Vec::new();
    download(&mut source, &mut stream, false).unwrap();

    let mut destination = MemoryAdapter::new(vec![0xAAu8; 3 * 4096]);
    upload(&mut destination, &mut Cursor::new(stream)).unwrap();
    assert!(destination.disk()[4096..8192].iter().all(|&b| b == 0));
}

// ─────────────────────────────────────────────────────────────────────────────
// Incremental round trip: only the dirty middle extent travels; the
// surrounding ranges on the destination are left exactly as they were.
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn incremental_round_trip_touches_only_the_dirty_extent() {
    let base: Vec<u8> = (0..3 * 4096).map(|i| (i / 4096) as u8 + 1).collect();
    let mut source = MemoryAdapter::with_dirty_ranges(base.clone(), vec![(4096, 4096)]);

    let mut stream = Vec::new();
    download(&mut source, &mut stream, true).unwrap();

    let mut destination_disk = base.clone();
    destination_disk[4096..8192].iter_mut().for_each(|b| *b = 0xEE);
    let mut destination = MemoryAdapter::new(destination_disk);
    upload(&mut destination, &mut Cursor::new(stream)).unwrap();

    assert_eq!(&destination.disk()[..4096], &base[..4096]);
    assert_eq!(&destination.disk()[8192..], &base[8192..]);
    assert_eq!(&destination.disk()[4096..8192], &base[4096..8192]);
}

// ─────────────────────────────────────────────────────────────────────────────
// flush is called exactly once, after the last frame, before close.
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn flush_happens_exactly_once_after_the_final_frame() {
    let mut source = MemoryAdapter::new(b"payload-bytes".to_vec());
    let mut stream = Vec::new();
    download(&mut source, &mut stream, false).unwrap();

    let mut destination = MemoryAdapter::new(vec![0u8; 13]);
    upload(&mut destination, &mut Cursor::new(stream)).unwrap();
    assert_eq!(destination.flush_calls, 1);
    assert_eq!(destination.close_calls, 1);
}
