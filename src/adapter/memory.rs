//! In-memory `ImageioAdapter` test double (spec §9: "a test double
//! implementing those operations against in-memory buffers is sufficient for
//! the entire property suite").
//!
//! Backs the unit tests in this crate and the end-to-end scenarios in
//! `e2e/roundtrip.rs`.

use std::io::{Read, Write};

use crate::adapter::{EnumerationContext, ImageioAdapter};
use crate::config::TRANSFER_CHUNK_SIZE;
use crate::error::StreamError;
use crate::extent::{Extent, ExtentKind};

/// Granularity at which the in-memory disk is scanned for zero-byte runs
/// when answering a `"zero"` enumeration. Arbitrary but small enough to
/// produce interesting extent boundaries in tests.
const SCAN_GRANULARITY: u64 = 4096;

/// A fixed-size byte buffer standing in for a remote image, plus bookkeeping
/// that lets tests assert on the calls an engine made.
pub struct MemoryAdapter {
    disk: Vec<u8>,
    /// `Some(ranges)` makes this adapter incremental-capable; `None` makes
    /// any `"dirty"` enumeration request fail with `UnsupportedContext`,
    /// per spec §9's resolved Open Question.
    dirty_ranges: Option<Vec<(u64, u64)>>,
    pub zero_calls: Vec<(u64, u64)>,
    pub flush_calls: u32,
    pub close_calls: u32,
}

impl MemoryAdapter {
    /// A non-incremental-capable adapter over `disk`.
    pub fn new(disk: Vec<u8>) -> Self {
        Self {
            disk,
            dirty_ranges: None,
            zero_calls: Vec::new(),
            flush_calls: 0,
            close_calls: 0,
        }
    }

    /// An incremental-capable adapter: `dirty_ranges` marks the byte ranges
    /// that changed since the prior checkpoint.
    pub fn with_dirty_ranges(disk: Vec<u8>, dirty_ranges: Vec<(u64, u64)>) -> Self {
        Self {
            disk,
            dirty_ranges: Some(dirty_ranges),
            zero_calls: Vec::new(),
            flush_calls: 0,
            close_calls: 0,
        }
    }

    pub fn disk(&self) -> &[u8] {
        &self.disk
    }
}

fn block_is_zero(bytes: &[u8]) -> bool {
    bytes.iter().all(|&b| b == 0)
}

fn overlaps_dirty(start: u64, end: u64, ranges: &[(u64, u64)]) -> bool {
    ranges
        .iter()
        .any(|&(r_start, r_len)| start < r_start + r_len && r_start < end)
}

/// Builds the full `[0, size)` extent list, splitting at both
/// `SCAN_GRANULARITY` zero/data boundaries and (when present) dirty-range
/// boundaries, then merging adjacent sub-ranges that share the same
/// `(kind, dirty)` pair.
fn build_extents(disk: &[u8], dirty_ranges: Option<&[(u64, u64)]>) -> Vec<Extent> {
    let size = disk.len() as u64;
    if size == 0 {
        return Vec::new();
    }

    let mut breakpoints: Vec<u64> = (0..size).step_by(SCAN_GRANULARITY as usize).collect();
    if let Some(ranges) = dirty_ranges {
        for &(start, len) in ranges {
            breakpoints.push(start.min(size));
            breakpoints.push((start + len).min(size));
        }
    }
    breakpoints.push(size);
    breakpoints.sort_unstable();
    breakpoints.dedup();

    let mut extents: Vec<Extent> = Vec::new();
    for window in breakpoints.windows(2) {
        let (start, end) = (window[0], window[1]);
        if start == end {
            continue;
        }
        let kind = if block_is_zero(&disk[start as usize..end as usize]) {
            ExtentKind::Zero
        } else {
            ExtentKind::Data
        };
        let dirty = dirty_ranges
            .map(|ranges| overlaps_dirty(start, end, ranges))
            .unwrap_or(false);

        match extents.last_mut() {
            Some(prev) if prev.kind == kind && prev.dirty == dirty && prev.end() == start => {
                prev.length += end - start;
            }
            _ => extents.push(Extent::new(start, end - start, kind, dirty)),
        }
    }
    extents
}

impl ImageioAdapter for MemoryAdapter {
    fn size(&mut self) -> Result<u64, StreamError> {
        Ok(self.disk.len() as u64)
    }

    fn extents(&mut self, context: EnumerationContext) -> Result<Vec<Extent>, StreamError> {
        match context {
            EnumerationContext::Zero => Ok(build_extents(&self.disk, None)),
            EnumerationContext::Dirty => match &self.dirty_ranges {
                Some(ranges) => Ok(build_extents(&self.disk, Some(ranges))),
                None => Err(StreamError::UnsupportedContext("dirty")),
            },
        }
    }

    fn write_to(&mut self, sink: &mut dyn Write, offset: u64, length: u64) -> Result<(), StreamError> {
        let start = offset as usize;
        let end = start + length as usize;
        let range = self
            .disk
            .get(start..end)
            .ok_or_else(|| StreamError::Transport("read range out of bounds".into()))?;
        for chunk in range.chunks(TRANSFER_CHUNK_SIZE) {
            sink.write_all(chunk)?;
        }
        Ok(())
    }

    fn read_from(&mut self, source: &mut dyn Read, offset: u64, length: u64) -> Result<(), StreamError> {
        let start = offset as usize;
        let end = start + length as usize;
        if end > self.disk.len() {
            return Err(StreamError::Transport("write range out of bounds".into()));
        }
        let mut remaining = length as usize;
        let mut pos = start;
        let mut buf = vec![0u8; TRANSFER_CHUNK_SIZE];
        while remaining > 0 {
            let want = remaining.min(TRANSFER_CHUNK_SIZE);
            source.read_exact(&mut buf[..want]).map_err(|_| StreamError::ShortIo {
                expected: want,
                got: 0,
            })?;
            self.disk[pos..pos + want].copy_from_slice(&buf[..want]);
            pos += want;
            remaining -= want;
        }
        Ok(())
    }

    fn zero(&mut self, offset: u64, length: u64) -> Result<(), StreamError> {
        let start = offset as usize;
        let end = start + length as usize;
        self.disk
            .get_mut(start..end)
            .ok_or_else(|| StreamError::Transport("zero range out of bounds".into()))?
            .fill(0);
        self.zero_calls.push((offset, length));
        Ok(())
    }

    fn flush(&mut self) -> Result<(), StreamError> {
        self.flush_calls += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<(), StreamError> {
        self.close_calls += 1;
        Ok(())
    }
}
