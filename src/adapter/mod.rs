//! Imageio client adapter (C3, spec §4.3): the capability set the download
//! and upload engines depend on. Engines are generic over this trait, so the
//! in-memory test double ([`memory::MemoryAdapter`]) and the real transport
//! ([`http::HttpAdapter`]) are interchangeable.

pub mod http;
pub mod memory;

use std::io::{Read, Write};

use crate::error::StreamError;
use crate::extent::Extent;

/// Which extent enumeration a caller wants: the full `[0, size)` layout with
/// data/zero classification, or only the ranges that changed since a prior
/// checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumerationContext {
    Zero,
    Dirty,
}

impl EnumerationContext {
    pub fn as_str(self) -> &'static str {
        match self {
            EnumerationContext::Zero => "zero",
            EnumerationContext::Dirty => "dirty",
        }
    }
}

/// The remote capabilities consumed by the download/upload engines.
///
/// Implementations own the remote connection for the lifetime of one
/// download or upload; `close` must be idempotent-safe to call exactly once
/// on every exit path (spec §5's scoped-release discipline).
pub trait ImageioAdapter {
    /// The destination/source image's virtual size in bytes.
    fn size(&mut self) -> Result<u64, StreamError>;

    /// Enumerates extents for `context`, covering `[0, size)` contiguously.
    /// The full list is materialized — callers never need more than
    /// O(#extents) memory (spec §4.4, §9).
    fn extents(&mut self, context: EnumerationContext) -> Result<Vec<Extent>, StreamError>;

    /// Streams exactly `length` bytes starting at `offset` from the remote
    /// into `sink`, in chunks — never buffering the whole range.
    fn write_to(&mut self, sink: &mut dyn Write, offset: u64, length: u64) -> Result<(), StreamError>;

    /// Consumes exactly `length` bytes from `source` and writes them to the
    /// remote at `offset`, in chunks — never buffering the whole range.
    fn read_from(&mut self, source: &mut dyn Read, offset: u64, length: u64) -> Result<(), StreamError>;

    /// Punches (or records) a zero range `[offset, offset + length)`.
    fn zero(&mut self, offset: u64, length: u64) -> Result<(), StreamError>;

    /// Durably commits pending writes.
    fn flush(&mut self) -> Result<(), StreamError>;

    /// Releases the transport. Called exactly once per engine invocation.
    fn close(&mut self) -> Result<(), StreamError>;
}
