//! Extent model (C2): a typed descriptor of a contiguous image region.

use serde::Serialize;

/// Whether an extent's range holds addressable bytes or is a sparse hole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExtentKind {
    Data,
    Zero,
}

/// A contiguous, immutable region of an image's address space.
///
/// `length` is always `> 0`; zero-length extents are filtered out before an
/// `Extent` is constructed (the download engine does this at enumeration
/// time, per spec §4.4's edge cases).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Extent {
    pub start: u64,
    pub length: u64,
    pub kind: ExtentKind,
    /// Only meaningful when the enumeration context was `"dirty"`.
    pub dirty: bool,
}

impl Extent {
    pub fn new(start: u64, length: u64, kind: ExtentKind, dirty: bool) -> Self {
        Self {
            start,
            length,
            kind,
            dirty,
        }
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.kind == ExtentKind::Zero
    }

    #[inline]
    pub fn is_data(&self) -> bool {
        self.kind == ExtentKind::Data
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[inline]
    pub fn end(&self) -> u64 {
        self.start + self.length
    }
}
