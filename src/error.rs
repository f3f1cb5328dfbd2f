//! Error taxonomy (spec §7).
//!
//! A plain enum with a manual `Display`/`Error` impl, following the
//! teacher's own error types (`Lz4FError`, `DecompressError`) rather than
//! pulling in a derive-macro error crate.

use core::fmt;

use crate::frame::types::FrameKind;

#[derive(Debug)]
pub enum StreamError {
    /// Header shape wrong, bad hex, or a missing CRLF terminator.
    MalformedFrame(String),
    /// The first frame of a stream was not `meta`.
    MissingMeta,
    /// A frame kind other than `data`/`zero`/`stop` appeared after `meta`.
    UnexpectedFrame(FrameKind),
    /// The adapter returned an extent enumeration that overlaps or has gaps.
    InvalidExtents(String),
    /// `meta.virtual-size` exceeds the destination's capacity.
    DestinationTooSmall { virtual_size: u64, capacity: u64 },
    /// Underlying transport (HTTP/NBD) failure, surfaced unchanged.
    Transport(String),
    /// Source or sink ended before a frame was fully read/written.
    ShortIo { expected: usize, got: usize },
    /// Incremental semantics requested on a transfer that doesn't support it.
    UnsupportedContext(&'static str),
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamError::MalformedFrame(msg) => write!(f, "malformed frame: {msg}"),
            StreamError::MissingMeta => write!(f, "stream did not begin with a meta frame"),
            StreamError::UnexpectedFrame(kind) => {
                write!(f, "unexpected frame kind after meta: {kind:?}")
            }
            StreamError::InvalidExtents(msg) => write!(f, "invalid extent enumeration: {msg}"),
            StreamError::DestinationTooSmall {
                virtual_size,
                capacity,
            } => write!(
                f,
                "destination too small: virtual-size {virtual_size} exceeds capacity {capacity}"
            ),
            StreamError::Transport(msg) => write!(f, "transport error: {msg}"),
            StreamError::ShortIo { expected, got } => {
                write!(f, "short I/O: expected {expected} bytes, got {got}")
            }
            StreamError::UnsupportedContext(context) => {
                write!(f, "unsupported enumeration context: {context}")
            }
        }
    }
}

impl std::error::Error for StreamError {}

impl From<std::io::Error> for StreamError {
    fn from(err: std::io::Error) -> Self {
        StreamError::Transport(err.to_string())
    }
}

impl From<reqwest::Error> for StreamError {
    fn from(err: reqwest::Error) -> Self {
        StreamError::Transport(err.to_string())
    }
}
