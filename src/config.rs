//! Wire-format constants and I/O tunables.
//!
//! Compile-time constants only — this tool has no persisted runtime
//! configuration (the stream itself, plus the transfer URL, is the entire
//! input).

/// Total byte length of a frame header: `<kind:4> <start:16> <length:16> CRLF`.
pub const HEADER_LEN: usize = 29;

/// Byte length of a frame kind tag (`meta`, `data`, `zero`, `stop`).
pub const KIND_LEN: usize = 4;

/// Byte length of a zero-padded lowercase hex `u64` field.
pub const HEX_FIELD_LEN: usize = 16;

/// CRLF terminator bytes used after every header and after `data`/`meta` bodies.
pub const CRLF: [u8; 2] = [0x0D, 0x0A];

/// Default chunk size used when streaming a `data` frame body or a ranged
/// read/write through the imageio adapter. Chosen within the 1-8 MiB range
/// recommended by the adapter contract.
pub const TRANSFER_CHUNK_SIZE: usize = 1024 * 1024;
