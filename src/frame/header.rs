//! The 29-byte fixed-shape frame header: encode and decode (C1, spec §4.1).
//!
//! ```text
//! <kind:4> <space:1> <start:16 hex> <space:1> <length:16 hex> CRLF
//! ```
//!
//! The codec is stateless; grammar rules (meta-first, one stop, etc.) are
//! enforced by the download/upload engines, not here.

use std::io::{Read, Write};

use crate::config::{CRLF, HEADER_LEN, HEX_FIELD_LEN, KIND_LEN};
use crate::error::StreamError;
use crate::frame::types::FrameKind;

/// Writes the 29-byte header for `kind` with the given `start`/`length`.
///
/// `write_header` always produces exactly [`HEADER_LEN`] bytes (spec
/// property 1). There is no invalid `kind` to guard against here — `kind` is
/// a `FrameKind`, so the "one of four literals" rule from spec §4.1 is
/// enforced by the type system instead of at runtime.
pub fn write_header<W: Write>(sink: &mut W, kind: FrameKind, start: u64, length: u64) -> std::io::Result<()> {
    let mut buf = [0u8; HEADER_LEN];
    buf[..KIND_LEN].copy_from_slice(kind.as_bytes());
    buf[KIND_LEN] = b' ';
    write_hex16(&mut buf[KIND_LEN + 1..KIND_LEN + 1 + HEX_FIELD_LEN], start);
    let length_start = KIND_LEN + 1 + HEX_FIELD_LEN;
    buf[length_start] = b' ';
    write_hex16(
        &mut buf[length_start + 1..length_start + 1 + HEX_FIELD_LEN],
        length,
    );
    buf[length_start + 1 + HEX_FIELD_LEN] = CRLF[0];
    buf[length_start + 1 + HEX_FIELD_LEN + 1] = CRLF[1];
    debug_assert_eq!(length_start + 1 + HEX_FIELD_LEN + 2, HEADER_LEN);
    sink.write_all(&buf)
}

/// Reads and parses one 29-byte frame header.
///
/// Fails with [`StreamError::MalformedFrame`] if fewer than 29 bytes are
/// available, the kind is not one of the four known literals, a hex field
/// contains a non-hex-digit byte, or the trailing CRLF is missing.
pub fn read_header<R: Read>(source: &mut R) -> Result<(FrameKind, u64, u64), StreamError> {
    let buf = read_exact(source, HEADER_LEN)?;

    let kind = FrameKind::from_bytes(&buf[..KIND_LEN])
        .ok_or_else(|| StreamError::MalformedFrame(format!("unknown frame kind {:?}", &buf[..KIND_LEN])))?;

    if buf[KIND_LEN] != b' ' {
        return Err(StreamError::MalformedFrame("missing space after kind".into()));
    }
    let start_range = KIND_LEN + 1..KIND_LEN + 1 + HEX_FIELD_LEN;
    let start = parse_hex16(&buf[start_range.clone()])?;

    let length_field_start = start_range.end;
    if buf[length_field_start] != b' ' {
        return Err(StreamError::MalformedFrame("missing space after start".into()));
    }
    let length_range = length_field_start + 1..length_field_start + 1 + HEX_FIELD_LEN;
    let length = parse_hex16(&buf[length_range.clone()])?;

    let crlf = &buf[length_range.end..];
    if crlf != CRLF {
        return Err(StreamError::MalformedFrame("missing CRLF after header".into()));
    }

    Ok((kind, start, length))
}

/// Reads exactly `n` bytes or fails with `MalformedFrame` (treated as a
/// short-read at this level; engines upgrade this to `ShortIo` where the
/// spec's taxonomy asks for it explicitly).
pub fn read_exact<R: Read>(source: &mut R, n: usize) -> Result<Vec<u8>, StreamError> {
    let mut buf = vec![0u8; n];
    source
        .read_exact(&mut buf)
        .map_err(|e| StreamError::MalformedFrame(format!("short read ({n} bytes expected): {e}")))?;
    Ok(buf)
}

/// Reads and validates a trailing CRLF terminator.
pub fn expect_crlf<R: Read>(source: &mut R) -> Result<(), StreamError> {
    let buf = read_exact(source, 2)?;
    if buf != CRLF {
        return Err(StreamError::MalformedFrame("expected CRLF terminator".into()));
    }
    Ok(())
}

fn write_hex16(dst: &mut [u8], value: u64) {
    const DIGITS: &[u8; 16] = b"0123456789abcdef";
    debug_assert_eq!(dst.len(), HEX_FIELD_LEN);
    for i in 0..HEX_FIELD_LEN {
        let shift = (HEX_FIELD_LEN - 1 - i) * 4;
        dst[i] = DIGITS[((value >> shift) & 0xf) as usize];
    }
}

fn parse_hex16(field: &[u8]) -> Result<u64, StreamError> {
    let s = std::str::from_utf8(field)
        .map_err(|_| StreamError::MalformedFrame("hex field is not valid UTF-8".into()))?;
    u64::from_str_radix(s, 16)
        .map_err(|_| StreamError::MalformedFrame(format!("invalid hex field {s:?}")))
}
