//! Upload engine (C5, spec §4.5): parses a stream from a byte source,
//! validates it against the destination, then dispatches each frame.

use std::io::Read;

use crate::adapter::ImageioAdapter;
use crate::engine::with_adapter_close;
use crate::error::StreamError;
use crate::frame::{expect_crlf, parse_meta_json, read_exact, read_header, FrameKind};

/// Restores a sparse stream read from `source` onto `adapter`.
///
/// Idempotent for a full (non-incremental) stream: applying it twice to the
/// same destination yields the same final state, since every effect (zero a
/// range, overwrite a range) depends only on the frame, not on prior state.
///
/// The adapter is closed exactly once on every exit path (spec §5).
pub fn upload<A, R>(adapter: &mut A, source: &mut R) -> Result<(), StreamError>
where
    A: ImageioAdapter + ?Sized,
    R: Read,
{
    with_adapter_close(adapter, |adapter| upload_inner(adapter, source))
}

fn upload_inner<A, R>(adapter: &mut A, source: &mut R) -> Result<(), StreamError>
where
    A: ImageioAdapter + ?Sized,
    R: Read,
{
    let (kind, _start, length) = read_header(source)?;
    if kind != FrameKind::Meta {
        return Err(StreamError::MissingMeta);
    }
    let body = read_exact(source, length as usize)?;
    expect_crlf(source)?;
    let meta = parse_meta_json(&body)
        .map_err(|e| StreamError::MalformedFrame(format!("invalid meta JSON: {e}")))?;

    let capacity = adapter.size()?;
    if meta.virtual_size > capacity {
        return Err(StreamError::DestinationTooSmall {
            virtual_size: meta.virtual_size,
            capacity,
        });
    }
    tracing::debug!(virtual_size = meta.virtual_size, incremental = meta.incremental, "validated meta frame");

    loop {
        let (kind, start, length) = read_header(source)?;
        match kind {
            FrameKind::Zero => {
                adapter.zero(start, length)?;
                tracing::trace!(start, length, "applied zero frame");
            }
            FrameKind::Data => {
                adapter.read_from(source, start, length)?;
                expect_crlf(source)?;
                tracing::trace!(start, length, "applied data frame");
            }
            FrameKind::Stop => break,
            other => return Err(StreamError::UnexpectedFrame(other)),
        }
    }

    adapter.flush()?;
    tracing::debug!("flushed destination");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::memory::MemoryAdapter;
    use crate::engine::download::download;
    use std::io::Cursor;

    fn stream_for(disk: Vec<u8>, incremental_ranges: Option<Vec<(u64, u64)>>) -> Vec<u8> {
        let mut adapter = match incremental_ranges {
            Some(ranges) => MemoryAdapter::with_dirty_ranges(disk, ranges),
            None => MemoryAdapter::new(disk),
        };
        let mut out = Vec::new();
        download(&mut adapter, &mut out, incremental_ranges.is_some()).unwrap();
        out
    }

    #[test]
    fn first_frame_must_be_meta() {
        let mut adapter = MemoryAdapter::new(vec![0u8; 8]);
        let mut bad_stream = Vec::new();
        crate::frame::write_header(&mut bad_stream, FrameKind::Stop, 0, 0).unwrap();
        let mut source = Cursor::new(bad_stream);
        assert!(matches!(upload(&mut adapter, &mut source), Err(StreamError::MissingMeta)));
    }

    #[test]
    fn destination_too_small_is_rejected_before_any_write() {
        let stream = stream_for(b"ABCDEF".to_vec(), None);
        let mut adapter = MemoryAdapter::new(vec![0u8; 3]);
        let mut source = Cursor::new(stream);
        let result = upload(&mut adapter, &mut source);
        assert!(matches!(
            result,
            Err(StreamError::DestinationTooSmall { virtual_size: 6, capacity: 3 })
        ));
        assert_eq!(adapter.flush_calls, 0);
        assert_eq!(adapter.zero_calls.len(), 0);
    }

    #[test]
    fn full_stream_round_trips_byte_for_byte() {
        let original = b"ABCDEF".to_vec();
        let stream = stream_for(original.clone(), None);
        let mut destination = MemoryAdapter::new(vec![0u8; original.len()]);
        let mut source = Cursor::new(stream);
        upload(&mut destination, &mut source).unwrap();
        assert_eq!(destination.disk(), original.as_slice());
        assert_eq!(destination.flush_calls, 1);
        assert_eq!(destination.close_calls, 1);
    }

    #[test]
    fn zero_only_stream_zeroes_destination() {
        let disk = vec![0u8; 1_048_576];
        let stream = stream_for(disk.clone(), None);
        let mut destination = MemoryAdapter::new(vec![0xFFu8; disk.len()]);
        let mut source = Cursor::new(stream);
        upload(&mut destination, &mut source).unwrap();
        assert_eq!(destination.zero_calls, vec![(0, 1_048_576)]);
        assert_eq!(destination.flush_calls, 1);
        assert!(destination.disk().iter().all(|&b| b == 0));
    }

    #[test]
    fn incremental_stream_leaves_unmentioned_ranges_untouched() {
        let disk: Vec<u8> = (0..3 * 4096).map(|i| (i / 4096) as u8 + 1).collect();
        let stream = stream_for(disk.clone(), Some(vec![(4096, 4096)]));

        let mut destination_disk = disk.clone();
        destination_disk[4096..8192].iter_mut().for_each(|b| *b = 0xAA);
        let mut destination = MemoryAdapter::new(destination_disk);
        let mut source = Cursor::new(stream);
        upload(&mut destination, &mut source).unwrap();

        assert_eq!(&destination.disk()[..4096], &disk[..4096]);
        assert_eq!(&destination.disk()[8192..], &disk[8192..]);
    }

    #[test]
    fn unexpected_frame_kind_after_meta_is_rejected() {
        let mut stream = Vec::new();
        let meta = crate::frame::MetaInfo::new(4, 0, "x".into(), false);
        let body = serde_json::to_vec(&meta).unwrap();
        crate::frame::write_header(&mut stream, FrameKind::Meta, 0, body.len() as u64).unwrap();
        stream.extend_from_slice(&body);
        stream.extend_from_slice(&crate::config::CRLF);
        crate::frame::write_header(&mut stream, FrameKind::Meta, 0, 0).unwrap(); // invalid repeat

        let mut adapter = MemoryAdapter::new(vec![0u8; 4]);
        let mut source = Cursor::new(stream);
        assert!(matches!(
            upload(&mut adapter, &mut source),
            Err(StreamError::UnexpectedFrame(FrameKind::Meta))
        ));
    }

    #[test]
    fn truncated_data_body_fails_with_short_io() {
        let mut stream = Vec::new();
        let meta = crate::frame::MetaInfo::new(6, 6, "x".into(), false);
        let body = serde_json::to_vec(&meta).unwrap();
        crate::frame::write_header(&mut stream, FrameKind::Meta, 0, body.len() as u64).unwrap();
        stream.extend_from_slice(&body);
        stream.extend_from_slice(&crate::config::CRLF);
        crate::frame::write_header(&mut stream, FrameKind::Data, 0, 6).unwrap();
        stream.extend_from_slice(b"AB"); // short — only 2 of 6 bytes present, no CRLF

        let mut adapter = MemoryAdapter::new(vec![0u8; 6]);
        let mut source = Cursor::new(stream);
        let result = upload(&mut adapter, &mut source);
        assert!(matches!(result, Err(StreamError::ShortIo { .. })));
        assert_eq!(adapter.flush_calls, 0);
    }
}
