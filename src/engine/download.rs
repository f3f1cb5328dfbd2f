//! Download engine (C4, spec §4.4): drives extent enumeration, emits a meta
//! frame, then a zero/data frame per extent, terminated by stop.

use std::io::Write;

use crate::adapter::{EnumerationContext, ImageioAdapter};
use crate::config::CRLF;
use crate::engine::with_adapter_close;
use crate::error::StreamError;
use crate::extent::Extent;
use crate::frame::{write_header, FrameKind, MetaInfo};

/// Downloads a sparse stream from `adapter` into `sink`.
///
/// `incremental` selects the `"dirty"` enumeration context and filters out
/// clean extents before emission; otherwise the `"zero"` context is used and
/// every extent is emitted, covering `[0, virtual-size)` contiguously (spec
/// property 4).
///
/// The adapter is closed exactly once on every exit path, including when
/// streaming a `data` frame body fails partway through (spec §4.4: "the
/// stream is truncated... this is the caller's signal of failure").
pub fn download<A, W>(adapter: &mut A, sink: &mut W, incremental: bool) -> Result<(), StreamError>
where
    A: ImageioAdapter + ?Sized,
    W: Write,
{
    with_adapter_close(adapter, |adapter| download_inner(adapter, sink, incremental))
}

fn download_inner<A, W>(adapter: &mut A, sink: &mut W, incremental: bool) -> Result<(), StreamError>
where
    A: ImageioAdapter + ?Sized,
    W: Write,
{
    let context = if incremental {
        EnumerationContext::Dirty
    } else {
        EnumerationContext::Zero
    };

    tracing::debug!(context = context.as_str(), "enumerating extents");
    let mut extents: Vec<Extent> = adapter
        .extents(context)?
        .into_iter()
        .filter(|e| e.length > 0)
        .collect();
    validate_coverage(&extents)?;

    let virtual_size = extents.last().map(Extent::end).unwrap_or(0);
    let data_size: u64 = extents
        .iter()
        .filter(|e| e.is_data() && (!incremental || e.is_dirty()))
        .map(|e| e.length)
        .sum();
    let date = chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string();
    let meta = MetaInfo::new(virtual_size, data_size, date, incremental);
    tracing::debug!(virtual_size, data_size, incremental, "emitting meta frame");
    emit_meta(sink, &meta)?;

    if incremental {
        extents.retain(Extent::is_dirty);
    }

    for extent in &extents {
        if extent.is_zero() {
            write_header(sink, FrameKind::Zero, extent.start, extent.length)?;
        } else {
            write_header(sink, FrameKind::Data, extent.start, extent.length)?;
            adapter.write_to(sink, extent.start, extent.length)?;
            sink.write_all(&CRLF)?;
        }
        tracing::trace!(start = extent.start, length = extent.length, "emitted extent frame");
    }

    write_header(sink, FrameKind::Stop, 0, 0)?;
    Ok(())
}

fn emit_meta<W: Write>(sink: &mut W, meta: &MetaInfo) -> Result<(), StreamError> {
    let body = serde_json::to_vec(meta).map_err(|e| StreamError::Transport(e.to_string()))?;
    write_header(sink, FrameKind::Meta, 0, body.len() as u64)?;
    sink.write_all(&body)?;
    sink.write_all(&CRLF)?;
    Ok(())
}

/// Every adapter-returned extent list must be sorted by `start`, contiguous,
/// and cover `[0, virtual-size)` with no gaps or overlap. Checking
/// `extent.start == running_offset` for each extent in order verifies all
/// three properties at once: an out-of-order or overlapping extent would
/// have a `start` less than the running offset, and a gap would have a
/// `start` greater than it.
fn validate_coverage(extents: &[Extent]) -> Result<(), StreamError> {
    let mut expected_start = 0u64;
    for extent in extents {
        if extent.start != expected_start {
            return Err(StreamError::InvalidExtents(format!(
                "expected extent starting at {expected_start}, found one starting at {}",
                extent.start
            )));
        }
        expected_start = extent.end();
    }
    Ok(())
}
