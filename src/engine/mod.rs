//! The download (C4) and upload (C5) streaming engines.

pub mod download;
pub mod upload;

pub use download::download;
pub use upload::upload;

use crate::adapter::ImageioAdapter;
use crate::error::StreamError;

/// Runs `body`, then unconditionally calls `adapter.close()` exactly once —
/// on every exit path, success or failure — before returning. If `body`
/// failed, its error takes precedence over any error from `close`. This is
/// the scoped-release discipline from spec §5, the Rust-native replacement
/// for the teacher's "RAII replaces `_cleanup`" approach (no `goto` / manual
/// free needed; here there isn't even a destructor to rely on, since the
/// adapter is a borrowed trait object, so the call is made explicit here).
pub(crate) fn with_adapter_close<A, F, T>(adapter: &mut A, body: F) -> Result<T, StreamError>
where
    A: ImageioAdapter + ?Sized,
    F: FnOnce(&mut A) -> Result<T, StreamError>,
{
    let result = body(adapter);
    let close_result = adapter.close();
    match result {
        Ok(value) => close_result.map(|_| value),
        Err(err) => Err(err),
    }
}
