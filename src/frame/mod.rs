//! The sparse stream's frame codec (C1): header encode/decode plus the meta
//! JSON payload. See spec §3 and §4.1.

pub mod header;
pub mod types;

pub use header::{expect_crlf, read_exact, read_header, write_header};
pub use types::{parse_meta_json, FrameKind, MetaInfo};
