//! Frame kinds and the meta JSON payload (spec §3, §6).

use core::fmt;

use serde::{Deserialize, Serialize};

/// The four frame kinds that may appear on the wire. Each is encoded as an
/// exact four-byte lowercase ASCII tag in the frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    Meta,
    Data,
    Zero,
    Stop,
}

impl FrameKind {
    pub const fn as_bytes(self) -> &'static [u8; 4] {
        match self {
            FrameKind::Meta => b"meta",
            FrameKind::Data => b"data",
            FrameKind::Zero => b"zero",
            FrameKind::Stop => b"stop",
        }
    }

    /// Parses one of the four known four-byte literals. Any other input
    /// (wrong length, non-lowercase, unknown word) is not a `FrameKind`.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        match bytes {
            b"meta" => Some(FrameKind::Meta),
            b"data" => Some(FrameKind::Data),
            b"zero" => Some(FrameKind::Zero),
            b"stop" => Some(FrameKind::Stop),
            _ => None,
        }
    }
}

impl fmt::Display for FrameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(std::str::from_utf8(self.as_bytes()).unwrap())
    }
}

/// The JSON payload of a `meta` frame.
///
/// Strict on emit (all four keys always written); lenient on parse — unknown
/// keys are silently ignored by `serde_json`'s default struct deserialization,
/// and every field but `virtual_size` is optional so its absence never fails
/// the whole frame (spec §3: "`virtual-size` is the only field whose absence
/// is fatal").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaInfo {
    #[serde(rename = "virtual-size")]
    pub virtual_size: u64,
    #[serde(rename = "data-size", default)]
    pub data_size: u64,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub incremental: bool,
}

impl MetaInfo {
    pub fn new(virtual_size: u64, data_size: u64, date: String, incremental: bool) -> Self {
        Self {
            virtual_size,
            data_size,
            date,
            incremental,
        }
    }
}

/// Parses a meta frame body, treating a missing `virtual-size` key as the
/// only fatal absence (everything else defaults per `#[serde(default)]`).
///
/// `serde_json` already ignores unrecognised keys for a plain struct target,
/// so this is a thin, documented wrapper rather than a hand-rolled parser.
pub fn parse_meta_json(body: &[u8]) -> Result<MetaInfo, serde_json::Error> {
    // Deserialize into a raw `serde_json::Value` first so we can distinguish
    // "virtual-size absent" (fatal) from "virtual-size present but zero"
    // (valid — spec's zero-length-image edge case).
    let value: serde_json::Value = serde_json::from_slice(body)?;
    if value.get("virtual-size").is_none() {
        return Err(serde::de::Error::missing_field("virtual-size"));
    }
    serde_json::from_value(value)
}
