//! The real imageio transport (C3): HTTPS to the URL given on the CLI.
//!
//! The imageio HTTP service itself is out of this crate's scope (spec §1);
//! this module only documents and isolates the minimal wire contract the
//! engines need — extent enumeration, ranged read/write, zero, flush — so
//! engine code never touches an HTTP type directly.
//!
//! Built on `reqwest::blocking`: a blocking client runs its own background
//! event loop and exposes a synchronous facade, matching spec §5's "the
//! adapter MAY internally use multiple threads or an event loop for
//! transport, but exposes a synchronous surface."

use std::io::{Read, Write};

use reqwest::blocking::Client;
use reqwest::header::RANGE;
use reqwest::{Method, StatusCode, Url};
use serde::{Deserialize, Serialize};

use crate::adapter::{EnumerationContext, ImageioAdapter};
use crate::config::TRANSFER_CHUNK_SIZE;
use crate::error::StreamError;
use crate::extent::{Extent, ExtentKind};

/// One entry of the `GET {url}/extents?context=...` JSON array.
#[derive(Debug, Deserialize)]
struct WireExtent {
    start: u64,
    length: u64,
    #[serde(default)]
    zero: bool,
    #[serde(default)]
    dirty: bool,
}

impl From<WireExtent> for Extent {
    fn from(wire: WireExtent) -> Self {
        let kind = if wire.zero { ExtentKind::Zero } else { ExtentKind::Data };
        Extent::new(wire.start, wire.length, kind, wire.dirty)
    }
}

#[derive(Serialize)]
struct ZeroRequest {
    offset: u64,
    length: u64,
}

/// HTTPS-backed [`ImageioAdapter`].
pub struct HttpAdapter {
    client: Client,
    base_url: Url,
}

impl HttpAdapter {
    /// Connects to `base_url`. When `secure` is `false`, certificate
    /// validation is skipped — spec §6: the adapter "MUST accept
    /// `secure=false` to skip certificate validation in test setups."
    pub fn connect(base_url: Url, secure: bool) -> Result<Self, StreamError> {
        let client = Client::builder()
            .danger_accept_invalid_certs(!secure)
            .build()?;
        Ok(Self { client, base_url })
    }

    fn extents_url(&self, context: EnumerationContext) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().unwrap_or_else(|_| unreachable!());
            segments.push("extents");
        }
        url.query_pairs_mut().append_pair("context", context.as_str());
        url
    }
}

impl ImageioAdapter for HttpAdapter {
    fn size(&mut self) -> Result<u64, StreamError> {
        let resp = self.client.head(self.base_url.clone()).send()?;
        let resp = resp
            .error_for_status()
            .map_err(|e| StreamError::Transport(e.to_string()))?;
        resp.content_length()
            .ok_or_else(|| StreamError::Transport("response had no Content-Length".into()))
    }

    fn extents(&mut self, context: EnumerationContext) -> Result<Vec<Extent>, StreamError> {
        let resp = self.client.get(self.extents_url(context)).send()?;
        if context == EnumerationContext::Dirty && resp.status() == StatusCode::BAD_REQUEST {
            return Err(StreamError::UnsupportedContext("dirty"));
        }
        let resp = resp
            .error_for_status()
            .map_err(|e| StreamError::Transport(e.to_string()))?;
        let wire: Vec<WireExtent> = resp.json().map_err(|e| StreamError::Transport(e.to_string()))?;
        Ok(wire
            .into_iter()
            .filter(|e| e.length > 0)
            .map(Extent::from)
            .collect())
    }

    fn write_to(&mut self, sink: &mut dyn Write, offset: u64, length: u64) -> Result<(), StreamError> {
        if length == 0 {
            return Ok(());
        }
        let range = format!("bytes={}-{}", offset, offset + length - 1);
        let resp = self
            .client
            .get(self.base_url.clone())
            .header(RANGE, range)
            .send()?;
        let mut resp = resp
            .error_for_status()
            .map_err(|e| StreamError::Transport(e.to_string()))?;

        let mut remaining = length;
        let mut buf = vec![0u8; TRANSFER_CHUNK_SIZE];
        while remaining > 0 {
            let want = remaining.min(TRANSFER_CHUNK_SIZE as u64) as usize;
            let got = resp.read(&mut buf[..want])?;
            if got == 0 {
                return Err(StreamError::ShortIo {
                    expected: want,
                    got: 0,
                });
            }
            sink.write_all(&buf[..got])?;
            remaining -= got as u64;
        }
        Ok(())
    }

    fn read_from(&mut self, source: &mut dyn Read, offset: u64, length: u64) -> Result<(), StreamError> {
        let mut remaining = length;
        let mut pos = offset;
        let mut buf = vec![0u8; TRANSFER_CHUNK_SIZE];
        while remaining > 0 {
            let want = remaining.min(TRANSFER_CHUNK_SIZE as u64) as usize;
            source.read_exact(&mut buf[..want]).map_err(|_| StreamError::ShortIo {
                expected: want,
                got: 0,
            })?;
            let range = format!("bytes {}-{}/{}", pos, pos + want as u64 - 1, offset + length);
            let resp = self
                .client
                .request(Method::PUT, self.base_url.clone())
                .header(reqwest::header::CONTENT_RANGE, range)
                .body(buf[..want].to_vec())
                .send()?;
            resp.error_for_status()
                .map_err(|e| StreamError::Transport(e.to_string()))?;
            pos += want as u64;
            remaining -= want as u64;
        }
        Ok(())
    }

    fn zero(&mut self, offset: u64, length: u64) -> Result<(), StreamError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().unwrap_or_else(|_| unreachable!());
            segments.push("zero");
        }
        let resp = self
            .client
            .post(url)
            .json(&ZeroRequest { offset, length })
            .send()?;
        resp.error_for_status()
            .map_err(|e| StreamError::Transport(e.to_string()))?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), StreamError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().unwrap_or_else(|_| unreachable!());
            segments.push("flush");
        }
        let resp = self.client.post(url).send()?;
        resp.error_for_status()
            .map_err(|e| StreamError::Transport(e.to_string()))?;
        Ok(())
    }

    fn close(&mut self) -> Result<(), StreamError> {
        // No persistent session handle beyond the pooled connections
        // `reqwest::blocking::Client` already releases on `Drop`; `close` is
        // kept as an explicit method so engines have one release call site
        // regardless of adapter implementation.
        Ok(())
    }
}
