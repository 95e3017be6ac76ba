//! Part payload codecs.
//!
//! Document containers store their parts either uncompressed or with raw
//! deflate. Other zip methods are recognized so that binary parts using them
//! can still be copied through, but they cannot be decoded or re-encoded.

use std::fmt;
use std::io::{self, Read, Write};

use flate2::Compression as Level;
use flate2::bufread::DeflateDecoder;
use flate2::write::DeflateEncoder;

use crate::format::method;
use crate::{Error, Result};

/// Default deflate level used when re-compressing rewritten parts.
pub const DEFAULT_DEFLATE_LEVEL: u32 = 6;

/// Upper bound of the deflate expansion ratio.
const MAX_DEFLATE_RATIO: usize = 1032;

/// Compression method of a single part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Compression {
    /// Stored without compression.
    Stored,
    /// Raw deflate.
    Deflated,
    /// Any other zip method, identified by its raw method number.
    ///
    /// Parts using it can only be passed through unchanged.
    Other(u16),
}

impl Compression {
    /// Maps a zip method number to a compression method.
    pub fn from_method(id: u16) -> Self {
        match id {
            method::STORED => Self::Stored,
            method::DEFLATED => Self::Deflated,
            other => Self::Other(other),
        }
    }

    /// Returns the zip method number.
    pub fn method_id(self) -> u16 {
        match self {
            Self::Stored => method::STORED,
            Self::Deflated => method::DEFLATED,
            Self::Other(id) => id,
        }
    }

    /// Returns true if parts using this method can be decoded and re-encoded.
    pub fn is_supported(self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stored => write!(f, "stored"),
            Self::Deflated => write!(f, "deflated"),
            Self::Other(id) => write!(f, "method {}", id),
        }
    }
}

/// Decodes a stored payload and verifies it against the header's size and CRC-32.
///
/// Inflation never produces more than `expected_size + 1` bytes, so a payload
/// lying about its size cannot expand without bound.
pub fn decompress(
    part: &str,
    compression: Compression,
    payload: &[u8],
    expected_size: u32,
    expected_crc: u32,
    data_offset: u64,
) -> Result<Vec<u8>> {
    let data = match compression {
        Compression::Stored => payload.to_vec(),
        Compression::Deflated => {
            let mut out = Vec::with_capacity(inflate_capacity(expected_size, payload.len()));
            DeflateDecoder::new(payload)
                .take(u64::from(expected_size) + 1)
                .read_to_end(&mut out)
                .map_err(|e| {
                    Error::corrupt(data_offset, format!("cannot inflate part '{part}': {e}"))
                })?;
            out
        }
        Compression::Other(method) => {
            return Err(Error::UnsupportedMethod {
                part: part.to_string(),
                method,
            });
        }
    };

    if data.len() as u64 != u64::from(expected_size) {
        return Err(Error::corrupt(
            data_offset,
            format!(
                "part '{part}' decodes to {} bytes, header declares {expected_size}",
                data.len()
            ),
        ));
    }

    let actual = crc32fast::hash(&data);
    if actual != expected_crc {
        return Err(Error::corrupt(
            data_offset,
            format!("CRC mismatch for part '{part}': expected {expected_crc:#010x}, got {actual:#010x}"),
        ));
    }

    Ok(data)
}

/// Buffer size to reserve before inflating.
///
/// The declared size is untrusted until the CRC check passes, so it is
/// capped by what the payload could expand to.
fn inflate_capacity(expected_size: u32, payload_len: usize) -> usize {
    (expected_size as usize).min(payload_len.saturating_mul(MAX_DEFLATE_RATIO))
}

/// Encodes `data` with the given method.
///
/// Returns an `InvalidInput` I/O error for methods that cannot be written.
pub fn compress(compression: Compression, data: &[u8], level: u32) -> io::Result<Vec<u8>> {
    match compression {
        Compression::Stored => Ok(data.to_vec()),
        Compression::Deflated => {
            let mut encoder =
                DeflateEncoder::new(Vec::with_capacity(data.len() / 2), Level::new(level));
            encoder.write_all(data)?;
            encoder.finish()
        }
        Compression::Other(method) => Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("cannot encode with zip method {method}"),
        )),
    }
}
