//! A single part of an opened container.

use crate::codec::{self, Compression};
use crate::format::records::{CentralHeader, LocalHeader};
use crate::{PartPath, Result};

/// One entry of a zip container, in the order it appears in the central
/// directory.
///
/// The part owns its stored (possibly compressed) payload and every header
/// field needed to write it back unchanged. Its content is only decoded when
/// [`contents`](Self::contents) is called, which the pipeline does for
/// textual parts only.
#[derive(Debug, Clone)]
pub struct ArchivePart {
    pub(crate) path: PartPath,
    pub(crate) original_index: usize,
    pub(crate) compression: Compression,
    pub(crate) central: CentralHeader,
    pub(crate) local: LocalHeader,
    pub(crate) data_offset: u64,
    pub(crate) payload: Vec<u8>,
    pub(crate) descriptor: Option<Vec<u8>>,
}

impl ArchivePart {
    /// Returns the part path.
    pub fn path(&self) -> &PartPath {
        &self.path
    }

    /// Returns the position of this part in the source central directory.
    pub fn original_index(&self) -> usize {
        self.original_index
    }

    /// Returns the compression method the part was stored with.
    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// Returns the stored bytes exactly as they appear in the container.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Returns the uncompressed size declared by the central directory.
    pub fn size(&self) -> u64 {
        u64::from(self.central.uncompressed_size)
    }

    /// Returns the stored size.
    pub fn compressed_size(&self) -> u64 {
        u64::from(self.central.compressed_size)
    }

    /// Returns the CRC-32 of the uncompressed content.
    pub fn crc32(&self) -> u32 {
        self.central.crc32
    }

    /// Returns true for directory entries.
    pub fn is_directory(&self) -> bool {
        self.path.is_directory()
    }

    /// Returns the Unix permission bits, if recorded.
    pub fn unix_mode(&self) -> Option<u32> {
        self.central.unix_mode()
    }

    /// Returns true if the original entry carried a trailing data descriptor.
    pub fn has_data_descriptor(&self) -> bool {
        self.descriptor.is_some()
    }

    /// Decodes the part content, verifying its size and CRC-32.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedMethod`](crate::Error::UnsupportedMethod)
    /// for methods other than stored and deflated, and
    /// [`Error::ArchiveCorrupt`](crate::Error::ArchiveCorrupt) when the
    /// payload does not match its header.
    pub fn contents(&self) -> Result<Vec<u8>> {
        codec::decompress(
            self.path.as_str(),
            self.compression,
            &self.payload,
            self.central.uncompressed_size,
            self.central.crc32,
            self.data_offset,
        )
    }
}
