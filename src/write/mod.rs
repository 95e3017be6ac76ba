//! Writing zip containers.
//!
//! [`ArchiveWriter`] re-emits the parts of an opened [`Archive`] in their
//! original order. Parts without new content are copied record for record:
//! the same local header, the same stored bytes, the same data descriptor.
//! Parts with new content are compressed with their original method and get
//! fresh CRC-32 and size fields. Every other header field is carried over.
//!
//! [`ArchiveWriter::write_to_path`] wraps this in an atomic commit, see
//! [`commit_atomic`].

mod atomic;

use std::io::{self, Write};
use std::path::Path;

pub use atomic::{commit_atomic, commit_with};

use crate::codec::{self, Compression, DEFAULT_DEFLATE_LEVEL};
use crate::format::records::EndOfCentralDirectory;
use crate::format::{ZIP64_MARKER_U16, ZIP64_MARKER_U32, flags};
use crate::{Archive, ArchivePart, Error, Result};

/// A part queued for writing, with optional replacement content.
#[derive(Debug, Clone)]
pub struct OutputPart<'a> {
    part: &'a ArchivePart,
    content: Option<Vec<u8>>,
}

impl<'a> OutputPart<'a> {
    /// Queues a part to be copied as-is.
    pub fn unchanged(part: &'a ArchivePart) -> Self {
        Self { part, content: None }
    }

    /// Queues a part with new uncompressed content.
    pub fn rewritten(part: &'a ArchivePart, content: Vec<u8>) -> Self {
        Self {
            part,
            content: Some(content),
        }
    }

    /// Returns the source part.
    pub fn part(&self) -> &ArchivePart {
        self.part
    }

    /// Returns true if the part carries new content.
    pub fn is_rewritten(&self) -> bool {
        self.content.is_some()
    }
}

/// Statistics about a written archive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteSummary {
    /// Number of parts written.
    pub parts_written: usize,
    /// Number of parts written with new content.
    pub parts_rewritten: usize,
    /// Total archive size in bytes.
    pub bytes_written: u64,
}

/// Emits zip containers from opened parts.
///
/// # Example
///
/// ```rust,no_run
/// use std::path::Path;
/// use slidefill::{Archive, ArchiveWriter, OutputPart};
///
/// let archive = Archive::open_path("seed.pptx")?;
/// let parts = archive.parts().iter().map(OutputPart::unchanged).collect();
/// ArchiveWriter::for_archive(&archive).write_to_path(parts, Path::new("copy.pptx"))?;
/// # Ok::<(), slidefill::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct ArchiveWriter {
    comment: Vec<u8>,
    deflate_level: u32,
}

impl Default for ArchiveWriter {
    fn default() -> Self {
        Self {
            comment: Vec::new(),
            deflate_level: DEFAULT_DEFLATE_LEVEL,
        }
    }
}

impl ArchiveWriter {
    /// Creates a writer with no archive comment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a writer that keeps the comment of `archive`.
    pub fn for_archive(archive: &Archive) -> Self {
        Self::new().comment(archive.comment().to_vec())
    }

    /// Sets the archive comment.
    pub fn comment(mut self, comment: Vec<u8>) -> Self {
        self.comment = comment;
        self
    }

    /// Sets the deflate level (0-9) for rewritten parts.
    pub fn deflate_level(mut self, level: u32) -> Self {
        self.deflate_level = level.min(9);
        self
    }

    /// Writes `parts` to `sink` in ascending original index order.
    ///
    /// # Errors
    ///
    /// - [`Error::WriteFailure`] (without a path) if `sink` fails
    /// - [`Error::UnsupportedMethod`] if a rewritten part uses a method that
    ///   cannot be encoded
    /// - [`Error::UnsupportedFeature`] if the output would need ZIP64
    pub fn write<W: Write>(&self, mut parts: Vec<OutputPart<'_>>, sink: W) -> Result<WriteSummary> {
        if self.comment.len() > usize::from(u16::MAX) {
            return Err(Error::UnsupportedFeature {
                feature: "archive comment longer than 65535 bytes",
            });
        }
        if parts.len() >= usize::from(ZIP64_MARKER_U16) {
            return Err(Error::UnsupportedFeature { feature: "ZIP64" });
        }
        parts.sort_by_key(|p| p.part.original_index);

        let mut out = OffsetWriter::new(sink);
        let mut central = Vec::with_capacity(parts.len());
        let mut rewritten = 0;

        for output in &parts {
            let part = output.part;
            let offset = to_u32(out.position())?;
            let mut header = part.central.clone();
            header.local_header_offset = offset;

            match &output.content {
                None => {
                    part.local.write_to(&mut out).map_err(write_error)?;
                    out.write_all(&part.payload).map_err(write_error)?;
                    if let Some(descriptor) = &part.descriptor {
                        out.write_all(descriptor).map_err(write_error)?;
                    }
                }
                Some(content) => {
                    let payload = encode(part, content, self.deflate_level)?;
                    let crc = crc32fast::hash(content);
                    let size = to_u32(content.len() as u64)?;
                    let compressed_size = to_u32(payload.len() as u64)?;

                    let mut local = part.local.clone();
                    local.flags &= !flags::DATA_DESCRIPTOR;
                    local.crc32 = crc;
                    local.compressed_size = compressed_size;
                    local.uncompressed_size = size;

                    header.flags &= !flags::DATA_DESCRIPTOR;
                    header.crc32 = crc;
                    header.compressed_size = compressed_size;
                    header.uncompressed_size = size;

                    local.write_to(&mut out).map_err(write_error)?;
                    out.write_all(&payload).map_err(write_error)?;
                    rewritten += 1;
                    log::debug!(
                        "rewrote '{}': {} bytes, {} stored ({})",
                        part.path,
                        size,
                        compressed_size,
                        part.compression
                    );
                }
            }
            central.push(header);
        }

        let cd_start = out.position();
        for header in &central {
            header.write_to(&mut out).map_err(write_error)?;
        }
        let cd_size = out.position() - cd_start;

        let entries = parts.len() as u16;
        let eocd = EndOfCentralDirectory {
            disk_number: 0,
            central_directory_disk: 0,
            entries_on_disk: entries,
            total_entries: entries,
            central_directory_size: to_u32(cd_size)?,
            central_directory_offset: to_u32(cd_start)?,
            comment: self.comment.clone(),
        };
        eocd.write_to(&mut out).map_err(write_error)?;
        out.flush().map_err(write_error)?;

        Ok(WriteSummary {
            parts_written: parts.len(),
            parts_rewritten: rewritten,
            bytes_written: out.position(),
        })
    }

    /// Writes `parts` into a new buffer.
    pub fn write_to_vec(&self, parts: Vec<OutputPart<'_>>) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.write(parts, &mut buffer)?;
        Ok(buffer)
    }

    /// Writes `parts` atomically to `dest`.
    ///
    /// On failure the destination is left untouched and no temporary file
    /// remains.
    pub fn write_to_path(&self, parts: Vec<OutputPart<'_>>, dest: &Path) -> Result<WriteSummary> {
        let mut summary = WriteSummary::default();
        commit_with(dest, |sink| {
            summary = self.write(parts, sink)?;
            Ok(())
        })?;
        Ok(summary)
    }
}

fn encode(part: &ArchivePart, content: &[u8], level: u32) -> Result<Vec<u8>> {
    if let Compression::Other(method) = part.compression {
        return Err(Error::UnsupportedMethod {
            part: part.path.to_string(),
            method,
        });
    }
    codec::compress(part.compression, content, level).map_err(write_error)
}

fn to_u32(value: u64) -> Result<u32> {
    match u32::try_from(value) {
        Ok(v) if v != ZIP64_MARKER_U32 => Ok(v),
        _ => Err(Error::UnsupportedFeature { feature: "ZIP64" }),
    }
}

fn write_error(e: io::Error) -> Error {
    Error::write_failure(None, e)
}

/// Writer wrapper that tracks the current output offset.
struct OffsetWriter<W> {
    inner: W,
    position: u64,
}

impl<W> OffsetWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner, position: 0 }
    }

    fn position(&self) -> u64 {
        self.position
    }
}

impl<W: Write> Write for OffsetWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.position += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
