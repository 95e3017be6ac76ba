//! Zip record structures: local file headers, central directory headers,
//! data descriptors and the end of central directory record.
//!
//! Records keep every field as stored so that an unchanged entry can be
//! re-emitted bit for bit. Variable-length fields (name, extra, comment) are
//! kept as raw bytes; their lengths always fit the 16-bit length fields
//! because they were either parsed from one or copied from a parsed record.

use std::io::{self, Write};

use super::reader::{RecordReader, peek_u32};
use super::{
    CENTRAL_DIRECTORY_SIGNATURE, CENTRAL_HEADER_LEN, DATA_DESCRIPTOR_SIGNATURE,
    END_OF_CENTRAL_DIRECTORY_LEN, END_OF_CENTRAL_DIRECTORY_SIGNATURE,
    LOCAL_FILE_HEADER_SIGNATURE, LOCAL_HEADER_LEN, MAX_COMMENT_LEN,
};
use crate::{Error, Result};

fn write_u16<W: Write>(w: &mut W, value: u16) -> io::Result<()> {
    w.write_all(&value.to_le_bytes())
}

fn write_u32<W: Write>(w: &mut W, value: u32) -> io::Result<()> {
    w.write_all(&value.to_le_bytes())
}

fn len_u16(bytes: &[u8]) -> io::Result<u16> {
    u16::try_from(bytes.len()).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "variable-length zip field exceeds 65535 bytes",
        )
    })
}

/// A local file header, which precedes each entry's data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalHeader {
    /// Version needed to extract.
    pub version_needed: u16,
    /// General purpose bit flags.
    pub flags: u16,
    /// Compression method.
    pub method: u16,
    /// MS-DOS modification time.
    pub mod_time: u16,
    /// MS-DOS modification date.
    pub mod_date: u16,
    /// CRC-32 of the uncompressed data (zero when a data descriptor follows).
    pub crc32: u32,
    /// Size of the stored data.
    pub compressed_size: u32,
    /// Size of the uncompressed data.
    pub uncompressed_size: u32,
    /// Raw file name bytes.
    pub name: Vec<u8>,
    /// Raw extra field bytes.
    pub extra: Vec<u8>,
}

impl LocalHeader {
    /// Parses a local file header starting at `offset`.
    pub fn parse(data: &[u8], offset: usize) -> Result<Self> {
        let mut r = RecordReader::at(data, offset);
        r.expect_signature(LOCAL_FILE_HEADER_SIGNATURE, "local file header")?;
        let version_needed = r.read_u16("local header version")?;
        let flags = r.read_u16("local header flags")?;
        let method = r.read_u16("local header method")?;
        let mod_time = r.read_u16("local header time")?;
        let mod_date = r.read_u16("local header date")?;
        let crc32 = r.read_u32("local header crc")?;
        let compressed_size = r.read_u32("local header compressed size")?;
        let uncompressed_size = r.read_u32("local header size")?;
        let name_len = r.read_u16("local header name length")? as usize;
        let extra_len = r.read_u16("local header extra length")? as usize;
        let name = r.read_bytes(name_len, "local file name")?.to_vec();
        let extra = r.read_bytes(extra_len, "local extra field")?.to_vec();

        Ok(Self {
            version_needed,
            flags,
            method,
            mod_time,
            mod_date,
            crc32,
            compressed_size,
            uncompressed_size,
            name,
            extra,
        })
    }

    /// Returns the encoded size of this header in bytes.
    pub fn encoded_len(&self) -> usize {
        LOCAL_HEADER_LEN + self.name.len() + self.extra.len()
    }

    /// Writes this header.
    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        write_u32(w, LOCAL_FILE_HEADER_SIGNATURE)?;
        write_u16(w, self.version_needed)?;
        write_u16(w, self.flags)?;
        write_u16(w, self.method)?;
        write_u16(w, self.mod_time)?;
        write_u16(w, self.mod_date)?;
        write_u32(w, self.crc32)?;
        write_u32(w, self.compressed_size)?;
        write_u32(w, self.uncompressed_size)?;
        write_u16(w, len_u16(&self.name)?)?;
        write_u16(w, len_u16(&self.extra)?)?;
        w.write_all(&self.name)?;
        w.write_all(&self.extra)
    }
}

/// A central directory file header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CentralHeader {
    /// Version made by (high byte: host system).
    pub version_made_by: u16,
    /// Version needed to extract.
    pub version_needed: u16,
    /// General purpose bit flags.
    pub flags: u16,
    /// Compression method.
    pub method: u16,
    /// MS-DOS modification time.
    pub mod_time: u16,
    /// MS-DOS modification date.
    pub mod_date: u16,
    /// CRC-32 of the uncompressed data.
    pub crc32: u32,
    /// Size of the stored data.
    pub compressed_size: u32,
    /// Size of the uncompressed data.
    pub uncompressed_size: u32,
    /// Raw file name bytes.
    pub name: Vec<u8>,
    /// Raw extra field bytes.
    pub extra: Vec<u8>,
    /// Raw file comment bytes.
    pub comment: Vec<u8>,
    /// Disk number where the entry starts.
    pub disk_start: u16,
    /// Internal file attributes.
    pub internal_attrs: u16,
    /// External file attributes (Unix mode in the high 16 bits for Unix hosts).
    pub external_attrs: u32,
    /// Offset of the local file header.
    pub local_header_offset: u32,
}

impl CentralHeader {
    /// Parses a central directory header at the reader's position.
    pub fn parse(r: &mut RecordReader<'_>) -> Result<Self> {
        r.expect_signature(CENTRAL_DIRECTORY_SIGNATURE, "central directory header")?;
        let version_made_by = r.read_u16("central header version made by")?;
        let version_needed = r.read_u16("central header version")?;
        let flags = r.read_u16("central header flags")?;
        let method = r.read_u16("central header method")?;
        let mod_time = r.read_u16("central header time")?;
        let mod_date = r.read_u16("central header date")?;
        let crc32 = r.read_u32("central header crc")?;
        let compressed_size = r.read_u32("central header compressed size")?;
        let uncompressed_size = r.read_u32("central header size")?;
        let name_len = r.read_u16("central header name length")? as usize;
        let extra_len = r.read_u16("central header extra length")? as usize;
        let comment_len = r.read_u16("central header comment length")? as usize;
        let disk_start = r.read_u16("central header disk number")?;
        let internal_attrs = r.read_u16("central header internal attributes")?;
        let external_attrs = r.read_u32("central header external attributes")?;
        let local_header_offset = r.read_u32("central header local offset")?;
        let name = r.read_bytes(name_len, "central file name")?.to_vec();
        let extra = r.read_bytes(extra_len, "central extra field")?.to_vec();
        let comment = r.read_bytes(comment_len, "central file comment")?.to_vec();

        Ok(Self {
            version_made_by,
            version_needed,
            flags,
            method,
            mod_time,
            mod_date,
            crc32,
            compressed_size,
            uncompressed_size,
            name,
            extra,
            comment,
            disk_start,
            internal_attrs,
            external_attrs,
            local_header_offset,
        })
    }

    /// Returns the encoded size of this header in bytes.
    pub fn encoded_len(&self) -> usize {
        CENTRAL_HEADER_LEN + self.name.len() + self.extra.len() + self.comment.len()
    }

    /// Returns the Unix permission bits, when the entry was made on a Unix host.
    pub fn unix_mode(&self) -> Option<u32> {
        const HOST_UNIX: u16 = 3;
        const HOST_MACOS: u16 = 19;
        match self.version_made_by >> 8 {
            HOST_UNIX | HOST_MACOS if self.external_attrs >> 16 != 0 => {
                Some(self.external_attrs >> 16)
            }
            _ => None,
        }
    }

    /// Writes this header.
    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        write_u32(w, CENTRAL_DIRECTORY_SIGNATURE)?;
        write_u16(w, self.version_made_by)?;
        write_u16(w, self.version_needed)?;
        write_u16(w, self.flags)?;
        write_u16(w, self.method)?;
        write_u16(w, self.mod_time)?;
        write_u16(w, self.mod_date)?;
        write_u32(w, self.crc32)?;
        write_u32(w, self.compressed_size)?;
        write_u32(w, self.uncompressed_size)?;
        write_u16(w, len_u16(&self.name)?)?;
        write_u16(w, len_u16(&self.extra)?)?;
        write_u16(w, len_u16(&self.comment)?)?;
        write_u16(w, self.disk_start)?;
        write_u16(w, self.internal_attrs)?;
        write_u32(w, self.external_attrs)?;
        write_u32(w, self.local_header_offset)?;
        w.write_all(&self.name)?;
        w.write_all(&self.extra)?;
        w.write_all(&self.comment)
    }
}

/// The end of central directory record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndOfCentralDirectory {
    /// Number of this disk.
    pub disk_number: u16,
    /// Disk where the central directory starts.
    pub central_directory_disk: u16,
    /// Number of central directory records on this disk.
    pub entries_on_disk: u16,
    /// Total number of central directory records.
    pub total_entries: u16,
    /// Size of the central directory in bytes.
    pub central_directory_size: u32,
    /// Offset of the start of the central directory.
    pub central_directory_offset: u32,
    /// Raw archive comment.
    pub comment: Vec<u8>,
}

impl EndOfCentralDirectory {
    /// Locates and parses the end of central directory record.
    ///
    /// The record sits at the end of the archive, followed only by the
    /// archive comment, so the search walks backwards over at most the
    /// maximum comment length.
    ///
    /// Returns the record's offset together with the parsed record.
    pub fn locate(data: &[u8]) -> Result<(usize, Self)> {
        if data.len() < END_OF_CENTRAL_DIRECTORY_LEN {
            return Err(Error::corrupt(
                0,
                format!(
                    "{} bytes is too small for a zip archive",
                    data.len()
                ),
            ));
        }

        let lowest = data
            .len()
            .saturating_sub(END_OF_CENTRAL_DIRECTORY_LEN + MAX_COMMENT_LEN);
        let mut pos = data.len() - END_OF_CENTRAL_DIRECTORY_LEN;
        loop {
            // A signature whose comment runs past the end is a false hit inside
            // a longer comment; keep searching.
            if peek_u32(data, pos) == Some(END_OF_CENTRAL_DIRECTORY_SIGNATURE) {
                if let Ok(record) = Self::parse(data, pos) {
                    return Ok((pos, record));
                }
            }
            if pos == lowest {
                break;
            }
            pos -= 1;
        }

        Err(Error::corrupt(
            data.len() as u64,
            "end of central directory record not found",
        ))
    }

    fn parse(data: &[u8], offset: usize) -> Result<Self> {
        let mut r = RecordReader::at(data, offset);
        r.expect_signature(END_OF_CENTRAL_DIRECTORY_SIGNATURE, "end of central directory")?;
        let disk_number = r.read_u16("disk number")?;
        let central_directory_disk = r.read_u16("central directory disk")?;
        let entries_on_disk = r.read_u16("entries on disk")?;
        let total_entries = r.read_u16("total entries")?;
        let central_directory_size = r.read_u32("central directory size")?;
        let central_directory_offset = r.read_u32("central directory offset")?;
        let comment_len = r.read_u16("archive comment length")? as usize;
        let comment = r.read_bytes(comment_len, "archive comment")?.to_vec();

        Ok(Self {
            disk_number,
            central_directory_disk,
            entries_on_disk,
            total_entries,
            central_directory_size,
            central_directory_offset,
            comment,
        })
    }

    /// Writes this record.
    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        write_u32(w, END_OF_CENTRAL_DIRECTORY_SIGNATURE)?;
        write_u16(w, self.disk_number)?;
        write_u16(w, self.central_directory_disk)?;
        write_u16(w, self.entries_on_disk)?;
        write_u16(w, self.total_entries)?;
        write_u32(w, self.central_directory_size)?;
        write_u32(w, self.central_directory_offset)?;
        write_u16(w, len_u16(&self.comment)?)?;
        w.write_all(&self.comment)
    }
}

/// Returns the length of the data descriptor that starts at `pos`.
///
/// The descriptor signature is optional, so a descriptor is either 16 bytes
/// (signature, CRC-32, compressed size, size) or 12 bytes without signature.
pub fn data_descriptor_len(data: &[u8], pos: usize) -> Result<usize> {
    let len = if peek_u32(data, pos) == Some(DATA_DESCRIPTOR_SIGNATURE) {
        16
    } else {
        12
    };
    match pos.checked_add(len) {
        Some(end) if end <= data.len() => Ok(len),
        _ => Err(Error::corrupt(pos as u64, "truncated data descriptor")),
    }
}
