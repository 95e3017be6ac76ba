//! Opening a container and enumerating its parts.

use std::collections::HashSet;
use std::path::Path;

use super::ArchivePart;
use crate::codec::Compression;
use crate::format::reader::{RecordReader, peek_u32};
use crate::format::records::{
    CentralHeader, EndOfCentralDirectory, LocalHeader, data_descriptor_len,
};
use crate::format::{
    ZIP64_LOCATOR_LEN, ZIP64_LOCATOR_SIGNATURE, ZIP64_MARKER_U16, ZIP64_MARKER_U32, flags,
};
use crate::{Error, PartPath, Result};

/// An opened zip container: its parts in central-directory order plus the
/// archive comment.
///
/// # Example
///
/// ```rust,no_run
/// use slidefill::Archive;
///
/// let archive = Archive::open_path("seed.pptx")?;
/// for part in archive.parts() {
///     println!("{:>4} {:<9} {}", part.original_index(), part.compression(), part.path());
/// }
/// # Ok::<(), slidefill::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Archive {
    parts: Vec<ArchivePart>,
    comment: Vec<u8>,
}

impl Archive {
    /// Opens a container from its bytes.
    ///
    /// The parts are read eagerly (stored bytes only; nothing is inflated)
    /// and kept in the exact order of the central directory.
    ///
    /// # Errors
    ///
    /// - [`Error::ArchiveCorrupt`] if the bytes are not a valid zip container
    ///   or two parts share a name
    /// - [`Error::UnsupportedFeature`] for encrypted entries, ZIP64 or
    ///   multi-disk archives
    pub fn open(data: &[u8]) -> Result<Self> {
        let (eocd_pos, eocd) = EndOfCentralDirectory::locate(data)?;

        if eocd_pos >= ZIP64_LOCATOR_LEN
            && peek_u32(data, eocd_pos - ZIP64_LOCATOR_LEN) == Some(ZIP64_LOCATOR_SIGNATURE)
        {
            return Err(Error::UnsupportedFeature { feature: "ZIP64" });
        }
        if eocd.total_entries == ZIP64_MARKER_U16
            || eocd.central_directory_size == ZIP64_MARKER_U32
            || eocd.central_directory_offset == ZIP64_MARKER_U32
        {
            return Err(Error::UnsupportedFeature { feature: "ZIP64" });
        }
        if eocd.disk_number != 0
            || eocd.central_directory_disk != 0
            || eocd.entries_on_disk != eocd.total_entries
        {
            return Err(Error::UnsupportedFeature {
                feature: "multi-disk archive",
            });
        }

        let cd_start = eocd.central_directory_offset as usize;
        let cd_end = cd_start + eocd.central_directory_size as usize;
        if cd_end > eocd_pos {
            return Err(Error::corrupt(
                eocd_pos as u64,
                format!(
                    "central directory ({} bytes at {:#x}) overlaps its end record",
                    eocd.central_directory_size, cd_start
                ),
            ));
        }

        let mut reader = RecordReader::at(data, cd_start);
        let mut parts = Vec::with_capacity(eocd.total_entries as usize);
        let mut seen = HashSet::with_capacity(eocd.total_entries as usize);

        for index in 0..eocd.total_entries as usize {
            let header_offset = reader.position();
            let central = CentralHeader::parse(&mut reader)?;
            if reader.position() > cd_end {
                return Err(Error::corrupt(
                    header_offset as u64,
                    "central directory header runs past the directory",
                ));
            }

            let part = read_part(data, index, central, header_offset, cd_start)?;
            if !seen.insert(part.path.as_str().to_string()) {
                return Err(Error::corrupt(
                    header_offset as u64,
                    format!("duplicate part '{}'", part.path),
                ));
            }
            parts.push(part);
        }

        log::debug!(
            "opened archive: {} parts, {} byte comment",
            parts.len(),
            eocd.comment.len()
        );

        Ok(Self {
            parts,
            comment: eocd.comment,
        })
    }

    /// Reads a container file from disk and opens it.
    pub fn open_path(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read(path.as_ref())?;
        Self::open(&data)
    }

    /// Returns the parts in original order.
    pub fn parts(&self) -> &[ArchivePart] {
        &self.parts
    }

    /// Returns the number of parts.
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Returns true if the container has no parts.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Looks up a part by path.
    pub fn part(&self, path: &str) -> Option<&ArchivePart> {
        self.parts.iter().find(|p| p.path.as_str() == path)
    }

    /// Returns the raw archive comment.
    pub fn comment(&self) -> &[u8] {
        &self.comment
    }
}

fn decode_name(raw: &[u8]) -> String {
    // Names without the UTF-8 flag are nominally CP437, but every producer
    // of document containers writes ASCII or UTF-8.
    String::from_utf8_lossy(raw).into_owned()
}

fn read_part(
    data: &[u8],
    index: usize,
    central: CentralHeader,
    header_offset: usize,
    cd_start: usize,
) -> Result<ArchivePart> {
    if central.flags & (flags::ENCRYPTED | flags::STRONG_ENCRYPTION) != 0 {
        return Err(Error::UnsupportedFeature {
            feature: "encrypted entries",
        });
    }
    if central.compressed_size == ZIP64_MARKER_U32
        || central.uncompressed_size == ZIP64_MARKER_U32
        || central.local_header_offset == ZIP64_MARKER_U32
    {
        return Err(Error::UnsupportedFeature { feature: "ZIP64" });
    }

    let name = decode_name(&central.name);
    let path = PartPath::new(&name).map_err(|e| Error::corrupt(header_offset as u64, e.to_string()))?;

    let local_offset = central.local_header_offset as usize;
    if local_offset >= cd_start {
        return Err(Error::corrupt(
            header_offset as u64,
            format!("part '{path}' points into the central directory"),
        ));
    }
    let local = LocalHeader::parse(data, local_offset)?;

    let data_start = local_offset + local.encoded_len();
    let data_end = data_start + central.compressed_size as usize;
    if data_end > cd_start {
        return Err(Error::corrupt(
            data_start as u64,
            format!("data of part '{path}' runs into the central directory"),
        ));
    }
    let payload = data[data_start..data_end].to_vec();

    let descriptor = if local.flags & flags::DATA_DESCRIPTOR != 0 {
        let len = data_descriptor_len(data, data_end)?;
        if data_end + len > cd_start {
            return Err(Error::corrupt(
                data_end as u64,
                format!("data descriptor of part '{path}' runs into the central directory"),
            ));
        }
        Some(data[data_end..data_end + len].to_vec())
    } else {
        None
    };

    Ok(ArchivePart {
        path,
        original_index: index,
        compression: Compression::from_method(central.method),
        central,
        local,
        data_offset: data_start as u64,
        payload,
        descriptor,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    fn fixture(names: &[&str]) -> Vec<u8> {
        use zip::write::SimpleFileOptions;
        let mut w = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (i, name) in names.iter().enumerate() {
            let method = if i % 2 == 0 {
                zip::CompressionMethod::Stored
            } else {
                zip::CompressionMethod::Deflated
            };
            w.start_file(*name, SimpleFileOptions::default().compression_method(method))
                .unwrap();
            w.write_all(format!("<p>{name}</p>").as_bytes()).unwrap();
        }
        w.set_comment("deck");
        w.finish().unwrap().into_inner()
    }

    #[test]
    fn test_open_keeps_directory_order() {
        let names = ["z.xml", "a.xml", "m/b.rels", "m/a.png"];
        let archive = Archive::open(&fixture(&names)).unwrap();

        let opened: Vec<_> = archive.parts().iter().map(|p| p.path().as_str()).collect();
        assert_eq!(opened, names);
        for (i, part) in archive.parts().iter().enumerate() {
            assert_eq!(part.original_index(), i);
        }
        assert_eq!(archive.comment(), b"deck");
    }

    #[test]
    fn test_methods_and_contents() {
        let archive = Archive::open(&fixture(&["a.xml", "b.xml"])).unwrap();
        let a = archive.part("a.xml").unwrap();
        let b = archive.part("b.xml").unwrap();

        assert_eq!(a.compression(), Compression::Stored);
        assert_eq!(b.compression(), Compression::Deflated);
        assert_eq!(a.payload(), b"<p>a.xml</p>");
        assert_eq!(b.contents().unwrap(), b"<p>b.xml</p>");
        assert_eq!(b.size(), 12);
        assert!(archive.part("c.xml").is_none());
    }

    #[test]
    fn test_empty_archive() {
        let mut eocd = vec![0x50, 0x4b, 0x05, 0x06];
        eocd.extend_from_slice(&[0; 18]);
        let archive = Archive::open(&eocd).unwrap();
        assert!(archive.is_empty());
        assert!(archive.comment().is_empty());
    }

    #[test]
    fn test_missing_end_record() {
        let err = Archive::open(b"PK\x03\x04 nothing else").unwrap_err();
        assert!(matches!(err, Error::ArchiveCorrupt { .. }));
    }

    #[test]
    fn test_invalid_part_name_is_corrupt() {
        let bytes = fixture(&["ok.xml"]);
        let patched: Vec<u8> = {
            let mut b = bytes.clone();
            let needle = b"ok.xml";
            let mut i = 0;
            while i + needle.len() <= b.len() {
                if &b[i..i + needle.len()] == needle {
                    b[i..i + needle.len()].copy_from_slice(b"/k.xml");
                }
                i += 1;
            }
            b
        };
        let err = Archive::open(&patched).unwrap_err();
        assert!(matches!(err, Error::ArchiveCorrupt { .. }), "{err:?}");
    }
}
