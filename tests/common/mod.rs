//! Shared test utilities for integration tests.
//!
//! Fixtures are built with the `zip` crate so that the reader and writer are
//! always checked against an independent implementation. Streamed archives
//! with data descriptors are laid out by hand, since `zip` only writes them
//! for unseekable sinks.
//!
//! Note: `#![allow(dead_code)]` is required because each integration test file
//! compiles as a separate crate and may only use a subset of these helpers.

#![allow(dead_code)]

use std::io::{Cursor, Read, Write};

use slidefill::TemplateMapping;
use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

pub const STORED: CompressionMethod = CompressionMethod::Stored;
pub const DEFLATED: CompressionMethod = CompressionMethod::Deflated;

/// A tiny but valid PNG signature plus junk, with placeholder-looking bytes
/// that must never be touched.
pub const FAKE_PNG: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR{{client_name}}\xff\xfe\x00";

/// Builds a zip archive from `(name, data, method)` entries, in order.
pub fn build_zip(entries: &[(&str, &[u8], CompressionMethod)]) -> Vec<u8> {
    build_zip_with_comment(entries, "")
}

/// Builds a zip archive with an archive comment.
pub fn build_zip_with_comment(entries: &[(&str, &[u8], CompressionMethod)], comment: &str) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, data, method) in entries {
        let options = SimpleFileOptions::default().compression_method(*method);
        writer.start_file(*name, options).expect("start_file");
        writer.write_all(data).expect("write entry");
    }
    if !comment.is_empty() {
        writer.set_comment(comment);
    }
    writer.finish().expect("finish zip").into_inner()
}

pub const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="png" ContentType="image/png"/><Default Extension="xml" ContentType="application/xml"/></Types>"#;

pub const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="ppt/presentation.xml"/></Relationships>"#;

pub const SLIDE1: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld><p:spTree><p:sp><p:txBody><a:p><a:r><a:t>Dear {{client_name}},</a:t></a:r></a:p><a:p><a:r><a:t>Date: {{project_date}}</a:t></a:r></a:p></p:txBody></p:sp></p:spTree></p:cSld></p:sld>"#;

pub const SLIDE2: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld name="{{client_name}} offer"><p:spTree><p:sp><p:txBody><a:p><a:r><a:t>Offer value: {{offer_value}} HUF</a:t></a:r></a:p></p:txBody></p:sp></p:spTree></p:cSld></p:sld>"#;

pub const SLIDE3: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld><p:spTree><p:sp><p:txBody><a:p><a:r><a:t>Thank you</a:t></a:r></a:p></p:txBody></p:sp></p:spTree></p:cSld></p:sld>"#;

pub const CORE_PROPS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/"><dc:title>{{client_name}} - Offer</dc:title><dc:creator>{{author}}</dc:creator></cp:coreProperties>"#;

/// Entry names of [`sample_deck`], in order.
pub const DECK_NAMES: &[&str] = &[
    "[Content_Types].xml",
    "_rels/.rels",
    "ppt/slides/slide1.xml",
    "ppt/slides/slide2.xml",
    "ppt/slides/slide3.xml",
    "ppt/media/image1.png",
    "docProps/core.xml",
    "docProps/thumbnail.jpeg",
];

/// A slide-deck shaped template with a mix of textual and binary parts and
/// a mix of stored and deflated entries.
pub fn sample_deck() -> Vec<u8> {
    build_zip_with_comment(
        &[
            ("[Content_Types].xml", CONTENT_TYPES.as_bytes(), DEFLATED),
            ("_rels/.rels", ROOT_RELS.as_bytes(), DEFLATED),
            ("ppt/slides/slide1.xml", SLIDE1.as_bytes(), DEFLATED),
            ("ppt/slides/slide2.xml", SLIDE2.as_bytes(), STORED),
            ("ppt/slides/slide3.xml", SLIDE3.as_bytes(), DEFLATED),
            ("ppt/media/image1.png", FAKE_PNG, STORED),
            ("docProps/core.xml", CORE_PROPS.as_bytes(), DEFLATED),
            ("docProps/thumbnail.jpeg", b"\xff\xd8\xff\xe0{{author}}", DEFLATED),
        ],
        "template v3",
    )
}

/// The template without any placeholders.
pub fn plain_deck() -> Vec<u8> {
    build_zip(&[
        ("[Content_Types].xml", CONTENT_TYPES.as_bytes(), DEFLATED),
        ("_rels/.rels", ROOT_RELS.as_bytes(), DEFLATED),
        ("ppt/slides/slide3.xml", SLIDE3.as_bytes(), STORED),
        ("ppt/media/image1.png", b"\x89PNG\r\n\x1a\n", STORED),
    ])
}

/// The full mapping for [`sample_deck`].
pub fn full_mapping() -> TemplateMapping {
    mapping(&[
        ("client_name", "Acme Ltd."),
        ("project_date", "2026-02-11"),
        ("offer_value", "10 000 000"),
        ("author", "Sales Team"),
    ])
}

/// Builds a mapping from pairs.
pub fn mapping(pairs: &[(&str, &str)]) -> TemplateMapping {
    TemplateMapping::try_from_pairs(pairs.iter().copied()).expect("valid mapping")
}

/// Entry names in archive order, read with the `zip` crate.
pub fn entry_names(bytes: &[u8]) -> Vec<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("valid zip");
    (0..archive.len())
        .map(|i| archive.by_index_raw(i).expect("entry").name().to_string())
        .collect()
}

/// Compression methods in archive order, read with the `zip` crate.
pub fn entry_methods(bytes: &[u8]) -> Vec<CompressionMethod> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("valid zip");
    (0..archive.len())
        .map(|i| archive.by_index_raw(i).expect("entry").compression())
        .collect()
}

/// Decompressed content of an entry, read with the `zip` crate.
pub fn read_entry(bytes: &[u8], name: &str) -> Vec<u8> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("valid zip");
    let mut file = archive.by_name(name).expect("entry exists");
    let mut data = Vec::new();
    file.read_to_end(&mut data).expect("read entry");
    data
}

/// Decompressed content of an entry as UTF-8 text.
pub fn read_text(bytes: &[u8], name: &str) -> String {
    String::from_utf8(read_entry(bytes, name)).expect("utf-8 entry")
}

/// Returns true if `xml` parses and every text node and attribute value
/// unescapes cleanly.
pub fn is_well_formed(xml: &str) -> bool {
    use quick_xml::events::Event;

    let mut reader = quick_xml::Reader::from_str(xml);
    let mut depth = 0usize;
    loop {
        match reader.read_event() {
            Ok(Event::Eof) => return depth == 0,
            Ok(Event::Start(start)) => {
                depth += 1;
                if start.attributes().any(|a| a.map_or(true, |a| a.unescape_value().is_err())) {
                    return false;
                }
            }
            Ok(Event::Empty(empty)) => {
                if empty.attributes().any(|a| a.map_or(true, |a| a.unescape_value().is_err())) {
                    return false;
                }
            }
            Ok(Event::End(_)) => {
                if depth == 0 {
                    return false;
                }
                depth -= 1;
            }
            Ok(Event::Text(text)) => {
                if text.unescape().is_err() {
                    return false;
                }
            }
            Ok(_) => {}
            Err(_) => return false,
        }
    }
}

/// Data descriptor layout of a streamed entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Descriptor {
    /// `PK\x07\x08`, CRC-32, compressed size, size (16 bytes).
    Signed,
    /// CRC-32, compressed size, size (12 bytes).
    Unsigned,
}

/// Builds an archive the way streaming writers do: every local header has
/// bit 3 set with zero CRC and sizes, and the real values follow the data
/// in a descriptor. Only the central directory carries them up front.
pub fn build_streamed_zip(entries: &[(&str, &[u8], CompressionMethod, Descriptor)]) -> Vec<u8> {
    const FLAGS: u16 = 0x0008;
    let mut out = Vec::new();
    let mut central = Vec::new();

    for (name, data, method, descriptor) in entries {
        let (method_id, payload) = if *method == DEFLATED {
            let mut encoder =
                flate2::write::DeflateEncoder::new(Vec::new(), flate2::Compression::default());
            encoder.write_all(data).expect("deflate");
            (8u16, encoder.finish().expect("deflate"))
        } else {
            (0u16, data.to_vec())
        };
        let crc = crc32fast::hash(data);
        let offset = out.len() as u32;

        out.extend_from_slice(&0x0403_4b50u32.to_le_bytes());
        out.extend_from_slice(&20u16.to_le_bytes());
        out.extend_from_slice(&FLAGS.to_le_bytes());
        out.extend_from_slice(&method_id.to_le_bytes());
        out.extend_from_slice(&[0, 0, 0x21, 0]);
        out.extend_from_slice(&[0; 12]);
        out.extend_from_slice(&(name.len() as u16).to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(name.as_bytes());
        out.extend_from_slice(&payload);
        if *descriptor == Descriptor::Signed {
            out.extend_from_slice(&0x0807_4b50u32.to_le_bytes());
        }
        out.extend_from_slice(&crc.to_le_bytes());
        out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        out.extend_from_slice(&(data.len() as u32).to_le_bytes());

        central.extend_from_slice(&0x0201_4b50u32.to_le_bytes());
        central.extend_from_slice(&20u16.to_le_bytes());
        central.extend_from_slice(&20u16.to_le_bytes());
        central.extend_from_slice(&FLAGS.to_le_bytes());
        central.extend_from_slice(&method_id.to_le_bytes());
        central.extend_from_slice(&[0, 0, 0x21, 0]);
        central.extend_from_slice(&crc.to_le_bytes());
        central.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        central.extend_from_slice(&(data.len() as u32).to_le_bytes());
        central.extend_from_slice(&(name.len() as u16).to_le_bytes());
        central.extend_from_slice(&[0; 12]);
        central.extend_from_slice(&offset.to_le_bytes());
        central.extend_from_slice(name.as_bytes());
    }

    let cd_offset = out.len() as u32;
    out.extend_from_slice(&central);
    out.extend_from_slice(&0x0605_4b50u32.to_le_bytes());
    out.extend_from_slice(&[0; 4]);
    out.extend_from_slice(&(entries.len() as u16).to_le_bytes());
    out.extend_from_slice(&(entries.len() as u16).to_le_bytes());
    out.extend_from_slice(&(central.len() as u32).to_le_bytes());
    out.extend_from_slice(&cd_offset.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out
}

/// Raw view of one entry of a comment-less archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    /// General purpose flags in the local header.
    pub local_flags: u16,
    /// General purpose flags in the central directory header.
    pub central_flags: u16,
    /// CRC-32 in the local header.
    pub local_crc: u32,
    /// The whole local record: header, data and descriptor, if any.
    pub record: Vec<u8>,
}

fn le16(b: &[u8], pos: usize) -> usize {
    u16::from_le_bytes([b[pos], b[pos + 1]]) as usize
}

fn le32(b: &[u8], pos: usize) -> usize {
    u32::from_le_bytes([b[pos], b[pos + 1], b[pos + 2], b[pos + 3]]) as usize
}

/// Walks the central directory of a comment-less archive to find `name`.
pub fn raw_entry(bytes: &[u8], name: &str) -> RawEntry {
    let eocd = bytes.len() - 22;
    let entries = le16(bytes, eocd + 10);
    let mut pos = le32(bytes, eocd + 16);
    for _ in 0..entries {
        let name_len = le16(bytes, pos + 28);
        let next = pos + 46 + name_len + le16(bytes, pos + 30) + le16(bytes, pos + 32);
        if &bytes[pos + 46..pos + 46 + name_len] == name.as_bytes() {
            let central_flags = le16(bytes, pos + 8) as u16;
            let compressed = le32(bytes, pos + 20);
            let local = le32(bytes, pos + 42);
            let local_flags = le16(bytes, local + 6) as u16;
            let data_end = local + 30 + le16(bytes, local + 26) + le16(bytes, local + 28) + compressed;
            let end = if local_flags & 0x0008 == 0 {
                data_end
            } else if le32(bytes, data_end) == 0x0807_4b50 {
                data_end + 16
            } else {
                data_end + 12
            };
            return RawEntry {
                local_flags,
                central_flags,
                local_crc: le32(bytes, local + 14) as u32,
                record: bytes[local..end].to_vec(),
            };
        }
        pos = next;
    }
    panic!("entry '{name}' not found");
}
