//! Tests for malformed and unsupported template handling.
//!
//! Every case must fail with a typed error and never produce output.

mod common;

use common::*;
use slidefill::{Archive, Error, Pipeline};

const EOCD_LEN: usize = 22;

fn u16_at(bytes: &[u8], pos: usize) -> usize {
    u16::from_le_bytes([bytes[pos], bytes[pos + 1]]) as usize
}

fn u32_at(bytes: &[u8], pos: usize) -> usize {
    u32::from_le_bytes([bytes[pos], bytes[pos + 1], bytes[pos + 2], bytes[pos + 3]]) as usize
}

/// Offset of the end of central directory record of a comment-less archive.
fn eocd_offset(bytes: &[u8]) -> usize {
    bytes.len() - EOCD_LEN
}

/// Offsets of the central directory header and local header of entry `index`.
fn header_offsets(bytes: &[u8], index: usize) -> (usize, usize) {
    let mut pos = u32_at(bytes, eocd_offset(bytes) + 16);
    for _ in 0..index {
        pos += 46 + u16_at(bytes, pos + 28) + u16_at(bytes, pos + 30) + u16_at(bytes, pos + 32);
    }
    (pos, u32_at(bytes, pos + 42))
}

fn two_slides() -> Vec<u8> {
    build_zip(&[
        ("ppt/slides/slide1.xml", b"<a>{{client_name}}</a>", STORED),
        ("ppt/slides/slide2.xml", b"<a>{{author}}</a>", STORED),
    ])
}

fn expect_err(bytes: &[u8]) -> Error {
    Pipeline::default()
        .generate(bytes, &full_mapping())
        .expect_err("malformed template must be rejected")
}

// =============================================================================
// Container structure
// =============================================================================

#[test]
fn test_empty_input() {
    assert!(matches!(expect_err(&[]), Error::ArchiveCorrupt { .. }));
}

#[test]
fn test_not_a_zip() {
    let bytes = b"<p:sld>{{client_name}}</p:sld>".repeat(4);
    assert!(matches!(expect_err(&bytes), Error::ArchiveCorrupt { .. }));
}

#[test]
fn test_truncated_archive() {
    let bytes = sample_deck();
    for len in [bytes.len() / 2, bytes.len() - 5, 10] {
        let err = expect_err(&bytes[..len]);
        assert!(matches!(err, Error::ArchiveCorrupt { .. }), "len {len}: {err:?}");
    }
}

#[test]
fn test_bad_local_signature() {
    let mut bytes = two_slides();
    bytes[0..4].copy_from_slice(b"XXXX");
    let err = expect_err(&bytes);
    assert!(matches!(err, Error::ArchiveCorrupt { offset: 0, .. }), "{err:?}");
}

#[test]
fn test_central_directory_out_of_bounds() {
    let mut bytes = two_slides();
    let eocd = eocd_offset(&bytes);
    let oversized = (bytes.len() as u32).to_le_bytes();
    bytes[eocd + 12..eocd + 16].copy_from_slice(&oversized);
    assert!(matches!(expect_err(&bytes), Error::ArchiveCorrupt { .. }));
}

#[test]
fn test_duplicate_part_names() {
    // The zip crate refuses duplicates, so rename the second entry in place.
    let bytes = two_slides();
    let needle = b"slide2.xml";
    let mut patched = bytes.clone();
    let mut i = 0;
    while i + needle.len() <= patched.len() {
        if &patched[i..i + needle.len()] == needle {
            patched[i..i + needle.len()].copy_from_slice(b"slide1.xml");
        }
        i += 1;
    }
    assert_ne!(patched, bytes);

    let err = Archive::open(&patched).unwrap_err();
    match err {
        Error::ArchiveCorrupt { reason, .. } => assert!(reason.contains("duplicate"), "{reason}"),
        other => panic!("unexpected error: {other:?}"),
    }
}

// =============================================================================
// Unsupported features
// =============================================================================

#[test]
fn test_encrypted_entry_rejected() {
    let mut bytes = two_slides();
    let (central, local) = header_offsets(&bytes, 1);
    bytes[central + 8] |= 0x01;
    bytes[local + 6] |= 0x01;
    assert!(matches!(
        expect_err(&bytes),
        Error::UnsupportedFeature {
            feature: "encrypted entries"
        }
    ));
}

#[test]
fn test_zip64_marker_rejected() {
    let mut bytes = two_slides();
    let eocd = eocd_offset(&bytes);
    bytes[eocd + 10..eocd + 12].copy_from_slice(&[0xFF, 0xFF]);
    bytes[eocd + 8..eocd + 10].copy_from_slice(&[0xFF, 0xFF]);
    assert!(matches!(
        expect_err(&bytes),
        Error::UnsupportedFeature { feature: "ZIP64" }
    ));
}

#[test]
fn test_multi_disk_rejected() {
    let mut bytes = two_slides();
    let eocd = eocd_offset(&bytes);
    bytes[eocd + 4] = 1;
    assert!(matches!(
        expect_err(&bytes),
        Error::UnsupportedFeature {
            feature: "multi-disk archive"
        }
    ));
}

#[test]
fn test_unknown_method_on_textual_part() {
    let mut bytes = two_slides();
    let (central, local) = header_offsets(&bytes, 0);
    bytes[central + 10] = 12;
    bytes[local + 8] = 12;
    match expect_err(&bytes) {
        Error::UnsupportedMethod { part, method } => {
            assert_eq!(part, "ppt/slides/slide1.xml");
            assert_eq!(method, 12);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_unknown_method_on_binary_part_passes_through() {
    let mut bytes = build_zip(&[
        ("ppt/slides/slide1.xml", b"<a>{{client_name}}</a>", STORED),
        ("ppt/media/image1.emf", b"EMF opaque bytes", STORED),
    ]);
    let (central, local) = header_offsets(&bytes, 1);
    bytes[central + 10] = 12;
    bytes[local + 8] = 12;

    let generated = Pipeline::default()
        .generate(&bytes, &full_mapping())
        .unwrap();
    let archive = Archive::open(&generated.bytes).unwrap();
    let image = archive.part("ppt/media/image1.emf").unwrap();
    assert_eq!(image.compression().method_id(), 12);
    assert_eq!(image.payload(), b"EMF opaque bytes");
}

// =============================================================================
// Part content
// =============================================================================

#[test]
fn test_crc_mismatch_on_textual_part() {
    let mut bytes = two_slides();
    let (central, _) = header_offsets(&bytes, 1);
    bytes[central + 16] ^= 0xFF;
    match expect_err(&bytes) {
        Error::ArchiveCorrupt { reason, .. } => {
            assert!(reason.contains("CRC mismatch"), "{reason}");
            assert!(reason.contains("slide2.xml"), "{reason}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_corrupt_deflate_stream() {
    let body = "<p:sld>{{client_name}}</p:sld>".repeat(50);
    let mut bytes = build_zip(&[("ppt/slides/slide1.xml", body.as_bytes(), DEFLATED)]);
    let (_, local) = header_offsets(&bytes, 0);
    let data_start = local + 30 + u16_at(&bytes, local + 26) + u16_at(&bytes, local + 28);
    for b in &mut bytes[data_start..data_start + 4] {
        *b = 0xFF;
    }
    assert!(matches!(expect_err(&bytes), Error::ArchiveCorrupt { .. }));
}

#[test]
fn test_invalid_utf8_textual_part() {
    let bytes = build_zip(&[("ppt/slides/slide1.xml", b"<a>\xC3\x28{{client_name}}</a>", STORED)]);
    match expect_err(&bytes) {
        Error::PartDecode { part, reason } => {
            assert_eq!(part, "ppt/slides/slide1.xml");
            assert!(reason.contains("UTF-8"), "{reason}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_declared_encoding_mismatch() {
    let bytes = build_zip(&[(
        "ppt/slides/slide1.xml",
        b"<?xml version=\"1.0\" encoding=\"windows-1252\"?><a>{{client_name}}</a>",
        STORED,
    )]);
    assert!(matches!(expect_err(&bytes), Error::PartDecode { .. }));
}

#[test]
fn test_corrupt_template_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let template = dir.path().join("broken.pptx");
    let mut bytes = two_slides();
    bytes.truncate(bytes.len() - 3);
    std::fs::write(&template, &bytes).unwrap();
    let dest = dir.path().join("out.pptx");

    let config = slidefill::GenerationConfig::new(&template, full_mapping(), &dest);
    assert!(Pipeline::default().run(&config).is_err());
    assert!(!dest.exists());
}
