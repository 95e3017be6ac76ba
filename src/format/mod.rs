//! Zip container constants, record definitions, and low-level parsing utilities.
//!
//! Only the subset of the zip application note that document containers
//! actually use is implemented: stored and deflated entries, optional data
//! descriptors and an archive comment. ZIP64, multi-disk archives and
//! encrypted entries are detected and rejected.

pub mod reader;
pub mod records;

/// Local file header signature (`PK\x03\x04`).
pub const LOCAL_FILE_HEADER_SIGNATURE: u32 = 0x0403_4b50;

/// Central directory file header signature (`PK\x01\x02`).
pub const CENTRAL_DIRECTORY_SIGNATURE: u32 = 0x0201_4b50;

/// End of central directory record signature (`PK\x05\x06`).
pub const END_OF_CENTRAL_DIRECTORY_SIGNATURE: u32 = 0x0605_4b50;

/// ZIP64 end of central directory locator signature (`PK\x06\x07`).
pub const ZIP64_LOCATOR_SIGNATURE: u32 = 0x0706_4b50;

/// Optional data descriptor signature (`PK\x07\x08`).
pub const DATA_DESCRIPTOR_SIGNATURE: u32 = 0x0807_4b50;

/// Fixed size of a local file header, without name and extra field.
pub const LOCAL_HEADER_LEN: usize = 30;

/// Fixed size of a central directory header, without variable fields.
pub const CENTRAL_HEADER_LEN: usize = 46;

/// Fixed size of the end of central directory record, without comment.
pub const END_OF_CENTRAL_DIRECTORY_LEN: usize = 22;

/// Size of the ZIP64 end of central directory locator.
pub const ZIP64_LOCATOR_LEN: usize = 20;

/// Maximum archive comment length (the length field is 16 bits).
pub const MAX_COMMENT_LEN: usize = u16::MAX as usize;

/// Marker value used by 32-bit fields when the real value lives in ZIP64 records.
pub const ZIP64_MARKER_U32: u32 = u32::MAX;

/// Marker value used by 16-bit fields when the real value lives in ZIP64 records.
pub const ZIP64_MARKER_U16: u16 = u16::MAX;

/// General purpose bit flags.
pub mod flags {
    /// Entry is encrypted.
    pub const ENCRYPTED: u16 = 0x0001;
    /// CRC-32 and sizes are stored in a data descriptor after the data.
    pub const DATA_DESCRIPTOR: u16 = 0x0008;
    /// Strong encryption.
    pub const STRONG_ENCRYPTION: u16 = 0x0040;
    /// Name and comment are UTF-8.
    pub const UTF8: u16 = 0x0800;
}

/// Compression method identifiers.
pub mod method {
    /// No compression.
    pub const STORED: u16 = 0;
    /// Deflate (RFC 1951).
    pub const DEFLATED: u16 = 8;
}
