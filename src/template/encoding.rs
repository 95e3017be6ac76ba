//! Text encoding detection for textual parts.
//!
//! Detection follows the XML autodetection rules for the encodings a document
//! container can realistically hold: a byte order mark wins, otherwise the
//! first bytes of a UTF-16 `<?` are recognized, otherwise the part is UTF-8.
//! The XML declaration, if any, must agree with what was detected.

use crate::{Error, Result};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
const UTF16LE_BOM: &[u8] = &[0xFF, 0xFE];
const UTF16BE_BOM: &[u8] = &[0xFE, 0xFF];

/// Encoding of a textual part, including whether it starts with a BOM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    /// UTF-8.
    Utf8 {
        /// Content starts with `EF BB BF`.
        bom: bool,
    },
    /// UTF-16, little or big endian.
    Utf16 {
        /// Byte order.
        big_endian: bool,
        /// Content starts with a byte order mark.
        bom: bool,
    },
}

impl TextEncoding {
    /// Detects the encoding from the leading bytes.
    pub fn detect(bytes: &[u8]) -> Self {
        if bytes.starts_with(UTF8_BOM) {
            Self::Utf8 { bom: true }
        } else if bytes.starts_with(UTF16LE_BOM) {
            Self::Utf16 { big_endian: false, bom: true }
        } else if bytes.starts_with(UTF16BE_BOM) {
            Self::Utf16 { big_endian: true, bom: true }
        } else if bytes.starts_with(&[b'<', 0, b'?', 0]) {
            Self::Utf16 { big_endian: false, bom: false }
        } else if bytes.starts_with(&[0, b'<', 0, b'?']) {
            Self::Utf16 { big_endian: true, bom: false }
        } else {
            Self::Utf8 { bom: false }
        }
    }

    fn bom(self) -> &'static [u8] {
        match self {
            Self::Utf8 { bom: true } => UTF8_BOM,
            Self::Utf16 { big_endian: false, bom: true } => UTF16LE_BOM,
            Self::Utf16 { big_endian: true, bom: true } => UTF16BE_BOM,
            _ => &[],
        }
    }

    fn accepts_declared(self, declared: &str) -> bool {
        let declared = declared.to_ascii_lowercase();
        match self {
            Self::Utf8 { .. } => matches!(declared.as_str(), "utf-8" | "utf8"),
            Self::Utf16 { big_endian, .. } => {
                declared == "utf-16"
                    || (declared == "utf-16le" && !big_endian)
                    || (declared == "utf-16be" && big_endian)
            }
        }
    }

    /// Decodes `bytes` (BOM included) into text without the BOM.
    ///
    /// `part` is only used for error messages.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PartDecode`] if the bytes are not valid in the
    /// detected encoding or the XML declaration names a different encoding.
    pub fn decode(self, part: &str, bytes: &[u8]) -> Result<String> {
        let body = &bytes[self.bom().len()..];
        let text = match self {
            Self::Utf8 { .. } => match std::str::from_utf8(body) {
                Ok(text) => text.to_string(),
                Err(e) => {
                    return Err(decode_error(
                        part,
                        format!("invalid UTF-8 at byte {}", e.valid_up_to() + self.bom().len()),
                    ));
                }
            },
            Self::Utf16 { big_endian, .. } => {
                if body.len() % 2 != 0 {
                    return Err(decode_error(part, "odd number of bytes in UTF-16 text"));
                }
                let units = body.chunks_exact(2).map(|pair| {
                    let pair = [pair[0], pair[1]];
                    if big_endian {
                        u16::from_be_bytes(pair)
                    } else {
                        u16::from_le_bytes(pair)
                    }
                });
                char::decode_utf16(units)
                    .collect::<std::result::Result<String, _>>()
                    .map_err(|e| {
                        decode_error(
                            part,
                            format!("unpaired surrogate {:#06x} in UTF-16 text", e.unpaired_surrogate()),
                        )
                    })?
            }
        };

        if let Some(declared) = declared_encoding(&text) {
            if !self.accepts_declared(declared) {
                return Err(decode_error(
                    part,
                    format!("XML declaration names unsupported encoding '{declared}'"),
                ));
            }
        }
        Ok(text)
    }

    /// Encodes `text` back, restoring the BOM if the original had one.
    pub fn encode(self, text: &str) -> Vec<u8> {
        let bom = self.bom();
        match self {
            Self::Utf8 { .. } => {
                let mut out = Vec::with_capacity(bom.len() + text.len());
                out.extend_from_slice(bom);
                out.extend_from_slice(text.as_bytes());
                out
            }
            Self::Utf16 { big_endian, .. } => {
                let mut out = Vec::with_capacity(bom.len() + text.len() * 2);
                out.extend_from_slice(bom);
                for unit in text.encode_utf16() {
                    let pair = if big_endian {
                        unit.to_be_bytes()
                    } else {
                        unit.to_le_bytes()
                    };
                    out.extend_from_slice(&pair);
                }
                out
            }
        }
    }
}

fn decode_error(part: &str, reason: impl Into<String>) -> Error {
    Error::PartDecode {
        part: part.to_string(),
        reason: reason.into(),
    }
}

/// Returns the `encoding` pseudo-attribute of a leading XML declaration.
pub fn declared_encoding(text: &str) -> Option<&str> {
    let decl = text.strip_prefix("<?xml")?;
    if !decl.starts_with(|c: char| c.is_ascii_whitespace()) {
        return None;
    }
    let decl = &decl[..decl.find("?>")?];
    let after = &decl[decl.find("encoding")? + "encoding".len()..];
    let after = after.trim_start().strip_prefix('=')?.trim_start();
    let quote = after.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let value = &after[1..];
    Some(&value[..value.find(quote)?])
}
