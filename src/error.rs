//! Error types for template generation.
//!
//! This module provides the [`Error`] enum which represents all possible
//! failure modes when reading a template archive, substituting placeholders
//! and writing the generated document, along with a convenient
//! [`Result<T>`] type alias.
//!
//! # Error Handling
//!
//! Every failure aborts the whole generation run: a half-rewritten document
//! container is never emitted. Callers usually only need to tell apart a bad
//! template, a bad mapping and a storage problem:
//!
//! ```rust
//! use slidefill::Error;
//!
//! fn describe(error: &Error) -> &'static str {
//!     match error {
//!         Error::ArchiveCorrupt { .. }
//!         | Error::UnsupportedFeature { .. }
//!         | Error::UnsupportedMethod { .. }
//!         | Error::InvalidPartPath(_)
//!         | Error::PartDecode { .. } => "the template document is unusable",
//!         Error::UnresolvedPlaceholder { .. } | Error::XmlEscape { .. } => {
//!             "the metadata does not fit the template"
//!         }
//!         Error::InvalidMapping(_) | Error::Json(_) => "the metadata is malformed",
//!         Error::WriteFailure { .. } | Error::Io(_) => "storage error",
//!         _ => "unexpected error",
//!     }
//! }
//! ```

use std::io;
use std::path::PathBuf;

/// Helper struct for formatting WriteFailure error messages.
struct WriteFailureDisplay<'a> {
    path: Option<&'a std::path::Path>,
    source: &'a io::Error,
}

impl std::fmt::Display for WriteFailureDisplay<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Write failed")?;
        if let Some(path) = self.path {
            write!(f, " for '{}'", path.display())?;
        }
        write!(f, ": {}", self.source)
    }
}

/// The main error type for template generation.
///
/// # Error Categories
///
/// | Category | Variants | Typical Cause |
/// |----------|----------|---------------|
/// | I/O | [`Io`][Self::Io], [`WriteFailure`][Self::WriteFailure] | File system operations |
/// | Container | [`ArchiveCorrupt`][Self::ArchiveCorrupt], [`UnsupportedFeature`][Self::UnsupportedFeature], [`UnsupportedMethod`][Self::UnsupportedMethod], [`InvalidPartPath`][Self::InvalidPartPath] | Invalid template archive |
/// | Content | [`PartDecode`][Self::PartDecode], [`XmlEscape`][Self::XmlEscape] | Textual part or value cannot be handled |
/// | Metadata | [`UnresolvedPlaceholder`][Self::UnresolvedPlaceholder], [`InvalidMapping`][Self::InvalidMapping], [`Json`][Self::Json] | Mapping does not match the template |
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// An I/O error occurred while reading an input file.
    ///
    /// Errors while producing the output are reported as
    /// [`WriteFailure`][Self::WriteFailure] instead.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input is not a valid zip container.
    ///
    /// Raised for a missing end-of-central-directory record, a central
    /// directory pointing outside the file, bad record signatures, truncated
    /// entries, duplicate part names or a CRC mismatch when inflating a part.
    /// No output is produced.
    #[error("Corrupt archive at offset {offset:#x}: {reason}")]
    ArchiveCorrupt {
        /// The byte offset where the problem was detected.
        offset: u64,
        /// A description of the problem.
        reason: String,
    },

    /// The container uses a zip feature this crate deliberately does not handle.
    ///
    /// Encrypted entries, ZIP64 records and multi-disk archives fall here.
    #[error("Unsupported feature: {feature}")]
    UnsupportedFeature {
        /// The name of the unsupported feature.
        feature: &'static str,
    },

    /// A part that must be decoded uses a compression method other than
    /// stored or deflated.
    ///
    /// Binary parts with such methods are still copied through untouched.
    #[error("Unsupported compression method {method} for part '{part}'")]
    UnsupportedMethod {
        /// The part path.
        part: String,
        /// The raw zip method identifier.
        method: u16,
    },

    /// A part name is not a usable path.
    #[error("Invalid part path: {0}")]
    InvalidPartPath(String),

    /// A part classified as textual could not be decoded as text.
    #[error("Cannot decode part '{part}' as text: {reason}")]
    PartDecode {
        /// The part path.
        part: String,
        /// Why decoding failed.
        reason: String,
    },

    /// A placeholder has no value in the mapping.
    ///
    /// Only raised under [`UnresolvedPolicy::Strict`]; the default
    /// [`UnresolvedPolicy::Passthrough`] records the placeholder in the
    /// report instead.
    ///
    /// [`UnresolvedPolicy::Strict`]: crate::UnresolvedPolicy::Strict
    /// [`UnresolvedPolicy::Passthrough`]: crate::UnresolvedPolicy::Passthrough
    #[error("Unresolved placeholder '{{{{{key}}}}}' in part '{part}'")]
    UnresolvedPlaceholder {
        /// The placeholder key as written between the delimiters.
        key: String,
        /// The part that contains it.
        part: String,
    },

    /// A substitution value contains a character XML cannot represent,
    /// not even as a character reference.
    #[error("Value for '{key}' in part '{part}' contains {character:?}, which XML cannot represent")]
    XmlEscape {
        /// The part being rewritten.
        part: String,
        /// The mapping key whose value failed.
        key: String,
        /// The offending character.
        character: char,
    },

    /// Writing the output failed.
    ///
    /// When writing to a path the destination is left untouched and the
    /// temporary file is removed.
    #[error("{}", WriteFailureDisplay { path: path.as_deref(), source })]
    WriteFailure {
        /// The destination path, if writing to the filesystem.
        path: Option<PathBuf>,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The metadata mapping has an invalid key or value.
    #[error("Invalid mapping: {0}")]
    InvalidMapping(String),

    /// The metadata mapping is not well-formed JSON.
    #[error("Invalid mapping JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn corrupt(offset: u64, reason: impl Into<String>) -> Self {
        Error::ArchiveCorrupt {
            offset,
            reason: reason.into(),
        }
    }

    pub(crate) fn write_failure(path: Option<&std::path::Path>, source: io::Error) -> Self {
        Error::WriteFailure {
            path: path.map(std::path::Path::to_path_buf),
            source,
        }
    }

    /// Returns `true` if the error points at the template archive itself
    /// rather than at the mapping or the storage.
    pub fn is_template_error(&self) -> bool {
        matches!(
            self,
            Error::ArchiveCorrupt { .. }
                | Error::UnsupportedFeature { .. }
                | Error::UnsupportedMethod { .. }
                | Error::InvalidPartPath(_)
                | Error::PartDecode { .. }
        )
    }
}

/// A specialized Result type for template generation.
pub type Result<T> = std::result::Result<T, Error>;
