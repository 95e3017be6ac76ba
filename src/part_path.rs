//! Part path type with validation for zip entry names.

use crate::{Error, Result};
use std::fmt;

/// A validated part name inside a zip container.
///
/// `PartPath` keeps the name exactly as stored in the central directory and
/// checks that:
/// - No NUL bytes are present
/// - The path is not empty and not absolute (does not start with `/`)
/// - No empty segments exist, except the trailing `/` of a directory entry
/// - No `..` segments are present
///
/// # Examples
///
/// ```
/// use slidefill::PartPath;
///
/// let path = PartPath::new("ppt/slides/slide1.xml").unwrap();
/// assert_eq!(path.extension(), Some("xml"));
///
/// let content_types = PartPath::new("[Content_Types].xml").unwrap();
/// assert_eq!(content_types.file_name(), "[Content_Types].xml");
///
/// assert!(PartPath::new("../evil.xml").is_err());
/// assert!(PartPath::new("/abs.xml").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PartPath(String);

impl PartPath {
    /// Creates a new `PartPath` from a string, validating it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPartPath`] if the path is empty, contains NUL
    /// bytes, is absolute, has empty segments or contains `..` segments.
    pub fn new(s: &str) -> Result<Self> {
        Self::validate(s)?;
        Ok(Self(s.to_string()))
    }

    fn validate(s: &str) -> Result<()> {
        if s.is_empty() {
            return Err(Error::InvalidPartPath("empty path".into()));
        }

        if s.contains('\0') {
            return Err(Error::InvalidPartPath(format!("'{}' contains NUL byte", s.escape_debug())));
        }

        if s.starts_with('/') {
            return Err(Error::InvalidPartPath(format!(
                "absolute path '{}' not allowed",
                s
            )));
        }

        let body = s.strip_suffix('/').unwrap_or(s);
        for segment in body.split('/') {
            if segment.is_empty() {
                return Err(Error::InvalidPartPath(format!(
                    "empty segment in '{}'",
                    s
                )));
            }
            if segment == ".." {
                return Err(Error::InvalidPartPath(format!(
                    "'..' segment not allowed in '{}'",
                    s
                )));
            }
        }

        Ok(())
    }

    /// Returns the path as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true for directory entries (names ending in `/`).
    pub fn is_directory(&self) -> bool {
        self.0.ends_with('/')
    }

    /// Returns the file name (last segment) of this path.
    pub fn file_name(&self) -> &str {
        let body = self.0.strip_suffix('/').unwrap_or(&self.0);
        body.rsplit('/').next().unwrap_or(body)
    }

    /// Returns the file extension, if any.
    ///
    /// The extension is the portion of the file name after the last `.`.
    /// A file name that starts with a dot (e.g. `.rels`) is treated as an
    /// extension-only name, as OOXML relationship parts such as
    /// `_rels/.rels` rely on it.
    ///
    /// ```
    /// use slidefill::PartPath;
    ///
    /// assert_eq!(PartPath::new("_rels/.rels").unwrap().extension(), Some("rels"));
    /// assert_eq!(PartPath::new("ppt/media/image1.PNG").unwrap().extension(), Some("PNG"));
    /// assert_eq!(PartPath::new("mimetype").unwrap().extension(), None);
    /// ```
    pub fn extension(&self) -> Option<&str> {
        if self.is_directory() {
            return None;
        }
        let file_name = self.file_name();
        let dot_pos = file_name.rfind('.')?;
        let ext = &file_name[dot_pos + 1..];
        if ext.is_empty() { None } else { Some(ext) }
    }

    /// Returns an iterator over the path components (segments).
    pub fn components(&self) -> impl Iterator<Item = &str> {
        let body = self.0.strip_suffix('/').unwrap_or(&self.0);
        body.split('/')
    }
}

impl AsRef<str> for PartPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PartPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<&str> for PartPath {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for PartPath {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Self::validate(&s)?;
        Ok(Self(s))
    }
}
