//! Deciding which parts are eligible for placeholder substitution.
//!
//! The decision is made from the part name alone, never by sniffing the
//! content, so the same template always yields the same split. A binary part
//! is never opened or decoded.

use std::collections::BTreeSet;

use crate::ArchivePart;

/// Extensions treated as textual by default.
pub const DEFAULT_TEXTUAL_EXTENSIONS: &[&str] = &["xml", "rels"];

/// Classification of a single part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartClass {
    /// Textual markup, scanned for placeholders.
    Textual,
    /// Anything else; copied through byte for byte.
    Binary,
}

/// Suffix-based part classifier.
///
/// Matching is case-insensitive on the extension of the part's file name.
/// Directory entries are always [`PartClass::Binary`].
///
/// # Example
///
/// ```rust
/// use slidefill::{PartClassifier, PartClass, PartPath};
///
/// let classifier = PartClassifier::default().with_extension("vml");
/// assert_eq!(classifier.classify_path(&PartPath::new("ppt/slides/slide1.xml")?), PartClass::Textual);
/// assert_eq!(classifier.classify_path(&PartPath::new("ppt/drawings/vmlDrawing1.VML")?), PartClass::Textual);
/// assert_eq!(classifier.classify_path(&PartPath::new("ppt/media/image1.png")?), PartClass::Binary);
/// # Ok::<(), slidefill::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartClassifier {
    textual_extensions: BTreeSet<String>,
}

impl Default for PartClassifier {
    fn default() -> Self {
        Self {
            textual_extensions: DEFAULT_TEXTUAL_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
        }
    }
}

impl PartClassifier {
    /// Creates a classifier with the default textual extensions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a classifier that treats every part as binary.
    pub fn empty() -> Self {
        Self {
            textual_extensions: BTreeSet::new(),
        }
    }

    /// Adds a textual extension (without the leading dot).
    pub fn with_extension(mut self, extension: &str) -> Self {
        self.textual_extensions
            .insert(normalize_extension(extension));
        self
    }

    /// Removes a textual extension.
    pub fn without_extension(mut self, extension: &str) -> Self {
        self.textual_extensions
            .remove(&normalize_extension(extension));
        self
    }

    /// Returns the configured textual extensions, lowercase and sorted.
    pub fn textual_extensions(&self) -> impl Iterator<Item = &str> {
        self.textual_extensions.iter().map(String::as_str)
    }

    /// Classifies a part.
    pub fn classify(&self, part: &ArchivePart) -> PartClass {
        self.classify_path(part.path())
    }

    /// Classifies a part path.
    pub fn classify_path(&self, path: &crate::PartPath) -> PartClass {
        if path.is_directory() {
            return PartClass::Binary;
        }
        match path.extension() {
            Some(ext) if self.textual_extensions.contains(&ext.to_ascii_lowercase()) => {
                PartClass::Textual
            }
            _ => PartClass::Binary,
        }
    }
}

fn normalize_extension(extension: &str) -> String {
    extension.trim_start_matches('.').to_ascii_lowercase()
}
