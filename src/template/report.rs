//! Substitution reports.

use std::collections::BTreeSet;
use std::fmt;

use crate::{PartPath, TemplateMapping};

/// What to do with a placeholder whose key is not in the mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UnresolvedPolicy {
    /// Fail the run with [`Error::UnresolvedPlaceholder`](crate::Error::UnresolvedPlaceholder).
    Strict,
    /// Keep the literal `{{key}}` text and record it in the report.
    #[default]
    Passthrough,
}

impl fmt::Display for UnresolvedPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strict => write!(f, "strict"),
            Self::Passthrough => write!(f, "passthrough"),
        }
    }
}

/// Substitution outcome for one textual part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartReport {
    /// Part path.
    pub path: PartPath,
    /// Position of the part in the source archive.
    pub index: usize,
    /// Distinct placeholder keys, in order of first appearance.
    pub found: Vec<String>,
    /// Keys from `found` that had a value.
    pub resolved: Vec<String>,
    /// Keys from `found` that had no value.
    pub unresolved: Vec<String>,
    /// Total number of placeholder occurrences, repeats included.
    pub occurrences: usize,
    /// True if the part content was rewritten.
    pub changed: bool,
}

impl PartReport {
    /// Creates an empty report for a part.
    pub fn new(path: PartPath, index: usize) -> Self {
        Self {
            path,
            index,
            found: Vec::new(),
            resolved: Vec::new(),
            unresolved: Vec::new(),
            occurrences: 0,
            changed: false,
        }
    }

    /// Returns true if any placeholder was left unresolved.
    pub fn has_unresolved(&self) -> bool {
        !self.unresolved.is_empty()
    }
}

/// One unresolved placeholder, as surfaced to callers under
/// [`UnresolvedPolicy::Passthrough`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedWarning {
    /// The part containing the placeholder.
    pub part: String,
    /// The key between the delimiters.
    pub key: String,
}

impl fmt::Display for UnresolvedWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unresolved placeholder '{{{{{}}}}}' in '{}'", self.key, self.part)
    }
}

/// Report for a whole generation run.
///
/// Holds one [`PartReport`] per textual part, in archive order, plus the
/// part counts of the template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstitutionReport {
    /// Per-part reports for textual parts, in archive order.
    pub parts: Vec<PartReport>,
    /// Policy the run used.
    pub policy: UnresolvedPolicy,
    /// Number of parts in the template.
    pub total_parts: usize,
    /// Number of parts classified as textual.
    pub textual_parts: usize,
    /// Number of parts classified as binary.
    pub binary_parts: usize,
}

impl SubstitutionReport {
    /// Returns true if any part has unresolved placeholders.
    pub fn has_unresolved(&self) -> bool {
        self.parts.iter().any(PartReport::has_unresolved)
    }

    /// Returns one warning per unresolved key per part.
    pub fn warnings(&self) -> Vec<UnresolvedWarning> {
        self.parts
            .iter()
            .flat_map(|part| {
                part.unresolved.iter().map(|key| UnresolvedWarning {
                    part: part.path.to_string(),
                    key: key.clone(),
                })
            })
            .collect()
    }

    /// Returns the parts whose content was rewritten.
    pub fn changed_parts(&self) -> impl Iterator<Item = &PartReport> {
        self.parts.iter().filter(|p| p.changed)
    }

    /// Returns the report of a part.
    pub fn part(&self, path: &str) -> Option<&PartReport> {
        self.parts.iter().find(|p| p.path.as_str() == path)
    }

    /// Returns every distinct key found in the template, sorted.
    pub fn found_keys(&self) -> BTreeSet<&str> {
        self.parts
            .iter()
            .flat_map(|p| p.found.iter().map(String::as_str))
            .collect()
    }

    /// Returns the mapping keys no placeholder referenced, sorted.
    pub fn unused_keys(&self, mapping: &TemplateMapping) -> Vec<String> {
        let found = self.found_keys();
        let mut unused: Vec<String> = mapping
            .keys()
            .filter(|key| !found.contains(key))
            .map(str::to_string)
            .collect();
        unused.sort();
        unused
    }
}
