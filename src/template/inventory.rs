//! Listing the placeholders a template expects.

use std::collections::{BTreeSet, HashSet};

use super::encoding::TextEncoding;
use super::scan::placeholder_keys;
use crate::classify::{PartClass, PartClassifier};
use crate::{Archive, PartPath, Result, TemplateMapping};

/// Placeholders found in one textual part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartPlaceholders {
    /// Part path.
    pub path: PartPath,
    /// Position of the part in the archive.
    pub index: usize,
    /// Distinct keys in order of first appearance.
    pub keys: Vec<String>,
    /// Number of occurrences, repeats included.
    pub occurrences: usize,
}

/// The placeholders of a whole template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceholderInventory {
    /// Textual parts that contain at least one placeholder, in archive order.
    pub parts: Vec<PartPlaceholders>,
}

impl PlaceholderInventory {
    /// Returns the union of all keys, sorted.
    pub fn keys(&self) -> BTreeSet<&str> {
        self.parts
            .iter()
            .flat_map(|p| p.keys.iter().map(String::as_str))
            .collect()
    }

    /// Returns true if the template has no placeholders.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Returns the template keys the mapping has no value for, sorted.
    pub fn missing_keys(&self, mapping: &TemplateMapping) -> Vec<&str> {
        self.keys()
            .into_iter()
            .filter(|key| !mapping.contains_key(key))
            .collect()
    }
}

/// Scans every textual part of `archive` for placeholders.
///
/// Binary parts are skipped without being decoded.
///
/// # Errors
///
/// Fails like substitution would: a textual part that cannot be inflated or
/// decoded aborts the scan.
pub fn inventory(archive: &Archive, classifier: &PartClassifier) -> Result<PlaceholderInventory> {
    let mut inventory = PlaceholderInventory::default();

    for part in archive.parts() {
        if classifier.classify(part) != PartClass::Textual {
            continue;
        }
        let bytes = part.contents()?;
        let text = TextEncoding::detect(&bytes).decode(part.path().as_str(), &bytes)?;

        let mut seen = HashSet::new();
        let mut entry = PartPlaceholders {
            path: part.path().clone(),
            index: part.original_index(),
            keys: Vec::new(),
            occurrences: 0,
        };
        for key in placeholder_keys(&text) {
            entry.occurrences += 1;
            if seen.insert(key) {
                entry.keys.push(key.to_string());
            }
        }
        if entry.occurrences > 0 {
            inventory.parts.push(entry);
        }
    }

    Ok(inventory)
}
