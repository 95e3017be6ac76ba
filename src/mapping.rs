//! The metadata mapping used to resolve placeholders.
//!
//! The mapping is a flat key → string table. Keys are what appears between
//! the `{{` and `}}` delimiters, so they must be non-empty and must not
//! contain braces. Values are plain text; they are escaped at substitution
//! time, never here.
//!
//! The conventional on-disk form is a JSON object:
//!
//! ```rust
//! use slidefill::TemplateMapping;
//!
//! let mapping = TemplateMapping::from_json_str(r#"{
//!     "client_name": "Test Client Zrt.",
//!     "project_date": "2026-02-11",
//!     "offer_value": 10000000,
//!     "draft": false
//! }"#)?;
//! assert_eq!(mapping.get("offer_value"), Some("10000000"));
//! assert_eq!(mapping.get("draft"), Some("false"));
//! # Ok::<(), slidefill::Error>(())
//! ```

use std::collections::HashMap;
use std::collections::hash_map;
use std::io::Read;
use std::path::Path;

use serde_json::Value;

use crate::{Error, Result};

/// Checks that `key` can appear as a placeholder key.
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(Error::InvalidMapping("empty key".into()));
    }
    if key.contains(['{', '}']) {
        return Err(Error::InvalidMapping(format!(
            "key '{key}' contains a brace"
        )));
    }
    Ok(())
}

/// Key → value table for placeholder substitution.
///
/// Read-only once handed to the pipeline; it is shared across worker
/// threads by reference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateMapping {
    values: HashMap<String, String>,
}

impl TemplateMapping {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value, returning the previous value for the key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMapping`] if the key is empty or contains a brace.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Result<Option<String>> {
        let key = key.into();
        validate_key(&key)?;
        Ok(self.values.insert(key, value.into()))
    }

    /// Builds a mapping from key/value pairs, validating every key.
    pub fn try_from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut mapping = Self::new();
        for (key, value) in pairs {
            mapping.insert(key, value)?;
        }
        Ok(mapping)
    }

    /// Looks up a key (exact, case-sensitive).
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Returns true if the key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the mapping is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over the entries in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Iterates over the keys in arbitrary order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Parses a JSON object.
    ///
    /// String values are taken as-is; numbers and booleans use their JSON
    /// text. `null`, arrays and nested objects are rejected because they
    /// have no single textual rendering.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_json_value(value)
    }

    /// Parses a JSON object from a reader.
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self> {
        let value: Value = serde_json::from_reader(reader)?;
        Self::from_json_value(value)
    }

    /// Reads and parses a JSON file.
    pub fn from_json_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    fn from_json_value(value: Value) -> Result<Self> {
        let Value::Object(object) = value else {
            return Err(Error::InvalidMapping(
                "top-level JSON value must be an object".into(),
            ));
        };

        let mut mapping = Self::new();
        for (key, value) in object {
            let text = match value {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                Value::Null => {
                    return Err(Error::InvalidMapping(format!("value for '{key}' is null")));
                }
                Value::Array(_) | Value::Object(_) => {
                    return Err(Error::InvalidMapping(format!(
                        "value for '{key}' is not a scalar"
                    )));
                }
            };
            mapping.insert(key, text)?;
        }
        Ok(mapping)
    }
}

impl TryFrom<HashMap<String, String>> for TemplateMapping {
    type Error = Error;

    fn try_from(values: HashMap<String, String>) -> Result<Self> {
        for key in values.keys() {
            validate_key(key)?;
        }
        Ok(Self { values })
    }
}

impl<'a> IntoIterator for &'a TemplateMapping {
    type Item = (&'a String, &'a String);
    type IntoIter = hash_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}
