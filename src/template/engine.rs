//! Placeholder substitution for a single textual part.

use std::collections::HashSet;

use super::encoding::TextEncoding;
use super::escape::escape_xml;
use super::report::{PartReport, UnresolvedPolicy};
use super::scan::{Scanner, Segment};
use crate::{Error, PartPath, Result, TemplateMapping};

/// Result of substituting one part.
#[derive(Debug, Clone)]
pub struct PartSubstitution {
    /// New encoded content, or `None` if the text did not change.
    pub content: Option<Vec<u8>>,
    /// What was found and resolved.
    pub report: PartReport,
}

/// Rewrites textual parts against a mapping.
///
/// The engine only borrows the mapping, so one engine can be shared across
/// threads.
///
/// # Example
///
/// ```rust
/// use slidefill::{PartPath, TemplateMapping, UnresolvedPolicy};
/// use slidefill::template::SubstitutionEngine;
///
/// let mapping = TemplateMapping::try_from_pairs([("client_name", "A & B")])?;
/// let engine = SubstitutionEngine::new(&mapping, UnresolvedPolicy::Passthrough);
///
/// let path = PartPath::new("ppt/slides/slide1.xml")?;
/// let result = engine.substitute(&path, 0, b"<a:t>Dear {{client_name}}, {{missing}}</a:t>")?;
///
/// assert_eq!(result.content.as_deref(), Some(&b"<a:t>Dear A &amp; B, {{missing}}</a:t>"[..]));
/// assert_eq!(result.report.unresolved, vec!["missing"]);
/// # Ok::<(), slidefill::Error>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SubstitutionEngine<'m> {
    mapping: &'m TemplateMapping,
    policy: UnresolvedPolicy,
}

impl<'m> SubstitutionEngine<'m> {
    /// Creates an engine.
    pub fn new(mapping: &'m TemplateMapping, policy: UnresolvedPolicy) -> Self {
        Self { mapping, policy }
    }

    /// Returns the unresolved-placeholder policy.
    pub fn policy(&self) -> UnresolvedPolicy {
        self.policy
    }

    /// Decodes `content`, substitutes placeholders and re-encodes it with the
    /// original encoding.
    ///
    /// # Errors
    ///
    /// - [`Error::PartDecode`] if the content is not decodable text
    /// - [`Error::UnresolvedPlaceholder`] for a missing key under
    ///   [`UnresolvedPolicy::Strict`]
    /// - [`Error::XmlEscape`] if a used value holds a character XML cannot
    ///   represent
    pub fn substitute(&self, path: &PartPath, index: usize, content: &[u8]) -> Result<PartSubstitution> {
        let encoding = TextEncoding::detect(content);
        let text = encoding.decode(path.as_str(), content)?;

        let mut report = PartReport::new(path.clone(), index);
        let rendered = self.render(path.as_str(), &text, &mut report)?;

        for key in &report.unresolved {
            log::warn!("unresolved placeholder '{{{{{key}}}}}' left in '{path}'");
        }

        let content = if rendered != text {
            report.changed = true;
            Some(encoding.encode(&rendered))
        } else {
            None
        };
        log::debug!(
            "part '{}': {} placeholder(s), {} resolved, {} unresolved, changed={}",
            path,
            report.occurrences,
            report.resolved.len(),
            report.unresolved.len(),
            report.changed
        );

        Ok(PartSubstitution { content, report })
    }

    /// Substitutes placeholders in already decoded text.
    ///
    /// Fills `report` with the keys found; `report.changed` is left to the caller.
    pub fn render(&self, part: &str, text: &str, report: &mut PartReport) -> Result<String> {
        let mut out = String::with_capacity(text.len());
        let mut seen = HashSet::new();
        let mut warned_markup = false;

        for segment in Scanner::new(text) {
            let (key, raw) = match segment {
                Segment::Literal(literal) => {
                    out.push_str(literal);
                    continue;
                }
                Segment::Placeholder { key, raw } => (key, raw),
            };
            report.occurrences += 1;

            if key.contains('<') && !warned_markup {
                log::warn!("placeholder in '{part}' spans markup; it was probably split into several text runs");
                warned_markup = true;
            }

            let value = self.mapping.get(key);
            if seen.insert(key) {
                report.found.push(key.to_string());
                match value {
                    Some(_) => report.resolved.push(key.to_string()),
                    None => report.unresolved.push(key.to_string()),
                }
            }

            match value {
                Some(value) => {
                    let escaped = escape_xml(value).map_err(|character| Error::XmlEscape {
                        part: part.to_string(),
                        key: key.to_string(),
                        character,
                    })?;
                    out.push_str(&escaped);
                }
                None => match self.policy {
                    UnresolvedPolicy::Strict => {
                        return Err(Error::UnresolvedPlaceholder {
                            key: key.to_string(),
                            part: part.to_string(),
                        });
                    }
                    UnresolvedPolicy::Passthrough => out.push_str(raw),
                },
            }
        }

        Ok(out)
    }
}
