//! Placeholder scanning and substitution.
//!
//! A textual part goes through four steps:
//!
//! 1. [`TextEncoding`] detects and decodes the part's text.
//! 2. [`Scanner`] splits the text into literals and `{{key}}` placeholders in
//!    a single pass; substituted values are never scanned again.
//! 3. [`SubstitutionEngine`] resolves each key against the
//!    [`TemplateMapping`](crate::TemplateMapping), escaping values with
//!    [`escape_xml`] and applying the [`UnresolvedPolicy`] to missing keys.
//! 4. The result is re-encoded with the original encoding, and only if the
//!    text actually changed.
//!
//! [`inventory`] runs step 1 and 2 alone to list what a template expects.

mod encoding;
mod engine;
mod escape;
mod inventory;
mod report;
mod scan;

pub use encoding::{TextEncoding, declared_encoding};
pub use engine::{PartSubstitution, SubstitutionEngine};
pub use escape::{escape_xml, is_xml_char};
pub use inventory::{PartPlaceholders, PlaceholderInventory, inventory};
pub use report::{PartReport, SubstitutionReport, UnresolvedPolicy, UnresolvedWarning};
pub use scan::{CLOSE, OPEN, Scanner, Segment, placeholder_keys};
