//! # slidefill
//!
//! Fill `{{placeholder}}` tokens inside zip-packaged documents (`.pptx`,
//! `.docx`, `.xlsx` and other OOXML-style containers) while keeping every
//! other byte of the template intact.
//!
//! The crate reads the template container, classifies its parts, rewrites
//! only the textual parts with XML-escaped values from a metadata mapping,
//! and re-emits the container with the original part order and compression
//! methods. Output is committed atomically: a failed run never leaves a
//! partial file at the destination.
//!
//! ## Quick Start
//!
//! ### Generating a document
//!
//! ```rust,no_run
//! use slidefill::{GenerationConfig, MappingSource, Pipeline, Result};
//!
//! fn main() -> Result<()> {
//!     let config = GenerationConfig::new(
//!         "templates/seed.pptx",
//!         MappingSource::JsonText(r#"{"client_name": "Acme Ltd.", "offer_value": 10000000}"#.into()),
//!         "out/Acme_Offer.pptx",
//!     );
//!
//!     let outcome = Pipeline::default().run(&config)?;
//!     for warning in outcome.report.warnings() {
//!         eprintln!("warning: {warning}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ### Working in memory
//!
//! ```rust,no_run
//! use slidefill::{Pipeline, PipelineOptions, TemplateMapping, Result};
//!
//! fn main() -> Result<()> {
//!     let template = std::fs::read("templates/seed.pptx")?;
//!     let mut mapping = TemplateMapping::new();
//!     mapping.insert("client_name", "A & B Kft.")?;
//!
//!     let mut pipeline = Pipeline::new(PipelineOptions::default().strict());
//!     let generated = pipeline.generate(&template, &mapping)?;
//!     println!(
//!         "{} of {} parts rewritten",
//!         generated.summary.parts_rewritten, generated.summary.parts_written
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ### Listing what a template expects
//!
//! ```rust,no_run
//! use slidefill::{Pipeline, Result};
//!
//! fn main() -> Result<()> {
//!     let template = std::fs::read("templates/seed.pptx")?;
//!     let inventory = Pipeline::default().inspect(&template)?;
//!     for key in inventory.keys() {
//!         println!("{{{{{key}}}}}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Placeholders
//!
//! A placeholder is `{{key}}` in the text of a textual part. Keys are looked
//! up exactly (case-sensitive). Values are XML-escaped and never scanned
//! again, so a value containing `{{other}}` is inserted literally.
//! Placeholders without a value are handled by the [`UnresolvedPolicy`]:
//! left in place and reported (the default) or turned into an error.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `parallel` | Yes | Substitute textual parts on the Rayon thread pool |
//! | `cli` | No | Command-line interface tool |
//!
//! ## Error Handling
//!
//! All operations return [`Result<T>`], an alias for
//! `std::result::Result<T, Error>`:
//!
//! ```rust,no_run
//! use slidefill::{Archive, Error};
//!
//! fn open_template(path: &str) -> slidefill::Result<()> {
//!     match Archive::open_path(path) {
//!         Ok(archive) => {
//!             println!("Template has {} parts", archive.len());
//!             Ok(())
//!         }
//!         Err(e @ Error::ArchiveCorrupt { .. }) => {
//!             eprintln!("Not a usable zip container: {}", e);
//!             Err(e)
//!         }
//!         Err(e @ Error::UnsupportedFeature { .. }) => {
//!             eprintln!("Template uses an unsupported zip feature: {}", e);
//!             Err(e)
//!         }
//!         Err(e) => Err(e),
//!     }
//! }
//! # fn main() {}
//! ```
//!
//! ## Limitations
//!
//! Encrypted entries, ZIP64 and multi-disk archives are rejected. Only the
//! stored and deflate methods can be decoded; binary parts using other
//! methods are still copied through.
//!
//! ## Minimum Supported Rust Version (MSRV)
//!
//! This crate requires **Rust 1.85** or later.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![forbid(unsafe_code)]

pub mod classify;
pub mod codec;
pub mod error;
pub mod format;
pub mod mapping;
pub mod part_path;
pub mod pipeline;
pub mod read;
pub mod template;
pub mod write;

pub use classify::{PartClass, PartClassifier};
pub use codec::Compression;
pub use error::{Error, Result};
pub use mapping::TemplateMapping;
pub use part_path::PartPath;
pub use pipeline::{
    GenerationConfig, Generated, MappingSource, Pipeline, PipelineOptions, PipelineState,
    RunOutcome,
};
pub use read::{Archive, ArchivePart};
pub use template::{PartReport, SubstitutionReport, UnresolvedPolicy, UnresolvedWarning};
pub use write::{ArchiveWriter, OutputPart, WriteSummary, commit_atomic};
