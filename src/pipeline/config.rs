//! Configuration of a generation run.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use crate::{PartClassifier, Result, TemplateMapping, UnresolvedPolicy};

/// Options shared by every run of a [`Pipeline`](super::Pipeline).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOptions {
    /// What to do with placeholders that have no value.
    pub policy: UnresolvedPolicy,
    /// Which parts are scanned for placeholders.
    pub classifier: PartClassifier,
    /// Substitute textual parts on the rayon pool.
    ///
    /// Ignored when the `parallel` feature is disabled. Output is identical
    /// either way.
    pub parallel: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            policy: UnresolvedPolicy::default(),
            classifier: PartClassifier::default(),
            parallel: cfg!(feature = "parallel"),
        }
    }
}

impl PipelineOptions {
    /// Sets the unresolved-placeholder policy.
    pub fn policy(mut self, policy: UnresolvedPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Shorthand for [`UnresolvedPolicy::Strict`].
    pub fn strict(self) -> Self {
        self.policy(UnresolvedPolicy::Strict)
    }

    /// Sets the part classifier.
    pub fn classifier(mut self, classifier: PartClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Enables or disables parallel substitution.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

/// Where the metadata mapping comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingSource {
    /// A JSON object stored in a file.
    JsonFile(PathBuf),
    /// A JSON object given inline.
    JsonText(String),
    /// An already built mapping.
    Mapping(TemplateMapping),
}

impl MappingSource {
    /// Loads the mapping, parsing JSON if needed.
    pub fn load(&self) -> Result<Cow<'_, TemplateMapping>> {
        match self {
            Self::JsonFile(path) => TemplateMapping::from_json_path(path).map(Cow::Owned),
            Self::JsonText(text) => TemplateMapping::from_json_str(text).map(Cow::Owned),
            Self::Mapping(mapping) => Ok(Cow::Borrowed(mapping)),
        }
    }
}

impl From<TemplateMapping> for MappingSource {
    fn from(mapping: TemplateMapping) -> Self {
        Self::Mapping(mapping)
    }
}

/// Everything one generation run needs: template, mapping, destination.
///
/// # Example
///
/// ```rust,no_run
/// use slidefill::{GenerationConfig, MappingSource, Pipeline, PipelineOptions};
///
/// let config = GenerationConfig::new(
///     "templates/seed.pptx",
///     MappingSource::JsonFile("offers/metadata.json".into()),
///     "out/Test_Client_Offer.pptx",
/// );
///
/// let mut pipeline = Pipeline::new(PipelineOptions::default().strict());
/// let outcome = pipeline.run(&config)?;
/// println!("{} parts rewritten", outcome.summary.parts_rewritten);
/// # Ok::<(), slidefill::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationConfig {
    /// Path of the template archive.
    pub template: PathBuf,
    /// Source of the metadata mapping.
    pub mapping: MappingSource,
    /// Path the generated archive is committed to.
    pub destination: PathBuf,
}

impl GenerationConfig {
    /// Creates a configuration.
    pub fn new(
        template: impl Into<PathBuf>,
        mapping: impl Into<MappingSource>,
        destination: impl Into<PathBuf>,
    ) -> Self {
        Self {
            template: template.into(),
            mapping: mapping.into(),
            destination: destination.into(),
        }
    }

    /// Returns the template path.
    pub fn template_path(&self) -> &Path {
        &self.template
    }

    /// Returns the destination path.
    pub fn destination_path(&self) -> &Path {
        &self.destination
    }
}
