//! Orchestration of a generation run.
//!
//! A [`Pipeline`] walks one template through
//! `Idle → Reading → Classifying → Substituting → Writing → Done`. Any error
//! moves it to [`PipelineState::Failed`] and ends the run; nothing is written
//! after a failing stage, so a strict-policy failure never reaches the
//! writer.

mod config;

use std::fmt;
use std::path::PathBuf;

pub use config::{GenerationConfig, MappingSource, PipelineOptions};

use crate::classify::PartClass;
use crate::template::{PartSubstitution, PlaceholderInventory, SubstitutionEngine, SubstitutionReport};
use crate::write::{ArchiveWriter, OutputPart, WriteSummary};
use crate::{Archive, ArchivePart, Result, TemplateMapping};

/// Stage of a generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineState {
    /// No run in progress.
    Idle,
    /// Reading and parsing the template (and the mapping source).
    Reading,
    /// Splitting parts into textual and binary.
    Classifying,
    /// Substituting placeholders in textual parts.
    Substituting,
    /// Emitting the output archive.
    Writing,
    /// The run completed.
    Done,
    /// The run failed; holds the error message.
    Failed(String),
}

impl PipelineState {
    /// Returns true for `Done` and `Failed`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed(_))
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Reading => write!(f, "reading"),
            Self::Classifying => write!(f, "classifying"),
            Self::Substituting => write!(f, "substituting"),
            Self::Writing => write!(f, "writing"),
            Self::Done => write!(f, "done"),
            Self::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// Result of an in-memory run.
#[derive(Debug, Clone)]
pub struct Generated {
    /// The generated archive.
    pub bytes: Vec<u8>,
    /// What was substituted.
    pub report: SubstitutionReport,
    /// Writer statistics.
    pub summary: WriteSummary,
}

/// Result of a run committed to disk.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// Where the archive was written.
    pub destination: PathBuf,
    /// What was substituted.
    pub report: SubstitutionReport,
    /// Writer statistics.
    pub summary: WriteSummary,
}

/// Sequences reader, classifier, engine and writer for one run at a time.
///
/// # Example
///
/// ```rust,no_run
/// use slidefill::{Pipeline, PipelineOptions, TemplateMapping};
///
/// let template = std::fs::read("seed.pptx")?;
/// let mapping = TemplateMapping::from_json_str(r#"{"client_name": "Acme Ltd."}"#)?;
///
/// let mut pipeline = Pipeline::new(PipelineOptions::default());
/// let generated = pipeline.generate(&template, &mapping)?;
/// for warning in generated.report.warnings() {
///     eprintln!("warning: {warning}");
/// }
/// std::fs::write("offer.pptx", &generated.bytes)?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct Pipeline {
    options: PipelineOptions,
    state: PipelineState,
    transitions: Vec<PipelineState>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(PipelineOptions::default())
    }
}

/// Output of the substituting stage, ready for the writer.
struct Prepared {
    archive: Archive,
    contents: Vec<Option<Vec<u8>>>,
    report: SubstitutionReport,
}

impl Prepared {
    fn output_parts(&mut self) -> Vec<OutputPart<'_>> {
        self.archive
            .parts()
            .iter()
            .zip(self.contents.iter_mut())
            .map(|(part, content)| match content.take() {
                Some(content) => OutputPart::rewritten(part, content),
                None => OutputPart::unchanged(part),
            })
            .collect()
    }
}

impl Pipeline {
    /// Creates an idle pipeline.
    pub fn new(options: PipelineOptions) -> Self {
        Self {
            options,
            state: PipelineState::Idle,
            transitions: vec![PipelineState::Idle],
        }
    }

    /// Returns the options used by every run of this pipeline.
    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Returns the current state.
    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    /// Returns every state of the last run, starting with `Idle`.
    pub fn transitions(&self) -> &[PipelineState] {
        &self.transitions
    }

    /// Generates an archive in memory.
    ///
    /// # Errors
    ///
    /// Any error of the reader, the engine or the writer. The pipeline ends
    /// in [`PipelineState::Failed`].
    pub fn generate(&mut self, template: &[u8], mapping: &TemplateMapping) -> Result<Generated> {
        self.begin();
        let options = self.options.clone();
        let result = self.generate_inner(template, mapping, &options);
        self.finish(result)
    }

    fn generate_inner(
        &mut self,
        template: &[u8],
        mapping: &TemplateMapping,
        options: &PipelineOptions,
    ) -> Result<Generated> {
        self.transition(PipelineState::Reading);
        let archive = Archive::open(template)?;
        let mut prepared = self.prepare(archive, mapping, options)?;

        self.transition(PipelineState::Writing);
        let writer = ArchiveWriter::for_archive(&prepared.archive);
        let mut bytes = Vec::with_capacity(template.len());
        let summary = writer.write(prepared.output_parts(), &mut bytes)?;

        Ok(Generated {
            bytes,
            report: prepared.report,
            summary,
        })
    }

    /// Runs a configured generation and commits the result atomically.
    ///
    /// Uses the pipeline's options, exactly like [`generate`](Self::generate).
    ///
    /// # Errors
    ///
    /// Fails like [`generate`](Self::generate), plus [`Error::Io`] when the
    /// template or mapping file cannot be read and
    /// [`Error::WriteFailure`] when the destination cannot be written. The
    /// destination is untouched on every error.
    ///
    /// [`Error::Io`]: crate::Error::Io
    /// [`Error::WriteFailure`]: crate::Error::WriteFailure
    pub fn run(&mut self, config: &GenerationConfig) -> Result<RunOutcome> {
        self.begin();
        let options = self.options.clone();
        let result = self.run_inner(config, &options);
        self.finish(result)
    }

    fn run_inner(&mut self, config: &GenerationConfig, options: &PipelineOptions) -> Result<RunOutcome> {
        self.transition(PipelineState::Reading);
        let template = std::fs::read(&config.template)?;
        let mapping = config.mapping.load()?;
        let archive = Archive::open(&template)?;
        let mut prepared = self.prepare(archive, &mapping, options)?;

        self.transition(PipelineState::Writing);
        let writer = ArchiveWriter::for_archive(&prepared.archive);
        let summary = writer.write_to_path(prepared.output_parts(), &config.destination)?;
        log::info!(
            "generated '{}' from '{}': {} of {} parts rewritten",
            config.destination.display(),
            config.template.display(),
            summary.parts_rewritten,
            summary.parts_written
        );

        Ok(RunOutcome {
            destination: config.destination.clone(),
            report: prepared.report,
            summary,
        })
    }

    /// Lists the placeholders of a template without substituting anything.
    pub fn inspect(&self, template: &[u8]) -> Result<PlaceholderInventory> {
        let archive = Archive::open(template)?;
        crate::template::inventory(&archive, &self.options.classifier)
    }

    fn prepare(
        &mut self,
        archive: Archive,
        mapping: &TemplateMapping,
        options: &PipelineOptions,
    ) -> Result<Prepared> {
        self.transition(PipelineState::Classifying);
        let textual: Vec<&ArchivePart> = archive
            .parts()
            .iter()
            .filter(|part| options.classifier.classify(part) == PartClass::Textual)
            .collect();
        let total_parts = archive.len();
        let textual_parts = textual.len();
        log::debug!(
            "{} parts: {} textual, {} binary",
            total_parts,
            textual_parts,
            total_parts - textual_parts
        );

        self.transition(PipelineState::Substituting);
        let engine = SubstitutionEngine::new(mapping, options.policy);
        let results = substitute_all(&engine, &textual, options.parallel);

        let mut contents = vec![None; total_parts];
        let mut reports = Vec::with_capacity(textual_parts);
        for (part, result) in textual.iter().zip(results) {
            let PartSubstitution { content, report } = result?;
            contents[part.original_index()] = content;
            reports.push(report);
        }

        let report = SubstitutionReport {
            parts: reports,
            policy: options.policy,
            total_parts,
            textual_parts,
            binary_parts: total_parts - textual_parts,
        };
        Ok(Prepared {
            archive,
            contents,
            report,
        })
    }

    fn begin(&mut self) {
        self.state = PipelineState::Idle;
        self.transitions.clear();
        self.transitions.push(PipelineState::Idle);
    }

    fn transition(&mut self, next: PipelineState) {
        log::debug!("pipeline: {} -> {}", self.state, next);
        self.state = next.clone();
        self.transitions.push(next);
    }

    fn finish<T>(&mut self, result: Result<T>) -> Result<T> {
        match &result {
            Ok(_) => self.transition(PipelineState::Done),
            Err(e) => self.transition(PipelineState::Failed(e.to_string())),
        }
        result
    }
}

fn substitute_part(engine: &SubstitutionEngine<'_>, part: &ArchivePart) -> Result<PartSubstitution> {
    let content = part.contents()?;
    engine.substitute(part.path(), part.original_index(), &content)
}

/// Substitutes every part, returning results in input order.
fn substitute_all(
    engine: &SubstitutionEngine<'_>,
    parts: &[&ArchivePart],
    parallel: bool,
) -> Vec<Result<PartSubstitution>> {
    #[cfg(feature = "parallel")]
    {
        if parallel && parts.len() > 1 {
            use rayon::prelude::*;
            return parts
                .par_iter()
                .map(|part| substitute_part(engine, part))
                .collect();
        }
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel;

    parts
        .iter()
        .map(|part| substitute_part(engine, part))
        .collect()
}
