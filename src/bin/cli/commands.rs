//! Command implementations for the CLI tool.

use std::path::{Path, PathBuf};

use slidefill::{
    Archive, GenerationConfig, MappingSource, PartClassifier, Pipeline, PipelineOptions,
    UnresolvedPolicy,
};

use crate::OutputFormat;
use crate::exit_codes::{ExitCode, error_to_exit_code};
use crate::output::create_formatter;

/// Configuration for the generate command.
pub struct GenerateConfig<'a> {
    pub template: &'a Path,
    pub output: &'a Path,
    pub data: Option<String>,
    pub data_file: Option<PathBuf>,
    pub strict: bool,
    pub format: OutputFormat,
    pub quiet: bool,
}

/// Generate command implementation
pub fn generate(config: &GenerateConfig<'_>) -> ExitCode {
    let formatter = create_formatter(config.format);

    let mapping = match (&config.data, &config.data_file) {
        (Some(text), _) => MappingSource::JsonText(text.clone()),
        (None, Some(path)) => MappingSource::JsonFile(path.clone()),
        (None, None) => {
            eprintln!("Error: one of --data or --data-file is required");
            return ExitCode::FatalError;
        }
    };

    let generation = GenerationConfig::new(config.template, mapping, config.output);
    let options = PipelineOptions::default().policy(if config.strict {
        UnresolvedPolicy::Strict
    } else {
        UnresolvedPolicy::Passthrough
    });

    let outcome = match Pipeline::new(options).run(&generation) {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("Error: {}", e);
            return error_to_exit_code(&e);
        }
    };

    if !config.quiet || config.format == OutputFormat::Json {
        print!("{}", formatter.format_generate(&outcome));
    }
    if !config.quiet {
        for warning in outcome.report.warnings() {
            eprintln!("Warning: {}", warning);
        }
    }

    if outcome.report.has_unresolved() {
        ExitCode::Warning
    } else {
        ExitCode::Success
    }
}

/// Placeholders command implementation
pub fn placeholders(template: &Path, format: OutputFormat, quiet: bool) -> ExitCode {
    let formatter = create_formatter(format);

    let bytes = match std::fs::read(template) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("Error reading '{}': {}", template.display(), e);
            return ExitCode::IoError;
        }
    };

    match Pipeline::default().inspect(&bytes) {
        Ok(inventory) => {
            if !quiet || format == OutputFormat::Json {
                print!("{}", formatter.format_placeholders(&inventory));
            }
            ExitCode::Success
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            error_to_exit_code(&e)
        }
    }
}

/// List command implementation
pub fn list(template: &Path, format: OutputFormat, quiet: bool) -> ExitCode {
    let formatter = create_formatter(format);

    let archive = match Archive::open_path(template) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("Error opening template: {}", e);
            return error_to_exit_code(&e);
        }
    };

    if !quiet || format == OutputFormat::Json {
        print!("{}", formatter.format_parts(&archive, &PartClassifier::default()));
    }
    ExitCode::Success
}
