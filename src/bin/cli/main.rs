//! CLI tool for filling document templates.

mod commands;
mod exit_codes;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Fill {{placeholders}} in zip-packaged documents
#[derive(Parser)]
#[command(name = "slidefill")]
#[command(author, version, about = "Fill {{placeholders}} in zip-packaged documents", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value = "human", global = true)]
    format: OutputFormat,

    /// Suppress the summary and warnings
    #[arg(long, short = 'q', global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a document from a template (alias: g)
    #[command(alias = "g")]
    Generate {
        /// Template document (.pptx, .docx, ...)
        template: PathBuf,

        /// Output document
        #[arg(short = 'o', long)]
        output: PathBuf,

        /// Metadata as an inline JSON object
        #[arg(short = 'd', long, conflicts_with = "data_file", required_unless_present = "data_file")]
        data: Option<String>,

        /// Metadata as a JSON file
        #[arg(short = 'D', long)]
        data_file: Option<PathBuf>,

        /// Fail if a placeholder has no value
        #[arg(long)]
        strict: bool,
    },

    /// List the placeholders a template expects (alias: p)
    #[command(alias = "p")]
    Placeholders {
        /// Template document
        template: PathBuf,
    },

    /// List template parts with their classification (alias: l)
    #[command(alias = "l")]
    List {
        /// Template document
        template: PathBuf,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}

fn main() {
    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::Generate {
            template,
            output,
            data,
            data_file,
            strict,
        } => commands::generate(&commands::GenerateConfig {
            template: &template,
            output: &output,
            data,
            data_file,
            strict,
            format: cli.format,
            quiet: cli.quiet,
        }),

        Commands::Placeholders { template } => {
            commands::placeholders(&template, cli.format, cli.quiet)
        }

        Commands::List { template } => commands::list(&template, cli.format, cli.quiet),
    };

    std::process::exit(exit_code.code());
}
