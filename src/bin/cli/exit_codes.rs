//! Exit codes for the CLI tool.

use slidefill::Error;

/// Exit code constants
pub const SUCCESS: i32 = 0;
/// Document generated, but placeholders were left unresolved
pub const WARNING: i32 = 1;
/// Fatal error occurred
pub const FATAL_ERROR: i32 = 2;
/// Template is not a usable container
pub const BAD_TEMPLATE: i32 = 3;
/// Unresolved placeholder under --strict
pub const UNRESOLVED: i32 = 4;
/// I/O or write error
pub const IO_ERROR: i32 = 5;
/// Metadata mapping is malformed or holds unusable values
pub const INVALID_MAPPING: i32 = 6;

/// Exit code enum for structured handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success,
    Warning,
    FatalError,
    BadTemplate,
    Unresolved,
    IoError,
    InvalidMapping,
}

impl ExitCode {
    /// Returns the numeric exit code
    pub fn code(self) -> i32 {
        match self {
            Self::Success => SUCCESS,
            Self::Warning => WARNING,
            Self::FatalError => FATAL_ERROR,
            Self::BadTemplate => BAD_TEMPLATE,
            Self::Unresolved => UNRESOLVED,
            Self::IoError => IO_ERROR,
            Self::InvalidMapping => INVALID_MAPPING,
        }
    }
}

/// Converts a slidefill error to an exit code
pub fn error_to_exit_code(error: &Error) -> ExitCode {
    match error {
        Error::Io(_) | Error::WriteFailure { .. } => ExitCode::IoError,
        Error::ArchiveCorrupt { .. }
        | Error::UnsupportedFeature { .. }
        | Error::UnsupportedMethod { .. }
        | Error::InvalidPartPath(_)
        | Error::PartDecode { .. } => ExitCode::BadTemplate,
        Error::UnresolvedPlaceholder { .. } => ExitCode::Unresolved,
        Error::XmlEscape { .. } | Error::InvalidMapping(_) | Error::Json(_) => {
            ExitCode::InvalidMapping
        }
        _ => ExitCode::FatalError,
    }
}
