//! CLI-specific error types

use std::fmt;
use std::io;

use crate::pipeline::AnnotateError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// I/O error reading an input file
    IoError,
    /// Input file did not parse
    BadInput,
    /// The annotation pipeline failed
    PipelineError,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::IoError => "PLANLENS_CLI_IO_ERROR",
            Self::BadInput => "PLANLENS_CLI_BAD_INPUT",
            Self::PipelineError => "PLANLENS_CLI_PIPELINE_ERROR",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Unparseable input file
    pub fn bad_input(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::BadInput, msg)
    }

    /// Pipeline failure
    pub fn pipeline_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::PipelineError, msg)
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::bad_input(format!("JSON error: {}", e))
    }
}

impl From<AnnotateError> for CliError {
    fn from(e: AnnotateError) -> Self {
        Self::pipeline_error(e.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
