//! Shared error types for pattern generation.
//!
//! Only conditions that abort a run live here. Extractor validation failures
//! are never errors: they are reported through the diagnostic channel and the
//! offending declaration is dropped from the round.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for patgen operations
#[derive(Debug, Error)]
pub enum GenError {
    /// File system related errors
    #[error("File system error: {message}")]
    FileSystem {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Source files that syn could not parse
    #[error("Parse error in {}:{line}:{column}: {message}", file.display())]
    Parse {
        file: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A generated unit could not be written. Always fatal for the round.
    #[error("Error writing {name}")]
    Emission {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// The driver kept discovering new declarations past its round limit
    #[error("Gave up after {rounds} rounds: generated sources keep introducing #[{marker}] declarations")]
    RoundLimit { rounds: usize, marker: String },

    /// Glob pattern errors
    #[error(transparent)]
    Pattern(#[from] glob::PatternError),

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl GenError {
    /// Create a file system error with path context
    pub fn file_system(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::FileSystem {
            message: message.into(),
            path: Some(path.into()),
            source: None,
        }
    }

    /// Create a parse error from a syn error, using its span for the location
    pub fn parse(file: impl Into<PathBuf>, error: &syn::Error) -> Self {
        let start = error.span().start();
        Self::Parse {
            file: file.into(),
            line: start.line,
            column: start.column + 1,
            message: error.to_string(),
        }
    }

    /// Create an emission error for a qualified unit name
    pub fn emission(name: impl Into<String>, source: std::io::Error) -> Self {
        Self::Emission {
            name: name.into(),
            source,
        }
    }

    /// Whether this error came from writing generated output
    pub fn is_emission(&self) -> bool {
        matches!(self, Self::Emission { .. })
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, GenError>;
