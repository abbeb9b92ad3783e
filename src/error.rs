//! Error types shared across the crate.
//!
//! Every fallible operation returns [`Result`]. The only error a step is
//! allowed to swallow is [`ReleaseError::Interrupted`], which it turns into
//! [`ReleaseError::Aborted`] so the binary can exit with the dedicated
//! interrupt status.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for release operations.
pub type Result<T> = std::result::Result<T, ReleaseError>;

/// Exit status used when the operator interrupts the procedure.
pub const EXIT_INTERRUPTED: u8 = 1;

/// Exit status used for every other failure.
pub const EXIT_FAILURE: u8 = 2;

/// Main error type for all release operations.
#[derive(Error, Debug)]
pub enum ReleaseError {
    /// The operator pressed Ctrl-C during a confirmation wait.
    #[error("Interrupted by operator")]
    Interrupted,

    /// A step converted an operator interrupt into a procedure abort.
    #[error("Release procedure aborted by operator")]
    Aborted,

    /// Standard input was closed while waiting for confirmation.
    #[error("Operator input closed while waiting for confirmation")]
    InputClosed,

    /// The terminal could not be set up or read.
    #[error("Operator console error: {0}")]
    Console(#[source] std::io::Error),

    /// Package name or version could not be located.
    #[error("Could not find {what} in '{}'", path.display())]
    MetadataNotFound { what: String, path: PathBuf },

    /// Reading a project or procedure file failed.
    #[error("Failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A procedure file is not valid YAML or has an unknown shape.
    #[error("Failed to parse procedure '{}': {source}", path.display())]
    ProcedureParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A procedure failed structural validation.
    #[error("Invalid procedure:\n{0}")]
    InvalidProcedure(String),

    /// Two procedure entries share a name.
    #[error("Duplicate step name: '{0}'")]
    DuplicateStep(String),

    /// An automated command could not be started.
    #[error("Failed to start '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// An automated command exited unsuccessfully (strict mode only).
    #[error("Command '{command}' failed with exit code {}", describe_code(*code))]
    CommandFailed { command: String, code: Option<i32> },
}

impl ReleaseError {
    /// Returns true for the two interrupt-related variants.
    pub fn is_interrupt(&self) -> bool {
        matches!(self, Self::Interrupted | Self::Aborted)
    }

    /// Process exit status the binary reports for this error.
    pub fn exit_code(&self) -> u8 {
        if self.is_interrupt() {
            EXIT_INTERRUPTED
        } else {
            EXIT_FAILURE
        }
    }
}

fn describe_code(code: Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "none (terminated by signal)".to_string(),
    }
}
