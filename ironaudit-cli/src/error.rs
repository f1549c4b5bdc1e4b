//! CLI-specific error types and exit code mapping

use ironaudit_core::error::IronauditError;

/// CLI-specific error type.
///
/// Each variant carries enough context for a user-friendly message.
/// The `exit_code()` method maps errors to standard Unix exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// The audit completed and reported occurrences.
    #[error("audit reported {0} occurrence(s)")]
    Findings(usize),

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (file read, stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from ironaudit-core.
    #[error("{0}")]
    Core(#[from] IronauditError),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                              |
    /// |------|--------------------------------------|
    /// | 0    | Success                              |
    /// | 1    | General / command error              |
    /// | 2    | Configuration error                  |
    /// | 4    | Audit reported occurrences           |
    /// | 10   | IO error                             |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::Findings(_) => 4,
            Self::Io(_) => 10,
            Self::Core(IronauditError::Config(_)) => 2,
            Self::Core(IronauditError::Io(_)) => 10,
            Self::JsonSerialize(_) | Self::Command(_) | Self::Core(_) => 1,
        }
    }
}

impl From<ironaudit_checks::AuditError> for CliError {
    fn from(e: ironaudit_checks::AuditError) -> Self {
        Self::Core(e.into())
    }
}
