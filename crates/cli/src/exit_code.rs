//! Exit code definitions for the simple API example
//!
//! Argument errors exit with 1; every runtime failure exits with a code
//! of 2 or above so scripts can tell the two apart.

use dc_core::Error;

/// Exit codes for the example program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// The whole sequence completed successfully
    Success = 0,

    /// Missing or malformed command-line arguments
    UsageError = 1,

    /// General/unspecified error, including local file problems
    GeneralError = 2,

    /// Network failure or malformed response
    NetworkError = 3,

    /// Authentication or permission failure
    AuthError = 4,

    /// Remote space or content does not exist
    NotFound = 5,

    /// Conflict or checksum mismatch
    Conflict = 6,
}

impl ExitCode {
    /// Convert exit code to i32 for use with std::process::exit
    #[inline]
    pub const fn as_i32(self) -> i32 {
        self as i32
    }

    /// Create exit code from i32 value
    ///
    /// Returns None if the value doesn't correspond to a known exit code.
    pub const fn from_i32(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Success),
            1 => Some(Self::UsageError),
            2 => Some(Self::GeneralError),
            3 => Some(Self::NetworkError),
            4 => Some(Self::AuthError),
            5 => Some(Self::NotFound),
            6 => Some(Self::Conflict),
            _ => None,
        }
    }

    /// Exit code for a failed run
    pub const fn from_error(error: &Error) -> Self {
        match Self::from_i32(error.exit_code()) {
            Some(code) => code,
            None => Self::GeneralError,
        }
    }

    /// Get a human-readable description of the exit code
    pub const fn description(self) -> &'static str {
        match self {
            Self::Success => "Operation completed successfully",
            Self::UsageError => "Invalid arguments",
            Self::GeneralError => "General error",
            Self::NetworkError => "Network error",
            Self::AuthError => "Authentication or permission failure",
            Self::NotFound => "Resource not found",
            Self::Conflict => "Conflict or checksum mismatch",
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.as_i32()
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.description(), self.as_i32())
    }
}
