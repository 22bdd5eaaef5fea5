// src/exit.rs

//! Process exit codes.

use std::fmt;

/// The integer status reported by a terminated process.
///
/// Non-zero exit codes are data, not errors: success codes vary by tool, so
/// the caller decides which code counts as success. The `_against` variants
/// take a caller-supplied success code; the plain variants compare against
/// [`ExitCode::SUCCESS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExitCode(i32);

impl ExitCode {
    /// The conventional success code, 0.
    pub const SUCCESS: ExitCode = ExitCode(0);

    /// The conventional general-error code, 1.
    pub const ERROR: ExitCode = ExitCode(1);

    pub const fn new(value: i32) -> Self {
        ExitCode(value)
    }

    pub const fn value(self) -> i32 {
        self.0
    }

    pub fn is_success(self) -> bool {
        self.is_success_against(ExitCode::SUCCESS)
    }

    pub fn is_failure(self) -> bool {
        !self.is_success()
    }

    pub fn is_success_against(self, success: ExitCode) -> bool {
        self.0 == success.0
    }

    pub fn is_failure_against(self, success: ExitCode) -> bool {
        !self.is_success_against(success)
    }
}

impl From<i32> for ExitCode {
    fn from(value: i32) -> Self {
        ExitCode(value)
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
