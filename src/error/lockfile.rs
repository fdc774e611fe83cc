//! Lockfile document errors

use super::PromptRegError;

/// Creates a lockfile parse failed error
pub fn parse_failed(path: impl Into<String>, reason: impl Into<String>) -> PromptRegError {
    PromptRegError::LockfileParseFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a lockfile write failed error
pub fn write_failed(path: impl Into<String>, reason: impl Into<String>) -> PromptRegError {
    PromptRegError::LockfileWriteFailed {
        path: path.into(),
        reason: reason.into(),
    }
}
