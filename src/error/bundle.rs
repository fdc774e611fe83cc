//! Bundle-related errors

use super::PromptRegError;

/// Creates a bundle not found error
pub fn not_found(name: impl Into<String>) -> PromptRegError {
    PromptRegError::BundleNotFound { name: name.into() }
}

/// Creates an error for a bundle missing from the lockfile a commit-mode
/// switch expects it in
pub fn not_found_in_lockfile(
    name: impl Into<String>,
    lockfile: impl Into<String>,
) -> PromptRegError {
    PromptRegError::BundleNotFoundInLockfile {
        name: name.into(),
        lockfile: lockfile.into(),
    }
}

/// Creates an invalid bundle id error
pub fn invalid_id(name: impl Into<String>) -> PromptRegError {
    PromptRegError::InvalidBundleId { name: name.into() }
}
