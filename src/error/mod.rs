//! Error types and handling for Prompt Registry
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! This module is organized into sub-modules by error domain:
//! - [`bundle`]: Bundle-related errors
//! - [`lockfile`]: Lockfile document errors
//! - [`config`]: Configuration/schema errors
//! - [`git`]: Git repository errors
//! - [`fs`]: File system errors

// Declare submodules
pub mod bundle;
pub mod config;
pub mod fs;
pub mod git;
pub mod lockfile;

// Re-export convenience constructors from submodules
#[allow(unused_imports)]
pub use bundle::{
    invalid_id as invalid_bundle_id, not_found as bundle_not_found,
    not_found_in_lockfile as bundle_not_found_in_lockfile,
};
#[allow(unused_imports)]
pub use config::invalid as config_invalid;
#[allow(unused_imports)]
pub use fs::{
    io_error, not_found as file_not_found, read_failed as file_read_failed,
    write_failed as file_write_failed,
};
#[allow(unused_imports)]
pub use git::{operation_failed as git_operation_failed, repository_not_found};
#[allow(unused_imports)]
pub use lockfile::{parse_failed as lockfile_parse_failed, write_failed as lockfile_write_failed};

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for Prompt Registry operations
#[derive(Error, Diagnostic, Debug)]
pub enum PromptRegError {
    // Bundle errors
    #[error("Bundle '{name}' is not installed")]
    #[diagnostic(
        code(promptreg::bundle::not_found),
        help("Run 'promptreg list' to see installed bundles")
    )]
    BundleNotFound { name: String },

    #[error("Bundle '{name}' not found in {lockfile}")]
    #[diagnostic(
        code(promptreg::bundle::not_found_in_lockfile),
        help(
            "The bundle must already be recorded in that lockfile before its commit mode can change"
        )
    )]
    BundleNotFoundInLockfile { name: String, lockfile: String },

    #[error("Invalid bundle id: {name}")]
    #[diagnostic(
        code(promptreg::bundle::invalid_id),
        help("Bundle ids must be non-empty and must not contain path separators")
    )]
    InvalidBundleId { name: String },

    // Lockfile errors
    #[error("Failed to parse lockfile: {path}")]
    #[diagnostic(code(promptreg::lockfile::parse_failed))]
    LockfileParseFailed { path: String, reason: String },

    #[error("Failed to write lockfile: {path}")]
    #[diagnostic(code(promptreg::lockfile::write_failed))]
    LockfileWriteFailed { path: String, reason: String },

    // Configuration errors
    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(promptreg::config::invalid))]
    ConfigInvalid { message: String },

    // Git errors
    #[error("Git operation failed: {message}")]
    #[diagnostic(code(promptreg::git::operation_failed))]
    GitOperationFailed { message: String },

    #[error("Not in a git repository")]
    #[diagnostic(
        code(promptreg::git::not_in_repo),
        help(
            "Prompt Registry commands must be run from within a git repository. Run 'git init' to create one."
        )
    )]
    NotInGitRepository,

    #[error("Repository not found at: {path}")]
    #[diagnostic(code(promptreg::git::repository_not_found))]
    RepositoryNotFound { path: String },

    // File system errors
    #[error("File not found: {path}")]
    #[diagnostic(code(promptreg::fs::not_found))]
    FileNotFound { path: String },

    #[error("Failed to read file: {path}")]
    #[diagnostic(code(promptreg::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to write file: {path}")]
    #[diagnostic(code(promptreg::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(promptreg::fs::io_error))]
    IoError { message: String },
}

impl From<std::io::Error> for PromptRegError {
    fn from(err: std::io::Error) -> Self {
        PromptRegError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for PromptRegError {
    fn from(err: serde_json::Error) -> Self {
        PromptRegError::LockfileParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<git2::Error> for PromptRegError {
    fn from(err: git2::Error) -> Self {
        PromptRegError::GitOperationFailed {
            message: err.to_string(),
        }
    }
}

impl From<inquire::InquireError> for PromptRegError {
    fn from(err: inquire::InquireError) -> Self {
        PromptRegError::IoError {
            message: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, PromptRegError>;

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_error_contains {
        ($test_name:ident, $err:expr, $($contains:expr),+ $(,)?) => {
            #[test]
            fn $test_name() {
                let err = $err;
                let error_string = err.to_string();
                $(
                    assert!(error_string.contains($contains),
                        "Error message should contain '{}', got: {}",
                        $contains,
                        error_string
                    );
                )+
            }
        };
    }

    #[test]
    fn test_error_display() {
        let err = PromptRegError::BundleNotFound {
            name: "test-bundle".to_string(),
        };
        assert_eq!(err.to_string(), "Bundle 'test-bundle' is not installed");
    }

    #[test]
    fn test_error_code() {
        let err = PromptRegError::BundleNotFound {
            name: "test".to_string(),
        };
        assert_eq!(
            err.code().map(|c| c.to_string()),
            Some("promptreg::bundle::not_found".to_string())
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let reg_err: PromptRegError = io_err.into();
        assert!(matches!(reg_err, PromptRegError::IoError { .. }));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_str = "invalid json content";
        let parse_result: std::result::Result<serde_json::Value, _> =
            serde_json::from_str(json_str);
        let json_err = parse_result.unwrap_err();
        let reg_err: PromptRegError = json_err.into();
        assert!(matches!(reg_err, PromptRegError::LockfileParseFailed { .. }));
    }

    #[test]
    fn test_git_error_conversion() {
        let git_err = git2::Error::from_str("git error");
        let reg_err: PromptRegError = git_err.into();
        assert!(matches!(reg_err, PromptRegError::GitOperationFailed { .. }));
    }

    test_error_contains!(
        test_not_in_git_repository_error,
        PromptRegError::NotInGitRepository,
        "Not in a git repository"
    );

    #[test]
    fn test_bundle_not_found_in_lockfile() {
        let err = bundle_not_found_in_lockfile("b1", "commit lockfile");
        assert!(matches!(
            err,
            PromptRegError::BundleNotFoundInLockfile { .. }
        ));
        assert_eq!(err.to_string(), "Bundle 'b1' not found in commit lockfile");
    }

    #[test]
    fn test_invalid_bundle_id() {
        let err = invalid_bundle_id("../escape");
        assert!(matches!(err, PromptRegError::InvalidBundleId { .. }));
        assert!(err.to_string().contains("Invalid bundle id"));
    }

    #[test]
    fn test_lockfile_parse_failed() {
        let err = lockfile_parse_failed("/repo/prompt-registry.lock.json", "unexpected EOF");
        assert!(matches!(err, PromptRegError::LockfileParseFailed { .. }));
        assert!(err.to_string().contains("Failed to parse lockfile"));
    }

    #[test]
    fn test_lockfile_write_failed() {
        let err = lockfile_write_failed("/repo/prompt-registry.lock.json", "disk full");
        assert!(matches!(err, PromptRegError::LockfileWriteFailed { .. }));
        assert!(err.to_string().contains("Failed to write lockfile"));
    }

    #[test]
    fn test_config_invalid() {
        let err = config_invalid("missing required field 'version'");
        assert!(matches!(err, PromptRegError::ConfigInvalid { .. }));
        assert!(err.to_string().contains("Invalid configuration"));
    }

    #[test]
    fn test_repository_not_found() {
        let err = repository_not_found("/path/to/repo");
        assert!(matches!(err, PromptRegError::RepositoryNotFound { .. }));
        assert!(err.to_string().contains("Repository not found"));
    }

    #[test]
    fn test_file_errors() {
        assert!(matches!(
            file_not_found("/f"),
            PromptRegError::FileNotFound { .. }
        ));
        assert!(matches!(
            file_read_failed("/f", "denied"),
            PromptRegError::FileReadFailed { .. }
        ));
        assert!(matches!(
            file_write_failed("/f", "denied"),
            PromptRegError::FileWriteFailed { .. }
        ));
        assert!(matches!(io_error("boom"), PromptRegError::IoError { .. }));
    }
}
