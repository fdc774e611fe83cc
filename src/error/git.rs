//! Git repository errors

use super::PromptRegError;

/// Creates a git operation failed error
pub fn operation_failed(message: impl Into<String>) -> PromptRegError {
    PromptRegError::GitOperationFailed {
        message: message.into(),
    }
}

/// Creates a repository not found error
pub fn repository_not_found(path: impl Into<String>) -> PromptRegError {
    PromptRegError::RepositoryNotFound { path: path.into() }
}
