//! Configuration errors

use super::PromptRegError;

/// Creates an invalid config error
pub fn invalid(message: impl Into<String>) -> PromptRegError {
    PromptRegError::ConfigInvalid {
        message: message.into(),
    }
}
