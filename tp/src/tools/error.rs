//! Tool error types

use thiserror::Error;

/// Errors raised while invoking a capability
///
/// These never escape the dispatcher: each is recorded as the `error` outcome
/// of the invocation that raised it.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The capability ran and reported a failure; the message is passed through verbatim
    #[error("{0}")]
    Failed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_message_is_verbatim() {
        let err = ToolError::Failed("Empty response received from model.".to_string());
        assert_eq!(err.to_string(), "Empty response received from model.");
    }

    #[test]
    fn test_invalid_argument_message() {
        let err = ToolError::InvalidArgument("Missing required parameter: destination".to_string());
        assert!(err.to_string().contains("destination"));
    }
}
