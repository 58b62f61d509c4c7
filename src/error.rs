//! Error types for dynamic minimum cut maintenance

use thiserror::Error;

/// Result type for mincut operations
pub type Result<T> = std::result::Result<T, MinCutError>;

/// Errors that can occur while maintaining a dynamic minimum cut
#[derive(Error, Debug)]
pub enum MinCutError {
    /// Graph is empty
    #[error("Graph is empty")]
    EmptyGraph,

    /// Invalid vertex ID
    #[error("Invalid vertex ID: {0}")]
    InvalidVertex(u32),

    /// Self-loop edge requested
    #[error("Self loop rejected: ({0}, {0})")]
    SelfLoop(u32),

    /// Edge not found
    #[error("Edge not found: ({0}, {1})")]
    EdgeNotFound(u32, u32),

    /// Instance was already initialized
    #[error("Dynamic instance already initialized")]
    AlreadyInitialized,

    /// Instance was not initialized before an update call
    #[error("Dynamic instance not initialized")]
    NotInitialized,

    /// Internal algorithm error
    #[error("Internal algorithm error: {0}")]
    InternalError(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<std::io::Error> for MinCutError {
    fn from(err: std::io::Error) -> Self {
        MinCutError::SerializationError(err.to_string())
    }
}

impl From<serde_json::Error> for MinCutError {
    fn from(err: serde_json::Error) -> Self {
        MinCutError::SerializationError(err.to_string())
    }
}

impl From<String> for MinCutError {
    fn from(msg: String) -> Self {
        MinCutError::InternalError(msg)
    }
}

impl From<&str> for MinCutError {
    fn from(msg: &str) -> Self {
        MinCutError::InternalError(msg.to_string())
    }
}

impl MinCutError {
    /// Check if the error is recoverable by the caller
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            MinCutError::InvalidVertex(_)
                | MinCutError::SelfLoop(_)
                | MinCutError::EdgeNotFound(_, _)
                | MinCutError::AlreadyInitialized
                | MinCutError::NotInitialized
        )
    }

    /// Check if the error indicates a bug inside the engine
    pub fn is_internal(&self) -> bool {
        matches!(self, MinCutError::InternalError(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MinCutError::InvalidVertex(42);
        assert_eq!(err.to_string(), "Invalid vertex ID: 42");

        let err = MinCutError::EdgeNotFound(1, 2);
        assert_eq!(err.to_string(), "Edge not found: (1, 2)");

        let err = MinCutError::EmptyGraph;
        assert_eq!(err.to_string(), "Graph is empty");
    }

    #[test]
    fn test_error_from_string() {
        let err: MinCutError = "synthesis failed".into();
        assert!(matches!(err, MinCutError::InternalError(_)));
        assert_eq!(
            err.to_string(),
            "Internal algorithm error: synthesis failed"
        );
    }

    #[test]
    fn test_is_recoverable() {
        assert!(MinCutError::EdgeNotFound(1, 2).is_recoverable());
        assert!(MinCutError::AlreadyInitialized.is_recoverable());
        assert!(!MinCutError::EmptyGraph.is_recoverable());
        assert!(!MinCutError::InternalError("x".to_string()).is_recoverable());
    }

    #[test]
    fn test_is_internal() {
        assert!(MinCutError::InternalError("x".to_string()).is_internal());
        assert!(!MinCutError::SelfLoop(3).is_internal());
    }
}
