use thiserror::Error;

/// Failures raised by the operations domain and its repositories
#[derive(Debug, Error)]
pub enum DomainError {
    /// The caller asked for something the domain cannot serve, such as an empty page
    #[error("invalid request: {0}")]
    Validation(String),

    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// The operation store could not be read or written
    #[error("operation store failure: {0}")]
    Storage(String),

    #[error("internal failure: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_message() {
        let error = DomainError::storage("connection reset");
        assert_eq!(error.to_string(), "operation store failure: connection reset");
    }

    #[test]
    fn test_validation_message() {
        let error = DomainError::validation("Page size must not be less than one");
        assert_eq!(
            error.to_string(),
            "invalid request: Page size must not be less than one"
        );
        assert!(matches!(error, DomainError::Validation(_)));
    }

    #[test]
    fn test_configuration_message() {
        let error = DomainError::configuration("postgres storage requires a database URL");
        assert!(matches!(error, DomainError::Configuration(_)));
        assert!(error.to_string().starts_with("invalid configuration"));
    }
}
