//! Domain error types

use thiserror::Error;

/// Errors raised while constructing or validating domain values
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// An entry name that cannot be joined onto a directory
    #[error("Invalid entry name: {0}")]
    InvalidEntryName(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DomainError::InvalidEntryName("a/b".to_string());
        assert_eq!(err.to_string(), "Invalid entry name: a/b");
    }

    #[test]
    fn test_error_equality() {
        let err1 = DomainError::InvalidEntryName("..".to_string());
        let err2 = DomainError::InvalidEntryName("..".to_string());
        let err3 = DomainError::InvalidEntryName(".".to_string());

        assert_eq!(err1, err2);
        assert_ne!(err1, err3);
    }
}
