//! Unified error type for the domain layer

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// Validation failed (e.g., invalid field values)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Entity not found
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Parse error (for value objects)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Imported plan JSON was rejected before replacing anything
    #[error("Invalid plan import: {0}")]
    InvalidImport(String),

    /// Level outside 1..=20
    #[error("Invalid level: {0} (expected 1-20)")]
    InvalidLevel(u8),

    /// Write attempted on a level whose choices were already applied
    #[error("Level {0} has already been applied")]
    LevelApplied(u8),
}

impl DomainError {
    /// Creates a validation error for business rule violations.
    ///
    /// # Example
    /// ```
    /// use levelwright_domain::DomainError;
    ///
    /// let err = DomainError::validation("duplicate ability boost");
    /// assert_eq!(err.to_string(), "Validation failed: duplicate ability boost");
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a parse error for string-to-type conversion failures.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn invalid_import(msg: impl Into<String>) -> Self {
        Self::InvalidImport(msg.into())
    }
}
