//! Error types for the search layer.
//!
//! This module defines all error types used by the compiler, the reshaper and
//! the executors, following a hierarchy that separates request errors
//! (detected before any database call), configuration errors (detected at
//! load time) and backend errors (raised by the single execution call).

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use std::fmt;

use thiserror::Error;

/// The primary error type for all search operations.
#[derive(Error, Debug)]
pub enum SearchboxError {
    /// A numeric or facet filter token does not match its grammar.
    #[error("malformed filter '{token}': {reason}")]
    MalformedFilter { token: String, reason: String },

    /// The request violates the per-index allow-lists or pagination ceilings.
    #[error("request rejected: {}", ValidationIssue::fields(issues))]
    ValidationRejected { issues: Vec<ValidationIssue> },

    /// Host configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Backend-specific errors
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// Anything else.
    #[error("unexpected error: {message}")]
    Unknown { message: String },
}

impl SearchboxError {
    /// Creates a malformed filter error.
    pub fn malformed(token: impl Into<String>, reason: impl Into<String>) -> Self {
        SearchboxError::MalformedFilter {
            token: token.into(),
            reason: reason.into(),
        }
    }

    /// Creates a validation error for a single field.
    pub fn rejected(field: impl Into<String>, message: impl Into<String>) -> Self {
        SearchboxError::ValidationRejected {
            issues: vec![ValidationIssue::new(field, message)],
        }
    }

    /// Returns true when the error was detected before reaching the database.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            SearchboxError::MalformedFilter { .. } | SearchboxError::ValidationRejected { .. }
        )
    }
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// The offending request field (e.g. `hitsPerPage`).
    pub field: String,
    /// A human-readable description of the problem.
    pub message: String,
}

impl ValidationIssue {
    /// Creates a new issue.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Joins the field names of a list of issues, preserving order and
    /// dropping repeats.
    pub fn fields(issues: &[ValidationIssue]) -> String {
        let mut seen: Vec<&str> = Vec::with_capacity(issues.len());
        for issue in issues {
            if !seen.contains(&issue.field.as_str()) {
                seen.push(&issue.field);
            }
        }
        seen.join(", ")
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Errors in host-supplied index configuration. Fatal at load time.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The same attribute is declared in conflicting facet categories.
    #[error("duplicate facet configuration for attribute '{attribute}' in index {index}")]
    DuplicateFacetConfig { index: String, attribute: String },

    /// A facet declaration could not be parsed.
    #[error("invalid facet declaration '{declaration}' in index {index}")]
    InvalidFacetDeclaration { index: String, declaration: String },

    /// The configuration file could not be read or parsed.
    #[error("failed to load index configuration from {path}: {message}")]
    LoadFailed { path: String, message: String },
}

/// Errors raised by a database backend.
#[derive(Error, Debug)]
pub enum BackendError {
    /// A connection could not be acquired.
    #[error("connection to {backend_name} failed: {message}")]
    ConnectionFailed {
        backend_name: String,
        message: String,
    },

    /// The compiled statement failed at the engine.
    #[error("query failed on {backend_name}: {message}")]
    Query {
        backend_name: String,
        message: String,
    },

    /// The engine returned a row that does not have the expected shape.
    #[error("unexpected result from {backend_name}: {message}")]
    UnexpectedResult {
        backend_name: String,
        message: String,
    },
}

/// Result type alias for search operations.
pub type SearchboxResult<T> = Result<T, SearchboxError>;
