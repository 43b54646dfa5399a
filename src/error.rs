//! Error types for the model registry.
//!
//! This module defines all error types using `thiserror` for ergonomic error handling.
//! Registration errors are configuration or programming mistakes and are expected to
//! surface at application startup.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Cannot introspect model '{model}': {reason}")]
    IntrospectionFailure { model: String, reason: String },

    #[error("Column '{column}' on model '{model}' has no matching data field")]
    MissingDataField { model: String, column: String },

    #[error("Accessor for column '{column}' on model '{model}' failed: {reason}")]
    AccessorFailure {
        model: String,
        column: String,
        reason: String,
    },

    #[error("Column '{column}' is declared more than once on model '{model}'")]
    DuplicateColumn { model: String, column: String },

    #[error("Model '{model}' is already registered")]
    AlreadyRegistered { model: String },

    #[error("Model '{model}' is not registered. Call register() during initialization.")]
    NotRegistered { model: String },

    #[error("Column '{column}' not found on model '{model}'")]
    ColumnNotFound { model: String, column: String },

    #[error("Invalid config: {message}")]
    InvalidConfig { message: String },
}

impl RegistryError {
    /// Create an introspection failure.
    pub fn introspection(model: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::IntrospectionFailure {
            model: model.into(),
            reason: reason.into(),
        }
    }

    /// Create a missing data field error.
    pub fn missing_data_field(model: impl Into<String>, column: impl Into<String>) -> Self {
        Self::MissingDataField {
            model: model.into(),
            column: column.into(),
        }
    }

    /// Create an accessor failure.
    pub fn accessor(
        model: impl Into<String>,
        column: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::AccessorFailure {
            model: model.into(),
            column: column.into(),
            reason: reason.into(),
        }
    }

    /// Create a duplicate column error.
    pub fn duplicate_column(model: impl Into<String>, column: impl Into<String>) -> Self {
        Self::DuplicateColumn {
            model: model.into(),
            column: column.into(),
        }
    }

    /// Create an already registered error.
    pub fn already_registered(model: impl Into<String>) -> Self {
        Self::AlreadyRegistered {
            model: model.into(),
        }
    }

    /// Create a not registered error.
    pub fn not_registered(model: impl Into<String>) -> Self {
        Self::NotRegistered {
            model: model.into(),
        }
    }

    /// Create a column not found error.
    pub fn column_not_found(model: impl Into<String>, column: impl Into<String>) -> Self {
        Self::ColumnNotFound {
            model: model.into(),
            column: column.into(),
        }
    }

    /// Create an invalid config error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Get the model name this error refers to, if any.
    pub fn model(&self) -> Option<&str> {
        match self {
            Self::IntrospectionFailure { model, .. }
            | Self::MissingDataField { model, .. }
            | Self::AccessorFailure { model, .. }
            | Self::DuplicateColumn { model, .. }
            | Self::AlreadyRegistered { model }
            | Self::NotRegistered { model }
            | Self::ColumnNotFound { model, .. } => Some(model),
            Self::InvalidConfig { .. } => None,
        }
    }

    /// Check if this error comes from a malformed model or configuration,
    /// as opposed to a failure while reading an instance.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::IntrospectionFailure { .. }
                | Self::MissingDataField { .. }
                | Self::DuplicateColumn { .. }
                | Self::AlreadyRegistered { .. }
                | Self::InvalidConfig { .. }
        )
    }
}

/// Result type alias for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;
