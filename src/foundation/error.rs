use crate::expression::variable::ReferenceType;
use crate::foundation::core::ValueKind;

/// Convenience result type used across the crate.
pub type ValueRefResult<T> = Result<T, ValueRefError>;

/// Error taxonomy for expression construction and evaluation.
///
/// Every error is local to the `eval` call that produced it; evaluation is pure, so
/// callers usually log the error and skip the effect or condition being evaluated.
#[derive(thiserror::Error, Debug)]
pub enum ValueRefError {
    /// The object selected by a variable's reference type is absent from the context.
    #[error("reference error: no {reference} object in scripting context for `{path}`")]
    UnresolvedReference {
        /// Context slot the variable reads from.
        reference: ReferenceType,
        /// Dotted property path of the variable.
        path: String,
    },

    /// A property path could not be resolved on an object or the universe.
    #[error("property error: {0}")]
    Property(String),

    /// A dynamically typed value was read at the wrong type.
    #[error("type error: expected {expected}, found {found}")]
    TypeMismatch {
        /// Type the reader asked for.
        expected: ValueKind,
        /// Type actually carried.
        found: ValueKind,
    },

    /// Operator or statistic is not defined for the declared result type.
    #[error("invalid operation error: {0}")]
    InvalidOperation(String),

    /// Division by zero, logarithm of a non-positive value, overflow, non-finite result.
    #[error("arithmetic error: {0}")]
    Arithmetic(String),

    /// Malformed construction input or configuration document.
    #[error("configuration error: {0}")]
    Config(String),

    /// Wrapped lower-level error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ValueRefError {
    /// Build a [`ValueRefError::UnresolvedReference`] value.
    pub fn unresolved(reference: ReferenceType, path: impl Into<String>) -> Self {
        Self::UnresolvedReference {
            reference,
            path: path.into(),
        }
    }

    /// Build a [`ValueRefError::Property`] value.
    pub fn property(msg: impl Into<String>) -> Self {
        Self::Property(msg.into())
    }

    /// Build a [`ValueRefError::TypeMismatch`] value.
    pub fn type_mismatch(expected: ValueKind, found: ValueKind) -> Self {
        Self::TypeMismatch { expected, found }
    }

    /// Build a [`ValueRefError::InvalidOperation`] value.
    pub fn invalid_operation(msg: impl Into<String>) -> Self {
        Self::InvalidOperation(msg.into())
    }

    /// Build a [`ValueRefError::Arithmetic`] value.
    pub fn arithmetic(msg: impl Into<String>) -> Self {
        Self::Arithmetic(msg.into())
    }

    /// Build a [`ValueRefError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
