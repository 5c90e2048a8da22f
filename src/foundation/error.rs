use crate::attr::value::ValueKind;

/// Convenience result type used across hwvenc.
pub type VencResult<T> = Result<T, VencError>;

/// Top-level error taxonomy used by the attribute store, stage configs and geometry calculator.
#[derive(thiserror::Error, Debug)]
pub enum VencError {
    /// Empty attribute name, out-of-range enum value or an unrepresentable result.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Unknown attribute key or unknown profile name.
    #[error("not found: {0}")]
    NotFound(String),

    /// The stored value kind differs from the kind the accessor asked for.
    #[error("type mismatch for '{name}': stored {stored}, requested {requested}")]
    TypeMismatch {
        /// Attribute key.
        name: String,
        /// Kind currently held by the store.
        stored: ValueKind,
        /// Kind requested by the caller.
        requested: ValueKind,
    },

    /// Memory for a store could not be reserved.
    #[error("allocation error: {0}")]
    Allocation(String),

    /// Coding type or pixel format not covered by the geometry table.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Errors when serializing or deserializing profiles and tables.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl VencError {
    /// Build a [`VencError::InvalidArgument`] value.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Build a [`VencError::NotFound`] value.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Build a [`VencError::Allocation`] value.
    pub fn allocation(msg: impl Into<String>) -> Self {
        Self::Allocation(msg.into())
    }

    /// Build a [`VencError::UnsupportedFormat`] value.
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::UnsupportedFormat(msg.into())
    }

    /// Build a [`VencError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Build a [`VencError::TypeMismatch`] value.
    pub fn type_mismatch(name: impl Into<String>, stored: ValueKind, requested: ValueKind) -> Self {
        Self::TypeMismatch {
            name: name.into(),
            stored,
            requested,
        }
    }

    /// True for errors that indicate a caller bug rather than a routine condition.
    ///
    /// `NotFound` and `UnsupportedFormat` are expected outcomes a caller branches on;
    /// `InvalidArgument` and `TypeMismatch` mean the caller broke the accessor contract.
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, Self::InvalidArgument(_) | Self::TypeMismatch { .. })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
