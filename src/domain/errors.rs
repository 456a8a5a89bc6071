//! Validation errors raised when a mutation would put a slice into an invalid state

/// A rejected mutation. The slice is left untouched when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Unknown {field} value: {value}")]
    UnknownValue { field: &'static str, value: String },
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
        value: i64,
    },
    #[error("{field} is invalid: {reason}")]
    Invalid { field: &'static str, reason: String },
    #[error("{0} is required")]
    Required(&'static str),
    #[error("{field} references an unknown character: {id}")]
    DanglingReference { field: &'static str, id: String },
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
    #[error("Invalid fields for {slice}: {message}")]
    Schema { slice: &'static str, message: String },
}

impl ValidationError {
    pub(crate) fn out_of_range(field: &'static str, min: i64, max: i64, value: i64) -> Self {
        Self::OutOfRange {
            field,
            min,
            max,
            value,
        }
    }

    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}
