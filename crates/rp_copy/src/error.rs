use thiserror::Error;

use crate::serializer::{SerializationKind, SerializerError};

// -----------------------------------------------------------------------------
// Error

/// Errors raised by [`ObjectCopier`](crate::ObjectCopier).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CopyError {
    #[error("The source object cannot be null")]
    NullSource,

    #[error("The destination object cannot be null")]
    NullDestination,

    #[error("There are no objects to copy")]
    EmptyInput,

    #[error("The target collection could not be created")]
    InvalidTarget,

    #[error("Field `{field}` of `{type_name}` could not be written")]
    FieldAccess {
        field: &'static str,
        type_name: String,
    },

    #[error("A value of `{type_name}` could not be cloned")]
    Clone {
        type_name: String,
        source: SerializerError,
    },

    #[error("No serializer adapter is configured for {kind}")]
    AdapterNotConfigured { kind: SerializationKind },

    #[error("`{type_name}` has no variant matching the expected value")]
    NoSuchVariant { type_name: String },
}
