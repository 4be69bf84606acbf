use core::fmt;

use rp_reflect::Reflect;
use rp_reflect::info::TypeInfo;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::serializer::Shape;

// -----------------------------------------------------------------------------
// SerializationKind

/// The text formats a [`SerializerAdapter`] can speak.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SerializationKind {
    #[default]
    Json,
    Ron,
}

impl fmt::Display for SerializationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => f.pad("JSON"),
            Self::Ron => f.pad("RON"),
        }
    }
}

// -----------------------------------------------------------------------------
// SerializerError

/// A serialization or deserialization failure, with the format's message.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct SerializerError {
    message: String,
}

impl SerializerError {
    pub fn custom(message: impl fmt::Display) -> Self {
        Self {
            message: message.to_string(),
        }
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

macro_rules! impl_from_error {
    ($($ty:ty),+ $(,)?) => {$(
        impl From<$ty> for SerializerError {
            #[inline]
            fn from(err: $ty) -> Self {
                Self::custom(err)
            }
        }
    )+};
}

impl_from_error!(
    serde_json::Error,
    ron::Error,
    ron::error::SpannedError,
    postcard::Error,
);

// -----------------------------------------------------------------------------
// SerializerAdapter

/// Converts reflected values to text and back.
///
/// Implementations must be stateless or internally synchronized, one adapter
/// is shared by every copy running on an [`ObjectCopier`](crate::ObjectCopier).
pub trait SerializerAdapter: Send + Sync {
    fn kind(&self) -> SerializationKind;

    fn to_text(&self, value: &dyn erased_serde::Serialize) -> Result<String, SerializerError>;

    /// Reads a value whose shape may only be known at run time.
    fn from_text_shaped(&self, text: &str, shape: &Shape) -> Result<Box<dyn Reflect>, SerializerError>;

    /// Reads a value of one concrete type.
    fn from_text(&self, text: &str, info: &'static TypeInfo) -> Result<Box<dyn Reflect>, SerializerError> {
        self.from_text_shaped(text, &Shape::Type(info))
    }

    /// Writes `value` and reads it back as `shape`.
    fn round_trip(&self, value: &dyn Reflect, shape: &Shape) -> Result<Box<dyn Reflect>, SerializerError> {
        let text = self.to_text(value.as_serialize())?;
        self.from_text_shaped(&text, shape)
    }
}
