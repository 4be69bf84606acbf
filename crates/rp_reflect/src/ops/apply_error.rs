use std::borrow::Cow;
use std::{error, fmt};

use crate::info::{ReflectKind, ReflectKindError};

/// A enumeration of all error outcomes that might happen when running [`try_apply`].
///
/// [`try_apply`]: crate::Reflect::try_apply
#[derive(Debug)]
pub enum ApplyError {
    /// Tried to apply incompatible types.
    MismatchedTypes {
        from_type: Cow<'static, str>,
        to_type: Cow<'static, str>,
    },
    /// Attempted to apply the wrong [kind](ReflectKind) to a type, e.g. a map to a list.
    MismatchedKinds {
        from_kind: ReflectKind,
        to_kind: ReflectKind,
    },
    /// Attempted to apply an array of a different size.
    DifferentSize { from_size: usize, to_size: usize },
}

impl fmt::Display for ApplyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MismatchedTypes { from_type, to_type } => {
                write!(f, "attempted to apply `{from_type}` to `{to_type}`")
            }
            Self::MismatchedKinds { from_kind, to_kind } => {
                write!(f, "attempted to apply `{from_kind}` to `{to_kind}`")
            }
            Self::DifferentSize { from_size, to_size } => {
                write!(
                    f,
                    "attempted to apply type with {from_size} size to {to_size} size"
                )
            }
        }
    }
}

impl error::Error for ApplyError {}

impl From<ReflectKindError> for ApplyError {
    #[inline]
    fn from(value: ReflectKindError) -> Self {
        Self::MismatchedKinds {
            from_kind: value.received,
            to_kind: value.expected,
        }
    }
}

impl ApplyError {
    /// Shorthand for [`ApplyError::MismatchedTypes`] between two reflected types.
    pub fn mismatched(from: &dyn crate::Reflect, to: &dyn crate::Reflect) -> Self {
        Self::MismatchedTypes {
            from_type: Cow::Borrowed(from.reflect_type_info().type_path()),
            to_type: Cow::Borrowed(to.reflect_type_info().type_path()),
        }
    }
}
