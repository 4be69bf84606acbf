use serde_core::de::DeserializeOwned;

use crate::Reflect;
use crate::info::Type;

/// How an opaque value behaves when copied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// A machine primitive: `bool`, `char`, integers and floats.
    Primitive,
    /// An immutable-ish scalar such as `String`, `Uuid` or a date.
    Simple,
    /// Anything else without inner structure.
    Other,
}

/// A container for compile-time info of a type without reflected structure.
#[derive(Debug)]
pub struct OpaqueInfo {
    ty: Type,
    scalar: ScalarKind,
}

impl OpaqueInfo {
    pub fn new<T: Reflect + DeserializeOwned + Default>(scalar: ScalarKind) -> Self {
        Self {
            ty: Type::of::<T>().with_default::<T>(),
            scalar,
        }
    }

    #[inline]
    pub fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub fn scalar(&self) -> ScalarKind {
        self.scalar
    }

    #[inline]
    pub fn is_primitive(&self) -> bool {
        self.scalar == ScalarKind::Primitive
    }
}
