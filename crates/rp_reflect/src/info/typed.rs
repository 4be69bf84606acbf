use serde_core::de::{DeserializeSeed, Deserializer};

use crate::Reflect;
use crate::info::TypeInfo;

// -----------------------------------------------------------------------------
// Typed

/// A static accessor to compile-time type information.
///
/// Automatically implemented by the derive macro. Manual implementations
/// store the info in a [`NonGenericTypeInfoCell`] or, for generic types, a
/// [`GenericTypeInfoCell`].
///
/// [`NonGenericTypeInfoCell`]: crate::impls::NonGenericTypeInfoCell
/// [`GenericTypeInfoCell`]: crate::impls::GenericTypeInfoCell
pub trait Typed: Reflect {
    fn type_info() -> &'static TypeInfo;
}

/// Dynamic dispatch for [`Typed`].
///
/// Implemented for every `T: Typed` and used as a supertrait of [`Reflect`].
pub trait DynamicTyped {
    fn reflect_type_info(&self) -> &'static TypeInfo;
}

impl<T: Typed> DynamicTyped for T {
    #[inline]
    fn reflect_type_info(&self) -> &'static TypeInfo {
        T::type_info()
    }
}

// -----------------------------------------------------------------------------
// TypedSeed

/// A [`DeserializeSeed`] producing a boxed value of the described type.
#[derive(Clone, Copy, Debug)]
pub struct TypedSeed(pub &'static TypeInfo);

impl<'de> DeserializeSeed<'de> for TypedSeed {
    type Value = Box<dyn Reflect>;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        let mut erased = <dyn erased_serde::Deserializer>::erase(deserializer);
        self.0
            .ty()
            .deserialize(&mut erased)
            .map_err(<D::Error as serde_core::de::Error>::custom)
    }
}

// -----------------------------------------------------------------------------
// Tests
