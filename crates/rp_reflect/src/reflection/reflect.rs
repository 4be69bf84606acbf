use core::any::{Any, TypeId};
use core::fmt;

use crate::info::{DynamicTyped, ReflectKind};
use crate::ops::{ApplyError, ReflectMut, ReflectRef};

// -----------------------------------------------------------------------------
// Reflect

/// The core trait of the crate: a value whose shape is known at run time.
///
/// Implementations are provided for primitives, `String`, `Option`, the std
/// collections and maps, fixed-size arrays, and any type deriving
/// [`Reflect`](crate::derive::Reflect).
///
/// Every reflected value is also serializable through [`as_serialize`],
/// which is what the copy engine uses to produce independent copies of
/// values it cannot clone in place.
///
/// [`as_serialize`]: Reflect::as_serialize
pub trait Reflect: DynamicTyped + Send + Sync + Any {
    #[inline(always)]
    fn as_reflect(&self) -> &dyn Reflect
    where
        Self: Sized,
    {
        self
    }

    #[inline(always)]
    fn as_reflect_mut(&mut self) -> &mut dyn Reflect
    where
        Self: Sized,
    {
        self
    }

    #[inline(always)]
    fn into_boxed_reflect(self) -> Box<dyn Reflect>
    where
        Self: Sized,
    {
        Box::new(self)
    }

    /// Returns the [`TypeId`] of the underlying type.
    #[inline]
    fn ty_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    /// Replaces `self` with `value` if both have the same type.
    ///
    /// On mismatch the value is handed back unchanged.
    fn set(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>>;

    fn reflect_kind(&self) -> ReflectKind;

    fn reflect_ref(&self) -> ReflectRef<'_>;

    fn reflect_mut(&mut self) -> ReflectMut<'_>;

    /// Updates `self` from a value of a compatible type.
    ///
    /// Beyond same-type assignment, `Option<T>` accepts a bare `T` and
    /// `Lazy<T>` style placeholders accept their real value.
    fn try_apply(&mut self, value: &dyn Reflect) -> Result<(), ApplyError>;

    /// Returns an owned copy of `self` with the same concrete type.
    fn reflect_clone(&self) -> Box<dyn Reflect>;

    /// Value equality, `None` if the type does not support comparison.
    #[inline]
    fn reflect_partial_eq(&self, _other: &dyn Reflect) -> Option<bool> {
        None
    }

    /// Resets `self` to its blank value.
    ///
    /// Returns `false` if the type has no blank value, in which case `self`
    /// is left untouched.
    #[inline]
    fn reset(&mut self) -> bool {
        false
    }

    /// Returns `self` as a type-erased serde serializer input.
    fn as_serialize(&self) -> &dyn erased_serde::Serialize;

    fn reflect_debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Reflect({})", self.reflect_type_info().type_path())
    }
}

impl dyn Reflect {
    #[inline(always)]
    pub fn is<T: Any>(&self) -> bool {
        self.ty_id() == TypeId::of::<T>()
    }

    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        <dyn Any>::downcast_ref(self)
    }

    #[inline]
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        <dyn Any>::downcast_mut(self)
    }

    #[inline]
    pub fn downcast<T: Any>(self: Box<dyn Reflect>) -> Result<Box<T>, Box<dyn Reflect>> {
        if self.is::<T>() {
            #[expect(unsafe_code, reason = "type is already checked")]
            Ok(unsafe { <Box<dyn Any>>::downcast::<T>(self).unwrap_unchecked() })
        } else {
            Err(self)
        }
    }

    #[inline]
    pub fn take<T: Any>(self: Box<dyn Reflect>) -> Result<T, Box<dyn Reflect>> {
        self.downcast::<T>().map(|value| *value)
    }

    /// The short name of the underlying type, for diagnostics.
    #[inline]
    pub fn type_name(&self) -> String {
        self.reflect_type_info().type_name()
    }
}

impl fmt::Debug for dyn Reflect {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.reflect_debug(f)
    }
}

// -----------------------------------------------------------------------------
// Auxiliary macro

macro_rules! impl_reflect_cast_fn {
    ($kind:ident) => {
        fn set(
            &mut self,
            value: ::std::boxed::Box<dyn $crate::Reflect>,
        ) -> Result<(), ::std::boxed::Box<dyn $crate::Reflect>> {
            *self = value.take::<Self>()?;
            Ok(())
        }

        #[inline]
        fn reflect_kind(&self) -> $crate::info::ReflectKind {
            $crate::info::ReflectKind::$kind
        }

        #[inline]
        fn reflect_ref(&self) -> $crate::ops::ReflectRef<'_> {
            $crate::ops::ReflectRef::$kind(self)
        }

        #[inline]
        fn reflect_mut(&mut self) -> $crate::ops::ReflectMut<'_> {
            $crate::ops::ReflectMut::$kind(self)
        }

        #[inline]
        fn as_serialize(&self) -> &dyn $crate::__macro_exports::erased_serde::Serialize {
            self
        }
    };
}

pub(crate) use impl_reflect_cast_fn;

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use crate::Reflect;

    #[test]
    fn downcast_and_take() {
        let boxed: Box<dyn Reflect> = Box::new(7_i32);
        assert!(boxed.is::<i32>());
        assert_eq!(boxed.downcast_ref::<i32>(), Some(&7));

        let boxed = boxed.take::<u8>().unwrap_err();
        assert_eq!(boxed.take::<i32>().unwrap(), 7);
    }

    #[test]
    fn set_rejects_other_types() {
        let mut value = String::from("a");
        let back = value.set(Box::new(1_u8)).unwrap_err();
        assert!(back.is::<u8>());
        value.set(Box::new(String::from("b"))).unwrap();
        assert_eq!(value, "b");
    }

    #[test]
    fn short_type_name() {
        let value: &dyn Reflect = &vec![1_u8];
        assert_eq!(value.type_name(), "Vec<u8>");
    }
}
