use core::fmt;

use crate::impls::GenericTypeInfoCell;
use crate::info::{OptionalInfo, TypeInfo, Typed};
use crate::ops::{ApplyError, Optional};
use crate::{FromReflect, Reflect, Reflectable};

impl<T: Reflectable> Typed for Option<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| TypeInfo::Optional(OptionalInfo::new::<Self, T>()))
    }
}

impl<T: Reflectable> Reflect for Option<T> {
    crate::reflection::impl_reflect_cast_fn!(Optional);

    /// Accepts another `Option<T>`, or anything `T` can be built from.
    fn try_apply(&mut self, value: &dyn Reflect) -> Result<(), ApplyError> {
        match Self::from_reflect(value) {
            Some(value) => {
                *self = value;
                Ok(())
            }
            None => Err(ApplyError::mismatched(value, self)),
        }
    }

    #[inline]
    fn reflect_clone(&self) -> Box<dyn Reflect> {
        Box::new(self.clone())
    }

    fn reflect_partial_eq(&self, other: &dyn Reflect) -> Option<bool> {
        let other = other.downcast_ref::<Self>()?;
        match (self, other) {
            (Some(a), Some(b)) => a.reflect_partial_eq(b),
            (None, None) => Some(true),
            _ => Some(false),
        }
    }

    #[inline]
    fn reset(&mut self) -> bool {
        *self = None;
        true
    }

    fn reflect_debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Some(value) => {
                f.write_str("Some(")?;
                value.reflect_debug(f)?;
                f.write_str(")")
            }
            None => f.write_str("None"),
        }
    }
}

impl<T: Reflectable> Optional for Option<T> {
    #[inline]
    fn value(&self) -> Option<&dyn Reflect> {
        self.as_ref().map(Reflect::as_reflect)
    }

    #[inline]
    fn value_mut(&mut self) -> Option<&mut dyn Reflect> {
        self.as_mut().map(Reflect::as_reflect_mut)
    }

    #[inline]
    fn set_none(&mut self) {
        *self = None;
    }
}

impl<T: Reflectable> FromReflect for Option<T> {
    fn from_reflect(reflect: &dyn Reflect) -> Option<Self> {
        if let Some(value) = reflect.downcast_ref::<Self>() {
            return Some(value.clone());
        }
        T::from_reflect(reflect).map(Some)
    }
}

// -----------------------------------------------------------------------------
// Tests
