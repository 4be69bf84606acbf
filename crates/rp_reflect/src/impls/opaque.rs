use core::fmt;

use crate::impls::NonGenericTypeInfoCell;
use crate::info::{OpaqueInfo, ScalarKind, TypeInfo, Typed};
use crate::ops::ApplyError;
use crate::{FromReflect, Reflect};

macro_rules! impl_opaque {
    ($scalar:ident => $($ty:ty),+ $(,)?) => {$(
        impl Typed for $ty {
            fn type_info() -> &'static TypeInfo {
                static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
                CELL.get_or_init(|| TypeInfo::Opaque(OpaqueInfo::new::<Self>(ScalarKind::$scalar)))
            }
        }

        impl Reflect for $ty {
            crate::reflection::impl_reflect_cast_fn!(Opaque);

            fn try_apply(&mut self, value: &dyn Reflect) -> Result<(), ApplyError> {
                match value.downcast_ref::<Self>() {
                    Some(value) => {
                        Clone::clone_from(self, value);
                        Ok(())
                    }
                    None => Err(ApplyError::mismatched(value, self)),
                }
            }

            #[inline]
            fn reflect_clone(&self) -> Box<dyn Reflect> {
                Box::new(Clone::clone(self))
            }

            fn reflect_partial_eq(&self, value: &dyn Reflect) -> Option<bool> {
                Some(
                    value
                        .downcast_ref::<Self>()
                        .is_some_and(|value| PartialEq::eq(self, value)),
                )
            }

            #[inline]
            fn reset(&mut self) -> bool {
                *self = Default::default();
                true
            }

            fn reflect_debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Debug::fmt(self, f)
            }
        }

        impl FromReflect for $ty {
            #[inline]
            fn from_reflect(reflect: &dyn Reflect) -> Option<Self> {
                reflect.downcast_ref::<Self>().cloned()
            }
        }
    )+};
}

impl_opaque!(Primitive => bool, char, f32, f64);
impl_opaque!(Primitive => u8, u16, u32, u64, u128, usize);
impl_opaque!(Primitive => i8, i16, i32, i64, i128, isize);

impl_opaque!(Simple => String);

#[cfg(feature = "uuid")]
impl_opaque!(Simple => uuid::Uuid);

#[cfg(feature = "chrono")]
impl_opaque!(Simple =>
    chrono::DateTime<chrono::Utc>,
    chrono::NaiveDate,
    chrono::NaiveDateTime,
    chrono::NaiveTime,
);

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use crate::Reflect;
    use crate::info::{ScalarKind, Typed};

    #[test]
    fn scalar_kinds() {
        let int = <i32 as Typed>::type_info().as_opaque().unwrap();
        assert_eq!(int.scalar(), ScalarKind::Primitive);
        let text = <String as Typed>::type_info().as_opaque().unwrap();
        assert_eq!(text.scalar(), ScalarKind::Simple);
    }

    #[test]
    fn primitive_default_value() {
        let info = <char as Typed>::type_info();
        let blank = info.ty().default_value().unwrap();
        assert_eq!(blank.downcast_ref::<char>(), Some(&'\0'));
    }

    #[test]
    fn apply_and_compare() {
        let mut value = 1_u64;
        value.try_apply(&5_u64).unwrap();
        assert_eq!(value, 5);
        assert!(value.try_apply(&5_u32).is_err());
        assert_eq!(value.reflect_partial_eq(&5_u64), Some(true));
        assert_eq!(value.reflect_partial_eq(&5_u32), Some(false));
    }

    #[test]
    fn reset_blanks_strings() {
        let mut value = String::from("text");
        assert!(value.reset());
        assert!(value.is_empty());
    }
}
