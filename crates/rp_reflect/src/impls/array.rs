use serde_core::Serialize;
use serde_core::de::DeserializeOwned;

use crate::impls::GenericTypeInfoCell;
use crate::info::{ArrayInfo, TypeInfo, Typed};
use crate::ops::{ApplyError, Array, ReflectRef};
use crate::{FromReflect, Reflect, Reflectable};

impl<T: Reflectable, const N: usize> Typed for [T; N]
where
    [T; N]: Serialize + DeserializeOwned,
{
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| TypeInfo::Array(ArrayInfo::new::<Self, T>(N)))
    }
}

impl<T: Reflectable, const N: usize> Reflect for [T; N]
where
    [T; N]: Serialize + DeserializeOwned,
{
    crate::reflection::impl_reflect_cast_fn!(Array);

    fn try_apply(&mut self, value: &dyn Reflect) -> Result<(), ApplyError> {
        let ReflectRef::Array(array) = value.reflect_ref() else {
            return Err(ApplyError::mismatched(value, self));
        };
        if array.len() != N {
            return Err(ApplyError::DifferentSize {
                from_size: array.len(),
                to_size: N,
            });
        }
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
        let ReflectRef::Array(other) = other.reflect_ref() else {
            return Some(false);
        };
        if other.len() != N {
            return Some(false);
        }
        let equal = self
            .iter()
            .zip(other.iter())
            .all(|(a, b)| a.reflect_partial_eq(b) == Some(true));
        Some(equal)
    }
}

impl<T: Reflectable, const N: usize> Array for [T; N]
where
    [T; N]: Serialize + DeserializeOwned,
{
    #[inline]
    fn len(&self) -> usize {
        N
    }

    #[inline]
    fn get(&self, index: usize) -> Option<&dyn Reflect> {
        <[T]>::get(self, index).map(Reflect::as_reflect)
    }

    fn iter(&self) -> Box<dyn Iterator<Item = &dyn Reflect> + '_> {
        Box::new(<[T]>::iter(self).map(Reflect::as_reflect))
    }
}

impl<T: Reflectable, const N: usize> FromReflect for [T; N]
where
    [T; N]: Serialize + DeserializeOwned,
{
    fn from_reflect(reflect: &dyn Reflect) -> Option<Self> {
        if let Some(value) = reflect.downcast_ref::<Self>() {
            return Some(value.clone());
        }
        let ReflectRef::Array(array) = reflect.reflect_ref() else {
            return None;
        };
        let items: Vec<T> = array.iter().map(T::from_reflect).collect::<Option<_>>()?;
        items.try_into().ok()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use crate::info::Typed;
    use crate::ops::{ApplyError, Array};
    use crate::{FromReflect, Reflect};

    #[test]
    fn array_info_and_access() {
        let info = <[u16; 3] as Typed>::type_info().as_array().unwrap();
        assert_eq!(info.capacity(), 3);
        assert!(info.item().is::<u16>());

        let value = [1_u16, 2, 3];
        assert_eq!(Array::get(&value, 1).and_then(|v| v.downcast_ref::<u16>()), Some(&2));
        assert!(Array::get(&value, 3).is_none());
    }

    #[test]
    fn apply_checks_size() {
        let mut value = [0_u8; 2];
        value.try_apply(&[4_u8, 5]).unwrap();
        assert_eq!(value, [4, 5]);

        let err = value.try_apply(&[1_u8, 2, 3]).unwrap_err();
        assert!(matches!(err, ApplyError::DifferentSize { from_size: 3, to_size: 2 }));
    }

    #[test]
    fn from_reflect_converts_items() {
        let source = [1_u8, 2];
        assert_eq!(<[u8; 2]>::from_reflect(&source), Some([1, 2]));
        assert_eq!(<[i64; 2]>::from_reflect(&source), None);
    }
}
