use std::collections::{BTreeMap, HashMap};

use crate::impls::GenericTypeInfoCell;
use crate::info::{MapFlavor, MapInfo, TypeInfo, Typed};
use crate::ops::{ApplyError, BoxedEntry, Map, map_partial_eq, rebuild_entries};
use crate::{FromReflect, Reflect, Reflectable};

macro_rules! impl_map {
    ($ty:ident, $flavor:ident $(, $bound:path)*) => {
        impl<K: Reflectable $(+ $bound)*, V: Reflectable> Typed for $ty<K, V> {
            fn type_info() -> &'static TypeInfo {
                static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
                CELL.get_or_insert::<Self>(|| {
                    TypeInfo::Map(MapInfo::new::<Self, K, V>(MapFlavor::$flavor))
                })
            }
        }

        impl<K: Reflectable $(+ $bound)*, V: Reflectable> Reflect for $ty<K, V> {
            crate::reflection::impl_reflect_cast_fn!(Map);

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

            #[inline]
            fn reflect_partial_eq(&self, other: &dyn Reflect) -> Option<bool> {
                map_partial_eq(self, other)
            }

            #[inline]
            fn reset(&mut self) -> bool {
                self.clear();
                true
            }
        }

        impl<K: Reflectable $(+ $bound)*, V: Reflectable> Map for $ty<K, V> {
            #[inline]
            fn len(&self) -> usize {
                <$ty<K, V>>::len(self)
            }

            fn iter(&self) -> Box<dyn Iterator<Item = (&dyn Reflect, &dyn Reflect)> + '_> {
                Box::new(<$ty<K, V>>::iter(self).map(|(k, v)| (k.as_reflect(), v.as_reflect())))
            }

            #[inline]
            fn flavor(&self) -> MapFlavor {
                MapFlavor::$flavor
            }

            fn rebuild(&self, entries: Vec<BoxedEntry>) -> Result<Box<dyn Reflect>, Vec<BoxedEntry>> {
                let entries = rebuild_entries::<K, V>(entries)?;
                Ok(Box::new(entries.into_iter().collect::<Self>()))
            }
        }

        impl<K: Reflectable $(+ $bound)*, V: Reflectable> FromReflect for $ty<K, V> {
            fn from_reflect(reflect: &dyn Reflect) -> Option<Self> {
                if let Some(value) = reflect.downcast_ref::<Self>() {
                    return Some(value.clone());
                }
                let map = reflect.reflect_ref().as_map().ok()?;
                map.iter()
                    .map(|(k, v)| Some((K::from_reflect(k)?, V::from_reflect(v)?)))
                    .collect()
            }
        }
    };
}

impl_map!(HashMap, Hash, Eq, core::hash::Hash);
impl_map!(BTreeMap, Sorted, Ord);

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, HashMap};

    use crate::Reflect;
    use crate::info::{MapFlavor, Typed};
    use crate::ops::{BoxedEntry, Map};

    #[test]
    fn key_and_value_info() {
        let info = <BTreeMap<String, u8> as Typed>::type_info().as_map().unwrap();
        assert_eq!(info.flavor(), MapFlavor::Sorted);
        assert!(info.key().unwrap().is::<String>());
        assert!(info.value().unwrap().is::<u8>());
    }

    #[test]
    fn rebuild_and_compare() {
        let source: HashMap<String, i32> = HashMap::from([("a".to_owned(), 1)]);
        let entries: Vec<BoxedEntry> = vec![(
            Box::new("b".to_owned()) as Box<dyn Reflect>,
            Box::new(2_i32) as Box<dyn Reflect>,
        )];
        let rebuilt = source.rebuild(entries).unwrap();

        let expected: HashMap<String, i32> = HashMap::from([("b".to_owned(), 2)]);
        assert_eq!(rebuilt.reflect_partial_eq(&expected), Some(true));
        assert_eq!(rebuilt.reflect_partial_eq(&source), Some(false));
    }
}
