use std::collections::{BTreeSet, HashSet, VecDeque};

use crate::impls::GenericTypeInfoCell;
use crate::info::{CollectionFlavor, CollectionInfo, TypeInfo, Typed};
use crate::ops::{ApplyError, Collection, collection_partial_eq, rebuild_items};
use crate::{FromReflect, Reflect, Reflectable};

macro_rules! impl_collection {
    ($ty:ident, $flavor:ident $(, $bound:path)*) => {
        impl<T: Reflectable $(+ $bound)*> Typed for $ty<T> {
            fn type_info() -> &'static TypeInfo {
                static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
                CELL.get_or_insert::<Self>(|| {
                    TypeInfo::Collection(CollectionInfo::new::<Self, T>(CollectionFlavor::$flavor))
                })
            }
        }

        impl<T: Reflectable $(+ $bound)*> Reflect for $ty<T> {
            crate::reflection::impl_reflect_cast_fn!(Collection);

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
                collection_partial_eq(self, other)
            }

            #[inline]
            fn reset(&mut self) -> bool {
                self.clear();
                true
            }
        }

        impl<T: Reflectable $(+ $bound)*> Collection for $ty<T> {
            #[inline]
            fn len(&self) -> usize {
                <$ty<T>>::len(self)
            }

            fn iter(&self) -> Box<dyn Iterator<Item = &dyn Reflect> + '_> {
                // `Vec::iter` is a slice method, so name the by-ref iterator.
                Box::new(<&$ty<T> as IntoIterator>::into_iter(self).map(|item| item as &dyn Reflect))
            }

            #[inline]
            fn flavor(&self) -> CollectionFlavor {
                CollectionFlavor::$flavor
            }

            fn rebuild(
                &self,
                items: Vec<Box<dyn Reflect>>,
            ) -> Result<Box<dyn Reflect>, Vec<Box<dyn Reflect>>> {
                let items = rebuild_items::<T>(items)?;
                Ok(Box::new(items.into_iter().collect::<Self>()))
            }
        }

        impl<T: Reflectable $(+ $bound)*> FromReflect for $ty<T> {
            fn from_reflect(reflect: &dyn Reflect) -> Option<Self> {
                if let Some(value) = reflect.downcast_ref::<Self>() {
                    return Some(value.clone());
                }
                let collection = reflect.reflect_ref().as_collection().ok()?;
                collection.iter().map(T::from_reflect).collect()
            }
        }
    };
}

impl_collection!(Vec, List);
impl_collection!(VecDeque, Queue);
impl_collection!(HashSet, Set, Eq, core::hash::Hash);
impl_collection!(BTreeSet, SortedSet, Ord);

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use std::collections::{BTreeSet, HashSet, VecDeque};

    use crate::info::{CollectionFlavor, Typed};
    use crate::ops::{Collection, DynamicCollection};
    use crate::{FromReflect, Reflect};

    #[test]
    fn element_info() {
        let info = <Vec<String> as Typed>::type_info().as_collection().unwrap();
        assert_eq!(info.flavor(), CollectionFlavor::List);
        assert!(info.element().unwrap().is::<String>());

        let erased = <DynamicCollection as Typed>::type_info().as_collection().unwrap();
        assert!(erased.element().is_none());
    }

    #[test]
    fn rebuild_converts_items() {
        let source: VecDeque<u8> = VecDeque::from([1, 2]);
        let items: Vec<Box<dyn Reflect>> = vec![Box::new(3_u8), Box::new(4_u8)];
        let rebuilt = source.rebuild(items).unwrap();
        assert_eq!(
            rebuilt.downcast_ref::<VecDeque<u8>>(),
            Some(&VecDeque::from([3, 4]))
        );
    }

    #[test]
    fn rebuild_returns_items_on_mismatch() {
        let source: Vec<u8> = Vec::new();
        let items: Vec<Box<dyn Reflect>> = vec![Box::new(3_u8), Box::new("x".to_owned())];
        let items = source.rebuild(items).unwrap_err();
        assert_eq!(items.len(), 2);
        assert!(items[1].is::<String>());
    }

    #[test]
    fn iter_visits_every_item() {
        let list: Vec<u8> = vec![1, 2, 3];
        let items: Vec<u8> = Collection::iter(&list)
            .filter_map(|item| item.downcast_ref::<u8>().copied())
            .collect();
        assert_eq!(items, [1, 2, 3]);

        let queue: VecDeque<u8> = VecDeque::from([4, 5]);
        assert_eq!(Collection::iter(&queue).count(), 2);

        let copy = Vec::<u8>::from_reflect(&list as &dyn Reflect).unwrap();
        assert_eq!(copy, list);
        assert_eq!(list.reflect_partial_eq(&vec![1_u8, 2, 3]), Some(true));
    }

    #[test]
    fn sets_compare_by_membership() {
        let a: HashSet<i32> = HashSet::from([1, 2, 3]);
        let b: BTreeSet<i32> = BTreeSet::from([3, 2, 1]);
        assert_eq!(a.reflect_partial_eq(&b), Some(true));
    }

    #[test]
    fn from_dynamic_collection() {
        let values: Vec<Box<dyn Reflect>> = vec![Box::new(1_i64), Box::new(2_i64)];
        let dynamic = DynamicCollection::from_values(CollectionFlavor::List, values);
        assert_eq!(Vec::<i64>::from_reflect(&dynamic), Some(vec![1, 2]));
    }
}
