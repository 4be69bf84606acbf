use std::fmt;

use serde_core::de::{DeserializeSeed, Deserializer, SeqAccess, Visitor};
use serde_core::ser::{SerializeSeq, Serializer};
use serde_core::{Deserialize, Serialize};

use crate::impls::NonGenericTypeInfoCell;
use crate::info::{CollectionFlavor, CollectionInfo, TypeInfo, Typed, TypedSeed};
use crate::ops::{ApplyError, ReflectRef};
use crate::{FromReflect, Reflect};

// -----------------------------------------------------------------------------
// Collection

/// A trait used to power list, queue and set operations via reflection.
pub trait Collection: Reflect {
    fn len(&self) -> usize;

    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn iter(&self) -> Box<dyn Iterator<Item = &dyn Reflect> + '_>;

    fn flavor(&self) -> CollectionFlavor;

    /// Builds a collection of the same concrete type from `items`.
    ///
    /// Items are returned unchanged if any of them cannot be converted into
    /// the element type.
    fn rebuild(
        &self,
        items: Vec<Box<dyn Reflect>>,
    ) -> Result<Box<dyn Reflect>, Vec<Box<dyn Reflect>>>;
}

/// Converts every item into `T`, or returns all of them untouched.
pub(crate) fn rebuild_items<T: FromReflect>(
    items: Vec<Box<dyn Reflect>>,
) -> Result<Vec<T>, Vec<Box<dyn Reflect>>> {
    let mut converted = Vec::with_capacity(items.len());
    let mut iter = items.into_iter();
    while let Some(item) = iter.next() {
        match T::take_from_reflect(item) {
            Ok(value) => converted.push(value),
            Err(item) => {
                let mut back: Vec<Box<dyn Reflect>> = converted
                    .into_iter()
                    .map(Reflect::into_boxed_reflect)
                    .collect();
                back.push(item);
                back.extend(iter);
                return Err(back);
            }
        }
    }
    Ok(converted)
}

/// Structural equality: lists compare in order, sets by membership.
pub(crate) fn collection_partial_eq(a: &dyn Collection, b: &dyn Reflect) -> Option<bool> {
    let ReflectRef::Collection(b) = b.reflect_ref() else {
        return Some(false);
    };
    if a.len() != b.len() {
        return Some(false);
    }
    let equal = |x: &dyn Reflect, y: &dyn Reflect| x.reflect_partial_eq(y) == Some(true);
    let result = match a.flavor() {
        CollectionFlavor::Set | CollectionFlavor::SortedSet => {
            a.iter().all(|x| b.iter().any(|y| equal(x, y)))
        }
        CollectionFlavor::List | CollectionFlavor::Queue => {
            a.iter().zip(b.iter()).all(|(x, y)| equal(x, y))
        }
    };
    Some(result)
}

// -----------------------------------------------------------------------------
// DynamicCollection

/// A collection whose elements are type-erased.
///
/// The element type is unknown statically, so a `DynamicCollection` can only
/// be deserialized through a [`CollectionSeed`] naming the element type.
/// Set flavors drop elements that compare equal to one already present.
pub struct DynamicCollection {
    flavor: CollectionFlavor,
    values: Vec<Box<dyn Reflect>>,
}

impl DynamicCollection {
    #[inline]
    pub const fn new(flavor: CollectionFlavor) -> Self {
        Self {
            flavor,
            values: Vec::new(),
        }
    }

    pub fn from_values(flavor: CollectionFlavor, values: Vec<Box<dyn Reflect>>) -> Self {
        let mut collection = Self::new(flavor);
        for value in values {
            collection.push(value);
        }
        collection
    }

    /// Appends `value`, returns `false` if a set already holds an equal value.
    pub fn push(&mut self, value: Box<dyn Reflect>) -> bool {
        if matches!(
            self.flavor,
            CollectionFlavor::Set | CollectionFlavor::SortedSet
        ) && self
            .values
            .iter()
            .any(|existing| existing.reflect_partial_eq(value.as_ref()) == Some(true))
        {
            return false;
        }
        self.values.push(value);
        true
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&dyn Reflect> {
        self.values.get(index).map(|value| &**value)
    }

    #[inline]
    pub fn into_values(self) -> Vec<Box<dyn Reflect>> {
        self.values
    }
}

impl Default for DynamicCollection {
    #[inline]
    fn default() -> Self {
        Self::new(CollectionFlavor::List)
    }
}

impl fmt::Debug for DynamicCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.values.iter()).finish()
    }
}

impl Typed for DynamicCollection {
    fn type_info() -> &'static TypeInfo {
        static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
        CELL.get_or_init(|| {
            TypeInfo::Collection(CollectionInfo::erased::<Self>(CollectionFlavor::List))
        })
    }
}

impl Reflect for DynamicCollection {
    crate::reflection::impl_reflect_cast_fn!(Collection);

    fn try_apply(&mut self, value: &dyn Reflect) -> Result<(), ApplyError> {
        let ReflectRef::Collection(other) = value.reflect_ref() else {
            return Err(ApplyError::mismatched(value, self));
        };
        self.values = other.iter().map(Reflect::reflect_clone).collect();
        Ok(())
    }

    fn reflect_clone(&self) -> Box<dyn Reflect> {
        Box::new(Self {
            flavor: self.flavor,
            values: self.values.iter().map(|v| v.reflect_clone()).collect(),
        })
    }

    #[inline]
    fn reflect_partial_eq(&self, other: &dyn Reflect) -> Option<bool> {
        collection_partial_eq(self, other)
    }

    #[inline]
    fn reset(&mut self) -> bool {
        self.values.clear();
        true
    }
}

impl Collection for DynamicCollection {
    #[inline]
    fn len(&self) -> usize {
        self.values.len()
    }

    fn iter(&self) -> Box<dyn Iterator<Item = &dyn Reflect> + '_> {
        Box::new(self.values.iter().map(|value| &**value))
    }

    #[inline]
    fn flavor(&self) -> CollectionFlavor {
        self.flavor
    }

    fn rebuild(
        &self,
        items: Vec<Box<dyn Reflect>>,
    ) -> Result<Box<dyn Reflect>, Vec<Box<dyn Reflect>>> {
        Ok(Box::new(Self::from_values(self.flavor, items)))
    }
}

impl FromReflect for DynamicCollection {
    fn from_reflect(reflect: &dyn Reflect) -> Option<Self> {
        let collection = reflect.reflect_ref().as_collection().ok()?;
        Some(Self::from_values(
            collection.flavor(),
            collection.iter().map(Reflect::reflect_clone).collect(),
        ))
    }
}

impl Serialize for DynamicCollection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.values.len()))?;
        for value in &self.values {
            seq.serialize_element(value.as_serialize())?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for DynamicCollection {
    fn deserialize<D: Deserializer<'de>>(_deserializer: D) -> Result<Self, D::Error> {
        Err(<D::Error as serde_core::de::Error>::custom(
            "`DynamicCollection` needs an element type, deserialize it with `CollectionSeed`",
        ))
    }
}

// -----------------------------------------------------------------------------
// CollectionSeed

/// Deserializes a [`DynamicCollection`] whose elements all have one type.
#[derive(Clone, Copy, Debug)]
pub struct CollectionSeed {
    pub flavor: CollectionFlavor,
    pub element: &'static TypeInfo,
}

impl<'de> DeserializeSeed<'de> for CollectionSeed {
    type Value = DynamicCollection;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_seq(self)
    }
}

impl<'de> Visitor<'de> for CollectionSeed {
    type Value = DynamicCollection;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "a sequence of `{}`", self.element.type_path())
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut collection = DynamicCollection::new(self.flavor);
        while let Some(value) = seq.next_element_seed(TypedSeed(self.element))? {
            collection.push(value);
        }
        Ok(collection)
    }
}

// -----------------------------------------------------------------------------
// Tests
