use std::fmt;

use serde_core::de::{DeserializeSeed, Deserializer, MapAccess, Visitor};
use serde_core::ser::{SerializeMap, Serializer};
use serde_core::{Deserialize, Serialize};

use crate::impls::NonGenericTypeInfoCell;
use crate::info::{MapFlavor, MapInfo, TypeInfo, Typed, TypedSeed};
use crate::ops::{ApplyError, ReflectRef};
use crate::{FromReflect, Reflect};

/// A boxed key-value pair.
pub type BoxedEntry = (Box<dyn Reflect>, Box<dyn Reflect>);

// -----------------------------------------------------------------------------
// Map

/// A trait used to power map operations via reflection.
pub trait Map: Reflect {
    fn len(&self) -> usize;

    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn iter(&self) -> Box<dyn Iterator<Item = (&dyn Reflect, &dyn Reflect)> + '_>;

    fn flavor(&self) -> MapFlavor;

    /// Builds a map of the same concrete type from `entries`.
    ///
    /// Entries are returned unchanged if any key or value cannot be converted.
    fn rebuild(&self, entries: Vec<BoxedEntry>) -> Result<Box<dyn Reflect>, Vec<BoxedEntry>>;
}

/// Converts every entry into `(K, V)`, or returns all of them untouched.
pub(crate) fn rebuild_entries<K: FromReflect, V: FromReflect>(
    entries: Vec<BoxedEntry>,
) -> Result<Vec<(K, V)>, Vec<BoxedEntry>> {
    let mut converted: Vec<(K, V)> = Vec::with_capacity(entries.len());
    let mut iter = entries.into_iter();
    while let Some((key, value)) = iter.next() {
        let failed = match K::take_from_reflect(key) {
            Ok(key) => match V::take_from_reflect(value) {
                Ok(value) => {
                    converted.push((key, value));
                    continue;
                }
                Err(value) => (key.into_boxed_reflect(), value),
            },
            Err(key) => (key, value),
        };

        let mut back: Vec<BoxedEntry> = converted
            .into_iter()
            .map(|(k, v)| (k.into_boxed_reflect(), v.into_boxed_reflect()))
            .collect();
        back.push(failed);
        back.extend(iter);
        return Err(back);
    }
    Ok(converted)
}

/// Structural equality, independent of entry order.
pub(crate) fn map_partial_eq(a: &dyn Map, b: &dyn Reflect) -> Option<bool> {
    let ReflectRef::Map(b) = b.reflect_ref() else {
        return Some(false);
    };
    if a.len() != b.len() {
        return Some(false);
    }
    let equal = |x: &dyn Reflect, y: &dyn Reflect| x.reflect_partial_eq(y) == Some(true);
    let result = b.iter().all(|(key, value)| {
        a.iter()
            .find(|(own_key, _)| equal(*own_key, key))
            .is_some_and(|(_, own_value)| equal(own_value, value))
    });
    Some(result)
}

// -----------------------------------------------------------------------------
// DynamicMap

/// A map whose keys and values are type-erased.
///
/// Entries keep insertion order. Inserting a key equal to an existing one
/// replaces its value.
pub struct DynamicMap {
    flavor: MapFlavor,
    entries: Vec<BoxedEntry>,
}

impl DynamicMap {
    #[inline]
    pub const fn new(flavor: MapFlavor) -> Self {
        Self {
            flavor,
            entries: Vec::new(),
        }
    }

    pub fn from_entries(flavor: MapFlavor, entries: Vec<BoxedEntry>) -> Self {
        let mut map = Self::new(flavor);
        for (key, value) in entries {
            map.insert(key, value);
        }
        map
    }

    /// Inserts an entry, returning the previous value of an equal key.
    pub fn insert(
        &mut self,
        key: Box<dyn Reflect>,
        value: Box<dyn Reflect>,
    ) -> Option<Box<dyn Reflect>> {
        match self.position(key.as_ref()) {
            Some(index) => Some(core::mem::replace(&mut self.entries[index].1, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &dyn Reflect) -> Option<&dyn Reflect> {
        self.position(key).map(|index| &*self.entries[index].1)
    }

    #[inline]
    pub fn into_entries(self) -> Vec<BoxedEntry> {
        self.entries
    }

    fn position(&self, key: &dyn Reflect) -> Option<usize> {
        self.entries
            .iter()
            .position(|(existing, _)| existing.reflect_partial_eq(key) == Some(true))
    }
}

impl Default for DynamicMap {
    #[inline]
    fn default() -> Self {
        Self::new(MapFlavor::Ordered)
    }
}

impl fmt::Debug for DynamicMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(k, v)| (k, v)))
            .finish()
    }
}

impl Typed for DynamicMap {
    fn type_info() -> &'static TypeInfo {
        static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
        CELL.get_or_init(|| TypeInfo::Map(MapInfo::erased::<Self>(MapFlavor::Ordered)))
    }
}

impl Reflect for DynamicMap {
    crate::reflection::impl_reflect_cast_fn!(Map);

    fn try_apply(&mut self, value: &dyn Reflect) -> Result<(), ApplyError> {
        let ReflectRef::Map(other) = value.reflect_ref() else {
            return Err(ApplyError::mismatched(value, self));
        };
        self.entries = other
            .iter()
            .map(|(k, v)| (k.reflect_clone(), v.reflect_clone()))
            .collect();
        Ok(())
    }

    fn reflect_clone(&self) -> Box<dyn Reflect> {
        Box::new(Self {
            flavor: self.flavor,
            entries: self
                .entries
                .iter()
                .map(|(k, v)| (k.reflect_clone(), v.reflect_clone()))
                .collect(),
        })
    }

    #[inline]
    fn reflect_partial_eq(&self, other: &dyn Reflect) -> Option<bool> {
        map_partial_eq(self, other)
    }

    #[inline]
    fn reset(&mut self) -> bool {
        self.entries.clear();
        true
    }
}

impl Map for DynamicMap {
    #[inline]
    fn len(&self) -> usize {
        self.entries.len()
    }

    fn iter(&self) -> Box<dyn Iterator<Item = (&dyn Reflect, &dyn Reflect)> + '_> {
        Box::new(self.entries.iter().map(|(k, v)| (&**k, &**v)))
    }

    #[inline]
    fn flavor(&self) -> MapFlavor {
        self.flavor
    }

    fn rebuild(&self, entries: Vec<BoxedEntry>) -> Result<Box<dyn Reflect>, Vec<BoxedEntry>> {
        Ok(Box::new(Self::from_entries(self.flavor, entries)))
    }
}

impl FromReflect for DynamicMap {
    fn from_reflect(reflect: &dyn Reflect) -> Option<Self> {
        let map = reflect.reflect_ref().as_map().ok()?;
        Some(Self::from_entries(
            map.flavor(),
            map.iter()
                .map(|(k, v)| (k.reflect_clone(), v.reflect_clone()))
                .collect(),
        ))
    }
}

impl Serialize for DynamicMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key.as_serialize(), value.as_serialize())?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for DynamicMap {
    fn deserialize<D: Deserializer<'de>>(_deserializer: D) -> Result<Self, D::Error> {
        Err(<D::Error as serde_core::de::Error>::custom(
            "`DynamicMap` needs key and value types, deserialize it with `MapSeed`",
        ))
    }
}

// -----------------------------------------------------------------------------
// MapSeed

/// Deserializes a [`DynamicMap`] whose keys and values each have one type.
#[derive(Clone, Copy, Debug)]
pub struct MapSeed {
    pub flavor: MapFlavor,
    pub key: &'static TypeInfo,
    pub value: &'static TypeInfo,
}

impl<'de> DeserializeSeed<'de> for MapSeed {
    type Value = DynamicMap;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_map(self)
    }
}

impl<'de> Visitor<'de> for MapSeed {
    type Value = DynamicMap;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "a map of `{}` to `{}`",
            self.key.type_path(),
            self.value.type_path()
        )
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut map = DynamicMap::new(self.flavor);
        while let Some((key, value)) =
            access.next_entry_seed(TypedSeed(self.key), TypedSeed(self.value))?
        {
            map.insert(key, value);
        }
        Ok(map)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use serde_core::de::DeserializeSeed;

    use super::{DynamicMap, MapSeed};
    use crate::Reflect;
    use crate::info::{MapFlavor, Typed};
    use crate::ops::Map;

    #[test]
    fn insert_replaces_equal_keys() {
        let mut map = DynamicMap::default();
        assert!(map.insert(Box::new(1_u32), Box::new(String::from("a"))).is_none());
        let old = map.insert(Box::new(1_u32), Box::new(String::from("b")));
        assert_eq!(old.unwrap().downcast_ref::<String>().unwrap(), "a");
        assert_eq!(map.len(), 1);
        assert_eq!(
            map.get(&1_u32).and_then(|v| v.downcast_ref::<String>()).unwrap(),
            "b"
        );
    }

    #[test]
    fn seed_round_trip_with_numeric_keys() {
        let mut map = DynamicMap::new(MapFlavor::Hash);
        map.insert(Box::new(7_i64), Box::new(true));
        let text = serde_json::to_string(&map).unwrap();
        assert_eq!(text, r#"{"7":true}"#);

        let seed = MapSeed {
            flavor: MapFlavor::Hash,
            key: <i64 as Typed>::type_info(),
            value: <bool as Typed>::type_info(),
        };
        let mut de = serde_json::Deserializer::from_str(&text);
        let back = seed.deserialize(&mut de).unwrap();
        assert_eq!(back.reflect_partial_eq(&map), Some(true));
        assert_eq!(back.flavor(), MapFlavor::Hash);
    }
}
