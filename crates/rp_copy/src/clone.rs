//! Independent copies of reflected values.

use log::debug;
use rp_reflect::Reflect;
use rp_reflect::info::TypeInfo;
use rp_reflect::ops::ReflectRef;

use crate::CopyError;
use crate::classify::{TypeClass, classify, is_simple};
use crate::serializer::{SerializerAdapter, Shape, binary_round_trip};

/// Produces independent copies of values, in a target type.
///
/// The strategy depends on the value:
///
/// | value                        | strategy                         |
/// |------------------------------|----------------------------------|
/// | null                         | stays null                       |
/// | primitive or enum            | `reflect_clone`                  |
/// | simple scalar                | `postcard` round trip            |
/// | container of simple scalars  | `postcard` round trip            |
/// | other collection or map      | generics-aware text round trip   |
/// | anything else                | text round trip                  |
///
/// The first five rows apply only when the value already has the target
/// type. Values of another type always take the text round trip.
#[derive(Clone, Copy)]
pub struct CloneEngine<'a> {
    serializer: &'a dyn SerializerAdapter,
}

impl<'a> CloneEngine<'a> {
    #[inline]
    pub fn new(serializer: &'a dyn SerializerAdapter) -> Self {
        Self { serializer }
    }

    #[inline]
    pub fn serializer(&self) -> &'a dyn SerializerAdapter {
        self.serializer
    }

    pub fn clone_value(
        &self,
        value: Option<&dyn Reflect>,
        target: &'static TypeInfo,
    ) -> Result<Option<Box<dyn Reflect>>, CopyError> {
        let Some(value) = value else {
            return Ok(None);
        };

        let info = value.reflect_type_info();
        if info.type_id() != target.type_id() {
            return self.round_trip(value, &Shape::Type(target)).map(Some);
        }

        let class = classify(info);
        if class.intersects(TypeClass::PRIMITIVE | TypeClass::ENUM) {
            Ok(Some(value.reflect_clone()))
        } else if class.contains(TypeClass::SIMPLE) {
            binary_round_trip(value, info)
                .map(Some)
                .map_err(|source| CopyError::Clone {
                    type_name: info.type_name(),
                    source,
                })
        } else if has_scalar_entries(info) {
            binary_round_trip(value, info)
                .map(Some)
                .map_err(|source| CopyError::Clone {
                    type_name: info.type_name(),
                    source,
                })
        } else if class.intersects(TypeClass::CONTAINER) {
            match container_shape(value, info) {
                Some(shape) => self.round_trip(value, &shape).map(Some),
                None => Ok(None),
            }
        } else {
            self.round_trip(value, &Shape::Type(info)).map(Some)
        }
    }

    fn round_trip(&self, value: &dyn Reflect, shape: &Shape) -> Result<Box<dyn Reflect>, CopyError> {
        self.serializer
            .round_trip(value, shape)
            .map_err(|source| CopyError::Clone {
                type_name: value.type_name(),
                source,
            })
    }
}

/// A typed collection or map whose entries are all simple scalars.
///
/// These take the binary path, which also keeps floats that text formats
/// cannot represent, such as `NaN`.
fn has_scalar_entries(info: &'static TypeInfo) -> bool {
    match info {
        TypeInfo::Collection(collection) => collection.element().is_some_and(is_simple),
        TypeInfo::Map(map) => map.key().is_some_and(is_simple) && map.value().is_some_and(is_simple),
        _ => false,
    }
}

/// The shape to read a container back as.
///
/// Erased containers take their element types from their first element,
/// an empty one has no shape.
fn container_shape(value: &dyn Reflect, info: &'static TypeInfo) -> Option<Shape> {
    match (info, value.reflect_ref()) {
        (TypeInfo::Collection(erased), ReflectRef::Collection(collection))
            if erased.element().is_none() =>
        {
            let Some(sample) = collection.iter().next() else {
                debug!("Cannot infer the element type of an empty `{}`.", info.type_name());
                return None;
            };
            Some(Shape::Collection {
                flavor: collection.flavor(),
                element: sample.reflect_type_info(),
            })
        }
        (TypeInfo::Map(erased), ReflectRef::Map(map)) if erased.key().is_none() => {
            let Some((key, value)) = map.iter().next() else {
                debug!("Cannot infer the entry types of an empty `{}`.", info.type_name());
                return None;
            };
            Some(Shape::Map {
                flavor: map.flavor(),
                key: key.reflect_type_info(),
                value: value.reflect_type_info(),
            })
        }
        _ => Some(Shape::Type(info)),
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rp_reflect::Reflect;
    use rp_reflect::derive::Reflect;
    use rp_reflect::info::{CollectionFlavor, MapFlavor, Typed};
    use rp_reflect::ops::{Collection, DynamicCollection, DynamicMap, Map};
    use serde::{Deserialize, Serialize};

    use super::CloneEngine;
    use crate::CopyError;
    use crate::serializer::{JsonAdapter, RonAdapter};

    #[derive(Reflect, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Point {
        x: i32,
        y: i32,
        label: Option<String>,
    }

    #[derive(Reflect, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Pair {
        x: i64,
        y: i64,
    }

    fn clone_as<T: Typed>(engine: &CloneEngine<'_>, value: &dyn Reflect) -> Box<dyn Reflect> {
        engine
            .clone_value(Some(value), T::type_info())
            .unwrap()
            .unwrap()
    }

    #[test]
    fn null_stays_null() {
        let engine = CloneEngine::new(&JsonAdapter);
        let copy = engine.clone_value(None, <String as Typed>::type_info()).unwrap();
        assert!(copy.is_none());
    }

    #[test]
    fn same_type() {
        let engine = CloneEngine::new(&JsonAdapter);

        let copy = clone_as::<u64>(&engine, &42_u64);
        assert_eq!(copy.downcast_ref::<u64>(), Some(&42));

        let copy = clone_as::<String>(&engine, &String::from("text"));
        assert_eq!(copy.downcast_ref::<String>().map(String::as_str), Some("text"));

        let point = Point {
            x: 1,
            y: 2,
            label: Some("p".to_owned()),
        };
        let copy = clone_as::<Point>(&engine, &point);
        assert_eq!(copy.downcast_ref::<Point>(), Some(&point));

        let map: HashMap<String, Vec<u8>> = HashMap::from([("a".to_owned(), vec![1])]);
        let copy = clone_as::<HashMap<String, Vec<u8>>>(&engine, &map);
        assert_eq!(copy.downcast_ref::<HashMap<String, Vec<u8>>>(), Some(&map));
    }

    #[test]
    fn scalar_containers_keep_special_floats() {
        let engine = CloneEngine::new(&JsonAdapter);

        let values = vec![1.5_f64, f64::INFINITY, f64::NAN];
        let copy = clone_as::<Vec<f64>>(&engine, &values);
        let copy = copy.downcast_ref::<Vec<f64>>().unwrap();
        assert_eq!(copy[..2], [1.5, f64::INFINITY]);
        assert!(copy[2].is_nan());

        let map: HashMap<String, f32> = HashMap::from([("low".to_owned(), f32::NEG_INFINITY)]);
        let copy = clone_as::<HashMap<String, f32>>(&engine, &map);
        assert_eq!(copy.downcast_ref::<HashMap<String, f32>>(), Some(&map));
    }

    #[test]
    fn other_type_through_text() {
        let engine = CloneEngine::new(&RonAdapter);
        let point = Point {
            x: 3,
            y: 4,
            label: None,
        };
        let copy = clone_as::<Pair>(&engine, &point);
        assert_eq!(copy.downcast_ref::<Pair>(), Some(&Pair { x: 3, y: 4 }));
    }

    #[test]
    fn erased_containers() {
        let engine = CloneEngine::new(&JsonAdapter);

        let values: Vec<Box<dyn Reflect>> = vec![Box::new(1_u16), Box::new(2_u16)];
        let list = DynamicCollection::from_values(CollectionFlavor::Queue, values);
        let copy = clone_as::<DynamicCollection>(&engine, &list);
        let copy = copy.downcast_ref::<DynamicCollection>().unwrap();
        assert_eq!(copy.flavor(), CollectionFlavor::Queue);
        assert_eq!(copy.get(1).and_then(|v| v.downcast_ref::<u16>()), Some(&2));

        let mut map = DynamicMap::new(MapFlavor::Hash);
        map.insert(Box::new("k".to_owned()), Box::new(true));
        let copy = clone_as::<DynamicMap>(&engine, &map);
        let copy = copy.downcast_ref::<DynamicMap>().unwrap();
        assert_eq!(copy.flavor(), MapFlavor::Hash);
        assert_eq!(copy.len(), 1);
    }

    #[test]
    fn empty_erased_container_is_null() {
        let engine = CloneEngine::new(&JsonAdapter);
        let empty = DynamicCollection::new(CollectionFlavor::List);
        let copy = engine
            .clone_value(Some(&empty), <DynamicCollection as Typed>::type_info())
            .unwrap();
        assert!(copy.is_none());
    }

    #[test]
    fn failures_are_wrapped() {
        let engine = CloneEngine::new(&JsonAdapter);
        let err = engine
            .clone_value(Some(&String::from("x")), <u8 as Typed>::type_info())
            .unwrap_err();
        assert!(matches!(err, CopyError::Clone { ref type_name, .. } if type_name == "String"));
    }
}
