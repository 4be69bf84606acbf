use rp_reflect::Reflect;
use rp_reflect::info::{CollectionFlavor, MapFlavor, TypeInfo, TypedSeed};
use rp_reflect::ops::{CollectionSeed, MapSeed};
use serde::de::{DeserializeSeed, Deserializer};

/// What a text document is read back as.
///
/// `Type` names a concrete type. `Collection` and `Map` describe a container
/// whose element types were inferred at run time. They produce a
/// [`DynamicCollection`](rp_reflect::ops::DynamicCollection) or
/// [`DynamicMap`](rp_reflect::ops::DynamicMap) of the given flavor.
#[derive(Debug, Clone, Copy)]
pub enum Shape {
    Type(&'static TypeInfo),
    Collection {
        flavor: CollectionFlavor,
        element: &'static TypeInfo,
    },
    Map {
        flavor: MapFlavor,
        key: &'static TypeInfo,
        value: &'static TypeInfo,
    },
}

impl<'de> DeserializeSeed<'de> for &Shape {
    type Value = Box<dyn Reflect>;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        match *self {
            Shape::Type(info) => TypedSeed(info).deserialize(deserializer),
            Shape::Collection { flavor, element } => {
                let value = CollectionSeed { flavor, element }.deserialize(deserializer)?;
                Ok(Box::new(value))
            }
            Shape::Map { flavor, key, value } => {
                let value = MapSeed { flavor, key, value }.deserialize(deserializer)?;
                Ok(Box::new(value))
            }
        }
    }
}
