use rp_reflect::Reflect;
use serde::de::DeserializeSeed;

use crate::serializer::{SerializationKind, SerializerAdapter, SerializerError, Shape};

/// A [`SerializerAdapter`] backed by `ron`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RonAdapter;

impl SerializerAdapter for RonAdapter {
    #[inline]
    fn kind(&self) -> SerializationKind {
        SerializationKind::Ron
    }

    fn to_text(&self, value: &dyn erased_serde::Serialize) -> Result<String, SerializerError> {
        Ok(ron::to_string(value)?)
    }

    fn from_text_shaped(&self, text: &str, shape: &Shape) -> Result<Box<dyn Reflect>, SerializerError> {
        let mut deserializer = ron::de::Deserializer::from_str(text)?;
        let value = shape.deserialize(&mut deserializer)?;
        deserializer.end()?;
        Ok(value)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use rp_reflect::info::{MapFlavor, Typed};
    use rp_reflect::ops::{DynamicMap, Map};

    use super::RonAdapter;
    use crate::serializer::{SerializerAdapter, Shape};

    #[test]
    fn option_round_trip() {
        let value = Some(3_i16);
        let text = RonAdapter.to_text(&value).unwrap();
        assert_eq!(text, "Some(3)");

        let back = RonAdapter
            .from_text(&text, <Option<i16> as Typed>::type_info())
            .unwrap();
        assert_eq!(back.downcast_ref::<Option<i16>>(), Some(&value));
    }

    #[test]
    fn shaped_map() {
        let shape = Shape::Map {
            flavor: MapFlavor::Sorted,
            key: <String as Typed>::type_info(),
            value: <bool as Typed>::type_info(),
        };
        let value = RonAdapter
            .from_text_shaped(r#"{"on": true, "off": false}"#, &shape)
            .unwrap();
        let value = value.downcast_ref::<DynamicMap>().unwrap();
        assert_eq!(value.flavor(), MapFlavor::Sorted);
        assert_eq!(
            value.get(&"on".to_owned()).and_then(|v| v.downcast_ref::<bool>()),
            Some(&true)
        );
    }
}
