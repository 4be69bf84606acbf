use rp_reflect::Reflect;
use serde::de::DeserializeSeed;

use crate::serializer::{SerializationKind, SerializerAdapter, SerializerError, Shape};

/// A [`SerializerAdapter`] backed by `serde_json`.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonAdapter;

impl SerializerAdapter for JsonAdapter {
    #[inline]
    fn kind(&self) -> SerializationKind {
        SerializationKind::Json
    }

    fn to_text(&self, value: &dyn erased_serde::Serialize) -> Result<String, SerializerError> {
        Ok(serde_json::to_string(value)?)
    }

    fn from_text_shaped(&self, text: &str, shape: &Shape) -> Result<Box<dyn Reflect>, SerializerError> {
        let mut deserializer = serde_json::Deserializer::from_str(text);
        let value = shape.deserialize(&mut deserializer)?;
        deserializer.end()?;
        Ok(value)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use rp_reflect::info::{CollectionFlavor, Typed};
    use rp_reflect::ops::{Collection, DynamicCollection};

    use super::JsonAdapter;
    use crate::serializer::{SerializerAdapter, Shape};

    #[test]
    fn concrete_round_trip() {
        let value: BTreeMap<String, Vec<u8>> = BTreeMap::from([("a".to_owned(), vec![1, 2])]);
        let text = JsonAdapter.to_text(&value).unwrap();
        assert_eq!(text, r#"{"a":[1,2]}"#);

        let back = JsonAdapter
            .from_text(&text, <BTreeMap<String, Vec<u8>> as Typed>::type_info())
            .unwrap();
        assert_eq!(back.downcast_ref::<BTreeMap<String, Vec<u8>>>(), Some(&value));
    }

    #[test]
    fn shaped_collection() {
        let shape = Shape::Collection {
            flavor: CollectionFlavor::Set,
            element: <String as Typed>::type_info(),
        };
        let value = JsonAdapter.from_text_shaped(r#"["x","y","x"]"#, &shape).unwrap();
        let value = value.downcast_ref::<DynamicCollection>().unwrap();
        assert_eq!(value.flavor(), CollectionFlavor::Set);
        assert_eq!(value.len(), 2);
    }

    #[test]
    fn trailing_input_is_rejected() {
        let info = <u32 as Typed>::type_info();
        assert!(JsonAdapter.from_text("1 2", info).is_err());
        assert!(JsonAdapter.from_text("\"1\"", info).is_err());
    }
}
