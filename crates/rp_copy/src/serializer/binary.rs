use rp_reflect::Reflect;
use rp_reflect::info::{TypeInfo, TypedSeed};
use serde::de::DeserializeSeed;

use crate::serializer::SerializerError;

/// Copies `value` through `postcard` into a value of `info`.
///
/// Only suited to types whose serde impls do not rely on a self-describing
/// format, which holds for the primitive and simple scalars.
pub fn binary_round_trip(
    value: &dyn Reflect,
    info: &'static TypeInfo,
) -> Result<Box<dyn Reflect>, SerializerError> {
    let bytes = postcard::to_allocvec(value.as_serialize())?;
    let mut deserializer = postcard::Deserializer::from_bytes(&bytes);
    Ok(TypedSeed(info).deserialize(&mut deserializer)?)
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use rp_reflect::info::Typed;

    use super::binary_round_trip;

    #[test]
    fn string_and_option() {
        let value = String::from("hello");
        let copy = binary_round_trip(&value, <String as Typed>::type_info()).unwrap();
        assert_eq!(copy.downcast_ref::<String>(), Some(&value));

        let value = Some(4.5_f64);
        let copy = binary_round_trip(&value, <Option<f64> as Typed>::type_info()).unwrap();
        assert_eq!(copy.downcast_ref::<Option<f64>>(), Some(&value));
    }

    #[test]
    fn wrong_target_fails() {
        let value = 7_u8;
        assert!(binary_round_trip(&value, <String as Typed>::type_info()).is_err());
    }
}
