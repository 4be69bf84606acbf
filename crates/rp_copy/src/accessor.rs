//! Reading and writing fields through their flattened index.

use log::debug;
use rp_reflect::Reflect;
use rp_reflect::ops::Struct;

use crate::CopyError;
use crate::serializer::SerializerAdapter;

#[inline]
pub fn get(instance: &dyn Struct, index: usize) -> Option<&dyn Reflect> {
    instance.field_at(index)
}

/// Writes `value` into field `index` of `instance`.
pub fn set(
    instance: &mut dyn Struct,
    index: usize,
    value: Option<Box<dyn Reflect>>,
    serializer: &dyn SerializerAdapter,
) -> Result<(), CopyError> {
    let info = instance.reflect_type_info();
    let field_error = || CopyError::FieldAccess {
        field: info
            .as_struct()
            .ok()
            .and_then(|info| info.field_at(index))
            .map_or("<unknown>", |field| field.name()),
        type_name: info.type_name(),
    };

    let Some(slot) = instance.field_at_mut(index) else {
        return Err(field_error());
    };
    if write(slot, value, serializer) {
        Ok(())
    } else {
        Err(field_error())
    }
}

/// Writes `value` into `slot`, returns `false` if no write path accepts it.
///
/// The paths are tried in order: exact [`Reflect::set`], then
/// [`Reflect::try_apply`], then a text round trip into the slot's type.
/// Null resets the slot, or leaves it untouched if it has no blank value.
pub fn write(slot: &mut dyn Reflect, value: Option<Box<dyn Reflect>>, serializer: &dyn SerializerAdapter) -> bool {
    let Some(value) = value else {
        if !slot.reset() {
            debug!(
                "Null left `{}` untouched, the type has no blank value.",
                slot.type_name()
            );
        }
        return true;
    };

    let value = match slot.set(value) {
        Ok(()) => return true,
        Err(value) => value,
    };
    if slot.try_apply(&*value).is_ok() {
        return true;
    }

    let target = slot.reflect_type_info();
    serializer
        .to_text(value.as_serialize())
        .and_then(|text| serializer.from_text(&text, target))
        .is_ok_and(|converted| slot.set(converted).is_ok())
}

// -----------------------------------------------------------------------------
// Tests
