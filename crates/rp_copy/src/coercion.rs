//! Decides how a source value becomes a destination value.
//!
//! The shape of the decision is fixed per field pair when the plan is built,
//! see [`Conversion::classify`]. [`resolve`] applies it to one value.

use rp_reflect::Reflect;
use rp_reflect::info::TypeInfo;
use rp_reflect::ops::ReflectRef;

use crate::CopyError;
use crate::classify::{is_container, is_enum, is_primitive, peel_lazy, peel_optional, peel_wrappers};
use crate::clone::CloneEngine;

// -----------------------------------------------------------------------------
// Conversion

/// The rule chosen for a field pair. The first matching rule wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Conversion {
    /// Produce an independent copy in the destination type.
    Clone,
    /// `Option<P>` into `P`: null becomes `P::default()`.
    UnboxOrDefault,
    /// `P` into `Option<P>`: `P::default()` becomes null.
    BoxOrNull,
    /// Enum and string values are matched by variant name.
    Enum,
    /// Containers of different raw types never convert.
    CrossKindNull,
}

impl Conversion {
    /// Picks the rule for a source field declared as `source` and a
    /// destination field declared as `dest`.
    ///
    /// Lazy placeholders are judged by their real type, since the source
    /// value reaches [`resolve`] already unwrapped. Containers are compared
    /// without their `Option` layer.
    pub fn classify(source: &'static TypeInfo, dest: &'static TypeInfo) -> Self {
        if source.type_id() == dest.type_id() {
            return Self::Clone;
        }
        let (source, dest) = (peel_lazy(source), peel_lazy(dest));
        if source.type_id() == dest.type_id() {
            return Self::Clone;
        }
        if let Ok(optional) = source.as_optional()
            && is_primitive(optional.some())
            && optional.some().type_id() == dest.type_id()
        {
            return Self::UnboxOrDefault;
        }
        if let Ok(optional) = dest.as_optional()
            && is_primitive(optional.some())
            && optional.some().type_id() == source.type_id()
        {
            return Self::BoxOrNull;
        }
        if is_enum(peel_wrappers(source)) || is_enum(peel_wrappers(dest)) {
            return Self::Enum;
        }
        let (source, dest) = (peel_wrappers(source), peel_wrappers(dest));
        if (is_container(source) || is_container(dest))
            && source.ty().raw_path() != dest.ty().raw_path()
        {
            return Self::CrossKindNull;
        }
        Self::Clone
    }
}

// -----------------------------------------------------------------------------
// Resolution

/// `None` for an `Option` holding nothing, `value` otherwise.
pub fn nullable(value: &dyn Reflect) -> Option<&dyn Reflect> {
    match value.reflect_ref() {
        ReflectRef::Optional(optional) if optional.is_none() => None,
        _ => Some(value),
    }
}

/// The content of an `Option`, or `value` itself.
fn peel_value(value: &dyn Reflect) -> Option<&dyn Reflect> {
    match value.reflect_ref() {
        ReflectRef::Optional(optional) => optional.value().and_then(peel_value),
        _ => Some(value),
    }
}

/// Produces the value to write into a field of type `target`.
///
/// `value` is `None` when the source field is null. A returned `None` asks
/// the caller to write null.
pub fn resolve(
    conversion: Conversion,
    value: Option<&dyn Reflect>,
    target: &'static TypeInfo,
    engine: &CloneEngine<'_>,
) -> Result<Option<Box<dyn Reflect>>, CopyError> {
    match conversion {
        Conversion::Clone => match value {
            Some(value) if value.reflect_type_info().type_id() != target.type_id() => {
                // Clone the bare value, the slot wraps it back into `Option`
                // or `Lazy` when written.
                engine.clone_value(peel_value(value), peel_wrappers(target))
            }
            value => engine.clone_value(value, target),
        },
        Conversion::UnboxOrDefault => match value.and_then(peel_value) {
            Some(inner) => engine.clone_value(Some(inner), target),
            None => Ok(target.ty().default_value()),
        },
        Conversion::BoxOrNull => {
            let Some(value) = value else {
                return Ok(None);
            };
            let is_default = peel_optional(peel_lazy(target))
                .ty()
                .default_value()
                .is_some_and(|default| default.reflect_partial_eq(value) == Some(true));
            if is_default {
                Ok(None)
            } else {
                engine.clone_value(Some(value), value.reflect_type_info())
            }
        }
        Conversion::Enum => Ok(convert_enum(value, target)),
        Conversion::CrossKindNull => Ok(None),
    }
}

/// Converts between enums and strings by exact variant name.
///
/// Anything that does not match yields `None`.
pub fn convert_enum(value: Option<&dyn Reflect>, target: &'static TypeInfo) -> Option<Box<dyn Reflect>> {
    let value = peel_value(value?)?;
    let name = match value.reflect_ref() {
        ReflectRef::Enum(value) => value.variant_name(),
        _ => value.downcast_ref::<String>()?.as_str(),
    };

    let target = peel_wrappers(target);
    match target {
        TypeInfo::Enum(info) => info.from_name(name),
        _ if target.is::<String>() => Some(Box::new(name.to_owned())),
        _ => None,
    }
}

// -----------------------------------------------------------------------------
// Tests
