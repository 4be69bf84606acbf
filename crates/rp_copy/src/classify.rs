//! Classification of reflected types, as used by the copy plan and the
//! clone engine.
//!
//! Results are memoized per [`TypeId`](core::any::TypeId) for the lifetime of
//! the process, since type info never changes.

use std::sync::{PoisonError, RwLock};

use bitflags::bitflags;
use rp_reflect::info::{ScalarKind, TypeInfo};
use rp_utils::TypeIdMap;

bitflags! {
    /// The facts about a type that drive how its values are copied.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TypeClass: u16 {
        /// A machine primitive: `bool`, `char`, integers and floats.
        const PRIMITIVE    = 1 << 0;
        /// A unit-only enum.
        const ENUM         = 1 << 1;
        /// `Option<P>` where `P` is a primitive.
        const BOXED        = 1 << 2;
        /// Copied through a binary round trip: scalars, boxed scalars and
        /// arrays of scalars.
        const SIMPLE       = 1 << 3;
        const COLLECTION   = 1 << 4;
        const MAP          = 1 << 5;
        /// `[T; N]` where `T` is a scalar, possibly boxed.
        const SCALAR_ARRAY = 1 << 6;
        const STRUCT       = 1 << 7;
        const LAZY         = 1 << 8;
        const OPTIONAL     = 1 << 9;
    }
}

impl TypeClass {
    /// A collection or a map.
    pub const CONTAINER: Self = Self::COLLECTION.union(Self::MAP);
}

static CACHE: RwLock<TypeIdMap<TypeClass>> = RwLock::new(TypeIdMap::new());

/// Classifies `info`, memoized.
pub fn classify(info: &'static TypeInfo) -> TypeClass {
    let id = info.type_id();
    if let Some(class) = CACHE.read().unwrap_or_else(PoisonError::into_inner).get(&id) {
        return *class;
    }
    let class = compute(info);
    CACHE
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(id, class);
    class
}

fn compute(info: &'static TypeInfo) -> TypeClass {
    match info {
        TypeInfo::Opaque(opaque) => match opaque.scalar() {
            ScalarKind::Primitive => TypeClass::PRIMITIVE | TypeClass::SIMPLE,
            ScalarKind::Simple => TypeClass::SIMPLE,
            ScalarKind::Other => TypeClass::empty(),
        },
        TypeInfo::Enum(_) => TypeClass::ENUM,
        TypeInfo::Optional(optional) => {
            let mut class = TypeClass::OPTIONAL;
            let some = optional.some();
            if is_primitive(some) {
                class |= TypeClass::BOXED;
            }
            if is_scalar(some) {
                class |= TypeClass::SIMPLE;
            }
            class
        }
        TypeInfo::Array(array) if is_scalar(peel_optional(array.item())) => {
            TypeClass::SCALAR_ARRAY | TypeClass::SIMPLE
        }
        TypeInfo::Array(_) => TypeClass::empty(),
        TypeInfo::Collection(_) => TypeClass::COLLECTION,
        TypeInfo::Map(_) => TypeClass::MAP,
        TypeInfo::Struct(_) => TypeClass::STRUCT,
        TypeInfo::Lazy(_) => TypeClass::LAZY,
    }
}

fn is_scalar(info: &'static TypeInfo) -> bool {
    info.as_opaque()
        .is_ok_and(|opaque| opaque.scalar() != ScalarKind::Other)
}

// -----------------------------------------------------------------------------
// Predicates

/// Returns the wrapped type of an `Option`, or `info` itself.
pub fn peel_optional(info: &'static TypeInfo) -> &'static TypeInfo {
    match info {
        TypeInfo::Optional(optional) => optional.some(),
        _ => info,
    }
}

/// Returns the real type of a lazy placeholder, or `info` itself.
pub fn peel_lazy(info: &'static TypeInfo) -> &'static TypeInfo {
    match info {
        TypeInfo::Lazy(lazy) => lazy.real(),
        _ => info,
    }
}

/// Strips every `Lazy` and `Option` layer around `info`.
pub fn peel_wrappers(info: &'static TypeInfo) -> &'static TypeInfo {
    match info {
        TypeInfo::Optional(optional) => peel_wrappers(optional.some()),
        TypeInfo::Lazy(lazy) => peel_wrappers(lazy.real()),
        _ => info,
    }
}

#[inline]
pub fn is_primitive(info: &'static TypeInfo) -> bool {
    info.as_opaque().is_ok_and(|opaque| opaque.is_primitive())
}

#[inline]
pub fn is_enum(info: &'static TypeInfo) -> bool {
    classify(info).contains(TypeClass::ENUM)
}

#[inline]
pub fn is_boxed_primitive(info: &'static TypeInfo) -> bool {
    classify(info).contains(TypeClass::BOXED)
}

#[inline]
pub fn is_simple(info: &'static TypeInfo) -> bool {
    classify(info).contains(TypeClass::SIMPLE)
}

#[inline]
pub fn is_container(info: &'static TypeInfo) -> bool {
    classify(info).intersects(TypeClass::CONTAINER)
}

#[inline]
pub fn is_scalar_array(info: &'static TypeInfo) -> bool {
    classify(info).contains(TypeClass::SCALAR_ARRAY)
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, HashSet};

    use rp_reflect::info::Typed;
    use rp_reflect::ops::DynamicMap;

    use super::{TypeClass, classify, is_boxed_primitive, is_container, is_enum};
    use super::{is_primitive, is_scalar_array, is_simple, peel_lazy, peel_optional, peel_wrappers};
    use crate::Lazy;

    #[test]
    fn scalars() {
        let int = <i32 as Typed>::type_info();
        assert!(is_primitive(int));
        assert!(is_simple(int));
        assert_eq!(classify(int), TypeClass::PRIMITIVE | TypeClass::SIMPLE);

        let string = <String as Typed>::type_info();
        assert!(!is_primitive(string));
        assert!(is_simple(string));
        assert!(!is_enum(string));
    }

    #[test]
    fn boxed() {
        let boxed = <Option<u8> as Typed>::type_info();
        assert!(is_boxed_primitive(boxed));
        assert!(is_simple(boxed));
        assert!(peel_optional(boxed).is::<u8>());

        let text = <Option<String> as Typed>::type_info();
        assert!(!is_boxed_primitive(text));
        assert!(is_simple(text));

        let nested = <Option<Vec<u8>> as Typed>::type_info();
        assert_eq!(classify(nested), TypeClass::OPTIONAL);
        assert!(is_container(peel_wrappers(nested)));
    }

    #[test]
    fn lazy_layers() {
        let lazy = <Lazy<Option<Vec<u8>>> as Typed>::type_info();
        assert_eq!(classify(lazy), TypeClass::LAZY);
        assert!(peel_lazy(lazy).is::<Option<Vec<u8>>>());
        assert!(peel_wrappers(lazy).is::<Vec<u8>>());
        assert!(peel_lazy(<u8 as Typed>::type_info()).is::<u8>());
    }

    #[test]
    fn containers_and_arrays() {
        assert!(is_container(<Vec<String> as Typed>::type_info()));
        assert!(is_container(<HashSet<u8> as Typed>::type_info()));
        assert!(is_container(<BTreeMap<u8, u8> as Typed>::type_info()));
        assert!(is_container(<DynamicMap as Typed>::type_info()));
        assert!(!is_simple(<Vec<u8> as Typed>::type_info()));

        assert!(is_scalar_array(<[u8; 4] as Typed>::type_info()));
        assert!(is_scalar_array(<[Option<i64>; 2] as Typed>::type_info()));
        assert!(!is_scalar_array(<[Vec<u8>; 2] as Typed>::type_info()));
    }
}
