use core::any::{Any, TypeId};
use core::{error, fmt};

use serde_core::de::DeserializeOwned;

use crate::Reflect;
use crate::info::{ArrayInfo, CollectionInfo, EnumInfo, LazyInfo};
use crate::info::{MapInfo, OpaqueInfo, OptionalInfo, StructInfo};

// -----------------------------------------------------------------------------
// Function pointers

/// Deserializes a boxed value of one fixed type.
pub type DeserializeFn = fn(
    deserializer: &mut dyn erased_serde::Deserializer,
) -> Result<Box<dyn Reflect>, erased_serde::Error>;

/// Produces the blank value of one fixed type.
pub type DefaultFn = fn() -> Box<dyn Reflect>;

/// Looks up a unit enum variant by its exact name.
pub type FromNameFn = fn(&str) -> Option<Box<dyn Reflect>>;

// -----------------------------------------------------------------------------
// ReflectKind

/// An enumeration of the "kinds" of a reflected type.
///
/// Each kind corresponds to an access trait in [`ops`](crate::ops).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReflectKind {
    Struct,
    Enum,
    Optional,
    Collection,
    Map,
    Array,
    Lazy,
    Opaque,
}

impl fmt::Display for ReflectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Struct => f.pad("Struct"),
            Self::Enum => f.pad("Enum"),
            Self::Optional => f.pad("Optional"),
            Self::Collection => f.pad("Collection"),
            Self::Map => f.pad("Map"),
            Self::Array => f.pad("Array"),
            Self::Lazy => f.pad("Lazy"),
            Self::Opaque => f.pad("Opaque"),
        }
    }
}

/// Error returned when a `TypeInfo` value is not the expected `ReflectKind`.
#[derive(Debug)]
pub struct ReflectKindError {
    pub expected: ReflectKind,
    pub received: ReflectKind,
}

impl fmt::Display for ReflectKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "reflect kind mismatch: expected {}, received {}",
            self.expected, self.received
        )
    }
}

impl error::Error for ReflectKindError {}

// -----------------------------------------------------------------------------
// Type

/// Identity and serde entry points shared by every [`TypeInfo`] variant.
#[derive(Clone, Copy)]
pub struct Type {
    id: TypeId,
    path: &'static str,
    deserialize: DeserializeFn,
    default: Option<DefaultFn>,
}

impl Type {
    /// Describes a type that can be deserialized on its own.
    pub fn of<T: Reflect + DeserializeOwned>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            path: core::any::type_name::<T>(),
            deserialize: |deserializer| Ok(Box::new(T::deserialize(deserializer)?)),
            default: None,
        }
    }

    /// Records `T::default` as the blank value.
    pub fn with_default<T: Reflect + Default>(mut self) -> Self {
        self.default = Some(|| Box::new(T::default()));
        self
    }

    #[inline]
    pub fn id(&self) -> TypeId {
        self.id
    }

    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }

    /// The full path, as returned by [`core::any::type_name`].
    #[inline]
    pub fn path(&self) -> &'static str {
        self.path
    }

    /// The path with every module prefix removed, e.g. `Vec<Foo>`.
    pub fn name(&self) -> String {
        short_name(self.path)
    }

    /// The path without generic arguments, e.g. `alloc::vec::Vec`.
    pub fn raw_path(&self) -> &'static str {
        match self.path.find('<') {
            Some(index) => &self.path[..index],
            None => self.path,
        }
    }

    #[inline]
    pub fn deserialize(
        &self,
        deserializer: &mut dyn erased_serde::Deserializer,
    ) -> Result<Box<dyn Reflect>, erased_serde::Error> {
        (self.deserialize)(deserializer)
    }

    #[inline]
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    #[inline]
    pub fn default_value(&self) -> Option<Box<dyn Reflect>> {
        self.default.map(|f| f())
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Type")
            .field("path", &self.path)
            .field("has_default", &self.default.is_some())
            .finish()
    }
}

fn short_name(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut segment_start = 0;
    for (index, ch) in path.char_indices() {
        if matches!(ch, '<' | '>' | ',' | ' ' | '[' | ']' | ';' | '(' | ')' | '&') {
            push_last_segment(&mut out, &path[segment_start..index]);
            out.push(ch);
            segment_start = index + ch.len_utf8();
        }
    }
    push_last_segment(&mut out, &path[segment_start..]);
    out
}

fn push_last_segment(out: &mut String, segment: &str) {
    match segment.rfind("::") {
        Some(index) => out.push_str(&segment[index + 2..]),
        None => out.push_str(segment),
    }
}

// -----------------------------------------------------------------------------
// TypeInfo

/// Compile-time type information for reflected types.
///
/// Obtained through [`Typed::type_info`] when the type is known, or through
/// [`DynamicTyped::reflect_type_info`] from a `dyn Reflect`.
///
/// [`Typed::type_info`]: crate::info::Typed::type_info
/// [`DynamicTyped::reflect_type_info`]: crate::info::DynamicTyped::reflect_type_info
#[derive(Debug)]
pub enum TypeInfo {
    Struct(StructInfo),
    Enum(EnumInfo),
    Optional(OptionalInfo),
    Collection(CollectionInfo),
    Map(MapInfo),
    Array(ArrayInfo),
    Lazy(LazyInfo),
    Opaque(OpaqueInfo),
}

macro_rules! impl_cast_fn {
    ($name:ident : $kind:ident => $info:ident) => {
        #[inline]
        pub fn $name(&self) -> Result<&$info, ReflectKindError> {
            match self {
                Self::$kind(info) => Ok(info),
                _ => Err(ReflectKindError {
                    expected: ReflectKind::$kind,
                    received: self.kind(),
                }),
            }
        }
    };
}

impl TypeInfo {
    pub fn ty(&self) -> &Type {
        match self {
            Self::Struct(info) => info.ty(),
            Self::Enum(info) => info.ty(),
            Self::Optional(info) => info.ty(),
            Self::Collection(info) => info.ty(),
            Self::Map(info) => info.ty(),
            Self::Array(info) => info.ty(),
            Self::Lazy(info) => info.ty(),
            Self::Opaque(info) => info.ty(),
        }
    }

    pub fn kind(&self) -> ReflectKind {
        match self {
            Self::Struct(_) => ReflectKind::Struct,
            Self::Enum(_) => ReflectKind::Enum,
            Self::Optional(_) => ReflectKind::Optional,
            Self::Collection(_) => ReflectKind::Collection,
            Self::Map(_) => ReflectKind::Map,
            Self::Array(_) => ReflectKind::Array,
            Self::Lazy(_) => ReflectKind::Lazy,
            Self::Opaque(_) => ReflectKind::Opaque,
        }
    }

    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.ty().id()
    }

    #[inline]
    pub fn type_path(&self) -> &'static str {
        self.ty().path()
    }

    #[inline]
    pub fn type_name(&self) -> String {
        self.ty().name()
    }

    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        self.ty().is::<T>()
    }

    impl_cast_fn!(as_struct: Struct => StructInfo);
    impl_cast_fn!(as_enum: Enum => EnumInfo);
    impl_cast_fn!(as_optional: Optional => OptionalInfo);
    impl_cast_fn!(as_collection: Collection => CollectionInfo);
    impl_cast_fn!(as_map: Map => MapInfo);
    impl_cast_fn!(as_array: Array => ArrayInfo);
    impl_cast_fn!(as_lazy: Lazy => LazyInfo);
    impl_cast_fn!(as_opaque: Opaque => OpaqueInfo);
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::short_name;
    use crate::info::{ReflectKind, Typed};

    #[test]
    fn short_names() {
        assert_eq!(short_name("alloc::string::String"), "String");
        assert_eq!(
            short_name("std::collections::hash::map::HashMap<alloc::string::String, my::Foo>"),
            "HashMap<String, Foo>"
        );
        assert_eq!(short_name("[core::option::Option<u8>; 4]"), "[Option<u8>; 4]");
    }

    #[test]
    fn raw_path_strips_generics() {
        let info = <Vec<String> as Typed>::type_info();
        assert_eq!(info.ty().raw_path(), "alloc::vec::Vec");
        assert_eq!(info.kind(), ReflectKind::Collection);
        assert!(info.as_struct().is_err());
    }
}
