use crate::Reflect;
use crate::info::{ReflectKind, ReflectKindError};
use crate::ops::{Array, Collection, Enum, LazyValue, Map, Optional, Struct};

macro_rules! impl_kind_fn {
    ($name:ident : $kind:ident => $ty:ty) => {
        #[inline]
        pub fn $name(self) -> Result<$ty, ReflectKindError> {
            let received = self.kind();
            match self {
                Self::$kind(value) => Ok(value),
                _ => Err(ReflectKindError {
                    expected: ReflectKind::$kind,
                    received,
                }),
            }
        }
    };
}

/// An immutable enumeration of "kinds" of a reflected type.
pub enum ReflectRef<'a> {
    Struct(&'a dyn Struct),
    Enum(&'a dyn Enum),
    Optional(&'a dyn Optional),
    Collection(&'a dyn Collection),
    Map(&'a dyn Map),
    Array(&'a dyn Array),
    Lazy(&'a dyn LazyValue),
    Opaque(&'a dyn Reflect),
}

impl<'a> ReflectRef<'a> {
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

    impl_kind_fn!(as_struct: Struct => &'a dyn Struct);
    impl_kind_fn!(as_enum: Enum => &'a dyn Enum);
    impl_kind_fn!(as_optional: Optional => &'a dyn Optional);
    impl_kind_fn!(as_collection: Collection => &'a dyn Collection);
    impl_kind_fn!(as_map: Map => &'a dyn Map);
    impl_kind_fn!(as_lazy: Lazy => &'a dyn LazyValue);
}

/// A mutable enumeration of "kinds" of a reflected type.
pub enum ReflectMut<'a> {
    Struct(&'a mut dyn Struct),
    Enum(&'a mut dyn Enum),
    Optional(&'a mut dyn Optional),
    Collection(&'a mut dyn Collection),
    Map(&'a mut dyn Map),
    Array(&'a mut dyn Array),
    Lazy(&'a mut dyn LazyValue),
    Opaque(&'a mut dyn Reflect),
}

impl<'a> ReflectMut<'a> {
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

    impl_kind_fn!(as_struct: Struct => &'a mut dyn Struct);
    impl_kind_fn!(as_optional: Optional => &'a mut dyn Optional);
}
