use serde_core::de::DeserializeOwned;

use crate::Reflect;
use crate::info::{Type, TypeInfo, Typed};

// -----------------------------------------------------------------------------
// Flavors

/// The broad interface a collection implements.
///
/// Used to pick a structural fallback when a collection has to be rebuilt
/// and its concrete type cannot be reconstructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionFlavor {
    List,
    Queue,
    Set,
    SortedSet,
}

/// The broad interface a map implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapFlavor {
    Hash,
    /// Insertion ordered.
    Ordered,
    Sorted,
}

// -----------------------------------------------------------------------------
// OptionalInfo

/// Info of `Option<T>`, the boxed, nullable form of `T`.
#[derive(Debug)]
pub struct OptionalInfo {
    ty: Type,
    some: fn() -> &'static TypeInfo,
}

impl OptionalInfo {
    pub fn new<O: Reflect + DeserializeOwned + Default, T: Typed>() -> Self {
        Self {
            ty: Type::of::<O>().with_default::<O>(),
            some: T::type_info,
        }
    }

    #[inline]
    pub fn ty(&self) -> &Type {
        &self.ty
    }

    /// Info of the wrapped type.
    #[inline]
    pub fn some(&self) -> &'static TypeInfo {
        (self.some)()
    }
}

// -----------------------------------------------------------------------------
// CollectionInfo

/// Info of a list, queue or set.
///
/// `element` is `None` for containers whose element type is only known at
/// run time, see [`DynamicCollection`](crate::ops::DynamicCollection).
#[derive(Debug)]
pub struct CollectionInfo {
    ty: Type,
    flavor: CollectionFlavor,
    element: Option<fn() -> &'static TypeInfo>,
}

impl CollectionInfo {
    pub fn new<C: Reflect + DeserializeOwned + Default, T: Typed>(flavor: CollectionFlavor) -> Self {
        Self {
            ty: Type::of::<C>().with_default::<C>(),
            flavor,
            element: Some(T::type_info),
        }
    }

    pub fn erased<C: Reflect + DeserializeOwned + Default>(flavor: CollectionFlavor) -> Self {
        Self {
            ty: Type::of::<C>().with_default::<C>(),
            flavor,
            element: None,
        }
    }

    #[inline]
    pub fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub fn flavor(&self) -> CollectionFlavor {
        self.flavor
    }

    #[inline]
    pub fn element(&self) -> Option<&'static TypeInfo> {
        self.element.map(|f| f())
    }
}

// -----------------------------------------------------------------------------
// MapInfo

/// Info of a key-value map.
///
/// `key` and `value` are `None` together for [`DynamicMap`](crate::ops::DynamicMap).
#[derive(Debug)]
pub struct MapInfo {
    ty: Type,
    flavor: MapFlavor,
    entry: Option<(fn() -> &'static TypeInfo, fn() -> &'static TypeInfo)>,
}

impl MapInfo {
    pub fn new<M: Reflect + DeserializeOwned + Default, K: Typed, V: Typed>(flavor: MapFlavor) -> Self {
        Self {
            ty: Type::of::<M>().with_default::<M>(),
            flavor,
            entry: Some((K::type_info, V::type_info)),
        }
    }

    pub fn erased<M: Reflect + DeserializeOwned + Default>(flavor: MapFlavor) -> Self {
        Self {
            ty: Type::of::<M>().with_default::<M>(),
            flavor,
            entry: None,
        }
    }

    #[inline]
    pub fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub fn flavor(&self) -> MapFlavor {
        self.flavor
    }

    #[inline]
    pub fn key(&self) -> Option<&'static TypeInfo> {
        self.entry.map(|(key, _)| key())
    }

    #[inline]
    pub fn value(&self) -> Option<&'static TypeInfo> {
        self.entry.map(|(_, value)| value())
    }
}

// -----------------------------------------------------------------------------
// ArrayInfo

/// Info of a fixed-size array `[T; N]`.
#[derive(Debug)]
pub struct ArrayInfo {
    ty: Type,
    item: fn() -> &'static TypeInfo,
    capacity: usize,
}

impl ArrayInfo {
    pub fn new<A: Reflect + DeserializeOwned, T: Typed>(capacity: usize) -> Self {
        Self {
            ty: Type::of::<A>(),
            item: T::type_info,
            capacity,
        }
    }

    #[inline]
    pub fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub fn item(&self) -> &'static TypeInfo {
        (self.item)()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

// -----------------------------------------------------------------------------
// LazyInfo

/// Info of a lazy-loading placeholder for a real type.
#[derive(Debug)]
pub struct LazyInfo {
    ty: Type,
    real: fn() -> &'static TypeInfo,
}

impl LazyInfo {
    pub fn new<L: Reflect + DeserializeOwned, T: Typed>() -> Self {
        Self {
            ty: Type::of::<L>(),
            real: T::type_info,
        }
    }

    #[inline]
    pub fn ty(&self) -> &Type {
        &self.ty
    }

    /// Info of the type the placeholder stands in for.
    #[inline]
    pub fn real(&self) -> &'static TypeInfo {
        (self.real)()
    }
}
