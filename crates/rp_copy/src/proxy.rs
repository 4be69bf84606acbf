//! Lazy placeholders and their removal before a copy.

use core::fmt;
use core::ops::Deref;
use std::sync::Arc;

use log::trace;
use rp_reflect::impls::GenericTypeInfoCell;
use rp_reflect::info::{DynamicTyped, LazyInfo, ReflectKind, TypeInfo, Typed};
use rp_reflect::ops::{ApplyError, BoxedEntry, Collection, DynamicCollection, DynamicMap};
use rp_reflect::ops::{LazyValue, Map, ReflectMut, ReflectRef};
use rp_reflect::{FromReflect, Reflect, Reflectable};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// -----------------------------------------------------------------------------
// Lazy

type Loader<T> = Arc<dyn Fn() -> T + Send + Sync>;

enum LazyState<T> {
    Uninitialized(Loader<T>),
    Initialized(T),
}

/// A value loaded on first use.
///
/// Serializing an uninitialized `Lazy<T>` writes `T::default()` and never
/// runs the loader. Deserializing always yields an initialized value.
pub struct Lazy<T> {
    state: LazyState<T>,
}

impl<T> Lazy<T> {
    /// A placeholder that runs `loader` when materialized.
    pub fn new(loader: impl Fn() -> T + Send + Sync + 'static) -> Self {
        Self {
            state: LazyState::Uninitialized(Arc::new(loader)),
        }
    }

    /// An already loaded value.
    #[inline]
    pub const fn loaded(value: T) -> Self {
        Self {
            state: LazyState::Initialized(value),
        }
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        matches!(self.state, LazyState::Initialized(_))
    }

    /// The value, if loaded.
    #[inline]
    pub fn get(&self) -> Option<&T> {
        match &self.state {
            LazyState::Initialized(value) => Some(value),
            LazyState::Uninitialized(_) => None,
        }
    }
}

impl<T: Clone> Clone for Lazy<T> {
    fn clone(&self) -> Self {
        let state = match &self.state {
            LazyState::Uninitialized(loader) => LazyState::Uninitialized(loader.clone()),
            LazyState::Initialized(value) => LazyState::Initialized(value.clone()),
        };
        Self { state }
    }
}

impl<T: Default> Default for Lazy<T> {
    #[inline]
    fn default() -> Self {
        Self::loaded(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Lazy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.state {
            LazyState::Uninitialized(_) => f.write_str("Lazy(<uninitialized>)"),
            LazyState::Initialized(value) => f.debug_tuple("Lazy").field(value).finish(),
        }
    }
}

impl<T: Serialize + Default> Serialize for Lazy<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.state {
            LazyState::Initialized(value) => value.serialize(serializer),
            LazyState::Uninitialized(_) => T::default().serialize(serializer),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Lazy<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        T::deserialize(deserializer).map(Self::loaded)
    }
}

impl<T: Reflectable + Default> Typed for Lazy<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| TypeInfo::Lazy(LazyInfo::new::<Self, T>()))
    }
}

impl<T: Reflectable + Default> Reflect for Lazy<T> {
    fn set(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
        *self = value.take::<Self>()?;
        Ok(())
    }

    #[inline]
    fn reflect_kind(&self) -> ReflectKind {
        ReflectKind::Lazy
    }

    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Lazy(self)
    }

    #[inline]
    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::Lazy(self)
    }

    fn try_apply(&mut self, value: &dyn Reflect) -> Result<(), ApplyError> {
        match Self::from_reflect(value) {
            Some(value) => {
                *self = value;
                Ok(())
            }
            None => Err(ApplyError::mismatched(value, self)),
        }
    }

    #[inline]
    fn reflect_clone(&self) -> Box<dyn Reflect> {
        Box::new(self.clone())
    }

    fn reflect_partial_eq(&self, other: &dyn Reflect) -> Option<bool> {
        let other = match other.reflect_ref() {
            ReflectRef::Lazy(other) => other.materialized()?,
            _ => other,
        };
        self.get()?.reflect_partial_eq(other)
    }

    #[inline]
    fn reset(&mut self) -> bool {
        *self = Self::default();
        true
    }

    #[inline]
    fn as_serialize(&self) -> &dyn erased_serde::Serialize {
        self
    }

    fn reflect_debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(value) => {
                f.write_str("Lazy(")?;
                value.reflect_debug(f)?;
                f.write_str(")")
            }
            None => f.write_str("Lazy(<uninitialized>)"),
        }
    }
}

impl<T: Reflectable + Default> LazyValue for Lazy<T> {
    #[inline]
    fn is_initialized(&self) -> bool {
        Lazy::is_initialized(self)
    }

    #[inline]
    fn real_type_info(&self) -> &'static TypeInfo {
        T::type_info()
    }

    fn materialized(&self) -> Option<&dyn Reflect> {
        self.get().map(Reflect::as_reflect)
    }

    fn blank(&self) -> Box<dyn Reflect> {
        Box::new(T::default())
    }

    fn materialize(&self) -> Box<dyn Reflect> {
        match &self.state {
            LazyState::Initialized(value) => Box::new(value.clone()),
            LazyState::Uninitialized(loader) => Box::new(loader()),
        }
    }
}

impl<T: Reflectable + Default> FromReflect for Lazy<T> {
    fn from_reflect(reflect: &dyn Reflect) -> Option<Self> {
        if let Some(value) = reflect.downcast_ref::<Self>() {
            return Some(value.clone());
        }
        T::from_reflect(reflect).map(Self::loaded)
    }
}

// -----------------------------------------------------------------------------
// Unwrapping

/// A value with its lazy placeholders replaced.
pub enum Unwrapped<'a> {
    /// Nothing needed replacing.
    Borrowed(&'a dyn Reflect),
    /// A rebuilt value.
    Owned(Box<dyn Reflect>),
}

impl Unwrapped<'_> {
    #[inline]
    pub fn is_borrowed(&self) -> bool {
        matches!(self, Self::Borrowed(_))
    }

    /// Converts into an owned value, cloning a borrowed one.
    pub fn into_owned(self) -> Box<dyn Reflect> {
        match self {
            Self::Borrowed(value) => value.reflect_clone(),
            Self::Owned(value) => value,
        }
    }
}

impl Deref for Unwrapped<'_> {
    type Target = dyn Reflect;

    #[inline]
    fn deref(&self) -> &Self::Target {
        match self {
            Self::Borrowed(value) => *value,
            Self::Owned(value) => &**value,
        }
    }
}

impl fmt::Debug for Unwrapped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Borrowed(value) => f.debug_tuple("Borrowed").field(value).finish(),
            Self::Owned(value) => f.debug_tuple("Owned").field(value).finish(),
        }
    }
}

/// Replaces lazy placeholders in `value`.
///
/// An uninitialized placeholder becomes a blank value of its real type, the
/// loader is never run. Containers are rebuilt only if they hold a
/// placeholder, otherwise `value` is returned as is.
pub fn unwrap(value: &dyn Reflect) -> Unwrapped<'_> {
    match value.reflect_ref() {
        ReflectRef::Lazy(lazy) => Unwrapped::Owned(unwrap_lazy(lazy)),
        ReflectRef::Collection(collection) if collection.iter().any(contains_lazy) => {
            Unwrapped::Owned(rebuild_collection(collection))
        }
        ReflectRef::Map(map) if map.iter().any(|(k, v)| contains_lazy(k) || contains_lazy(v)) => {
            Unwrapped::Owned(rebuild_map(map))
        }
        _ => Unwrapped::Borrowed(value),
    }
}

fn unwrap_lazy(lazy: &dyn LazyValue) -> Box<dyn Reflect> {
    match lazy.materialized() {
        Some(value) => unwrap(value).into_owned(),
        None => lazy.blank(),
    }
}

fn contains_lazy(value: &dyn Reflect) -> bool {
    match value.reflect_ref() {
        ReflectRef::Lazy(_) => true,
        ReflectRef::Collection(collection) => collection.iter().any(contains_lazy),
        ReflectRef::Map(map) => map.iter().any(|(k, v)| contains_lazy(k) || contains_lazy(v)),
        _ => false,
    }
}

fn rebuild_collection(collection: &dyn Collection) -> Box<dyn Reflect> {
    let items: Vec<Box<dyn Reflect>> = collection
        .iter()
        .map(|item| unwrap(item).into_owned())
        .collect();
    collection.rebuild(items).unwrap_or_else(|items| {
        trace!(
            "Rebuilding `{}` as a dynamic {:?} collection.",
            collection.reflect_type_info().type_path(),
            collection.flavor()
        );
        Box::new(DynamicCollection::from_values(collection.flavor(), items)) as Box<dyn Reflect>
    })
}

fn rebuild_map(map: &dyn Map) -> Box<dyn Reflect> {
    let entries: Vec<BoxedEntry> = map
        .iter()
        .map(|(k, v)| (unwrap(k).into_owned(), unwrap(v).into_owned()))
        .collect();
    map.rebuild(entries).unwrap_or_else(|entries| {
        trace!(
            "Rebuilding `{}` as a dynamic {:?} map.",
            map.reflect_type_info().type_path(),
            map.flavor()
        );
        Box::new(DynamicMap::from_entries(map.flavor(), entries)) as Box<dyn Reflect>
    })
}

// -----------------------------------------------------------------------------
// Tests
