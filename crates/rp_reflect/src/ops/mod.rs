//! Access traits and dynamic containers.
//!
//! Each [`ReflectKind`](crate::info::ReflectKind) has an access trait here:
//!
//! - [`Struct`]: named fields, flattened through `#[reflect(base)]`.
//! - [`Enum`]: unit enum variants.
//! - [`Optional`]: `Option<T>`.
//! - [`Collection`]: lists, queues and sets.
//! - [`Map`]: key-value maps.
//! - [`Array`]: fixed-size arrays.
//! - [`LazyValue`]: lazy-loading placeholders.
//!
//! [`DynamicCollection`] and [`DynamicMap`] hold type-erased elements. They are
//! the targets of deserialization when element types are only known from a
//! sample value at run time.

// -----------------------------------------------------------------------------
// Modules

mod apply_error;
mod array_ops;
mod collection_ops;
mod enum_ops;
mod kind;
mod lazy_ops;
mod map_ops;
mod optional_ops;
mod struct_ops;

// -----------------------------------------------------------------------------
// Exports

pub use apply_error::ApplyError;

pub use kind::{ReflectMut, ReflectRef};

pub use array_ops::Array;
pub use collection_ops::{Collection, CollectionSeed, DynamicCollection};
pub use enum_ops::Enum;
pub use lazy_ops::LazyValue;
pub use map_ops::{BoxedEntry, DynamicMap, Map, MapSeed};
pub use optional_ops::Optional;
pub use struct_ops::Struct;

// -----------------------------------------------------------------------------
// Internal API

pub(crate) use collection_ops::{collection_partial_eq, rebuild_items};
pub(crate) use map_ops::{map_partial_eq, rebuild_entries};
