//! Static type information.
//!
//! Every reflected type owns one `'static` [`TypeInfo`], created on first use
//! through [`Typed::type_info`]. The copy engine reads field layouts, copy
//! directives and serde entry points from it, never from live values.

// -----------------------------------------------------------------------------
// Modules

mod container_info;
mod enum_info;
mod field_info;
mod opaque_info;
mod struct_info;
mod type_info;
mod typed;

// -----------------------------------------------------------------------------
// Exports

pub use container_info::{ArrayInfo, CollectionInfo, LazyInfo, MapInfo, OptionalInfo};
pub use container_info::{CollectionFlavor, MapFlavor};
pub use enum_info::EnumInfo;
pub use field_info::NamedField;
pub use opaque_info::{OpaqueInfo, ScalarKind};
pub use struct_info::StructInfo;
pub use type_info::{DefaultFn, DeserializeFn, FromNameFn};
pub use type_info::{ReflectKind, ReflectKindError, Type, TypeInfo};
pub use typed::{DynamicTyped, Typed, TypedSeed};
