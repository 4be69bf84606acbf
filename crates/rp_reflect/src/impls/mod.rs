//! Reflection for std types, and the static cells used by every `Typed` impl.

// -----------------------------------------------------------------------------
// Modules

mod array;
mod cell;
mod collections;
mod maps;
mod opaque;
mod option;

// -----------------------------------------------------------------------------
// Exports

pub use cell::{GenericTypeInfoCell, NonGenericTypeInfoCell};
