// -----------------------------------------------------------------------------
// Modules

mod from_reflect;
mod reflect;

// -----------------------------------------------------------------------------
// Internal API

pub(crate) use reflect::impl_reflect_cast_fn;

// -----------------------------------------------------------------------------
// Exports

pub use from_reflect::{FromReflect, Reflectable};
pub use reflect::Reflect;
