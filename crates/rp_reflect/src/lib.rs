#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Generated code refers to `::rp_reflect`, make that path valid inside this crate.
extern crate self as rp_reflect;

// -----------------------------------------------------------------------------
// Modules

mod reflection;

pub mod impls;
pub mod info;
pub mod ops;

/// Derive macros.
pub mod derive {
    pub use rp_reflect_derive::Reflect;
}

// -----------------------------------------------------------------------------
// Top-level exports

pub use reflection::{FromReflect, Reflect, Reflectable};

// -----------------------------------------------------------------------------
// Macro exports

#[doc(hidden)]
pub mod __macro_exports {
    pub use erased_serde;
}
