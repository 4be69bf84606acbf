#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Modules

mod config;
mod copier;
mod error;

pub mod accessor;
pub mod catalog;
pub mod classify;
pub mod clone;
pub mod coercion;
pub mod enums;
pub mod exclusion;
pub mod proxy;
pub mod serializer;

// -----------------------------------------------------------------------------
// Top-level exports

pub use config::CopierConfig;
pub use copier::{ObjectCopier, ObjectCopierBuilder};
pub use error::CopyError;
pub use proxy::Lazy;
