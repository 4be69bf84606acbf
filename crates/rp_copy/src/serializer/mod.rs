//! Serializer adapters used by the clone engine for round trips.
//!
//! Text round trips go through a [`SerializerAdapter`] elected by the
//! [`SerializerProvider`]. Simple scalars take a [`binary_round_trip`]
//! through `postcard` instead.

// -----------------------------------------------------------------------------
// Modules

mod adapter;
mod binary;
mod json_adapter;
mod provider;
mod ron_adapter;
mod shape;

// -----------------------------------------------------------------------------
// Exports

pub use adapter::{SerializationKind, SerializerAdapter, SerializerError};
pub use binary::binary_round_trip;
pub use json_adapter::JsonAdapter;
pub use provider::{SerializerProvider, SerializerProviderBuilder};
pub use ron_adapter::RonAdapter;
pub use shape::Shape;
