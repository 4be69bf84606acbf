use core::fmt;

use rp_utils::hash::HashMap;

use crate::CopyError;
use crate::serializer::{JsonAdapter, RonAdapter, SerializationKind, SerializerAdapter};

// -----------------------------------------------------------------------------
// SerializerProvider

/// A set of adapters, one per [`SerializationKind`], with an elected default.
///
/// The default provider registers [`JsonAdapter`] and [`RonAdapter`] and
/// elects JSON.
pub struct SerializerProvider {
    default: SerializationKind,
    adapters: HashMap<SerializationKind, Box<dyn SerializerAdapter>>,
}

impl SerializerProvider {
    #[inline]
    pub fn builder() -> SerializerProviderBuilder {
        SerializerProviderBuilder::new()
    }

    #[inline]
    pub fn default_kind(&self) -> SerializationKind {
        self.default
    }

    /// The elected adapter.
    pub fn serializer(&self) -> &dyn SerializerAdapter {
        // `build` refuses a default without adapter.
        match self.adapters.get(&self.default) {
            Some(adapter) => &**adapter,
            None => &JsonAdapter,
        }
    }

    /// The adapter registered for `kind`, which need not be the default.
    pub fn adapter(&self, kind: SerializationKind) -> Result<&dyn SerializerAdapter, CopyError> {
        self.adapters
            .get(&kind)
            .map(|adapter| &**adapter)
            .ok_or(CopyError::AdapterNotConfigured { kind })
    }

    pub fn kinds(&self) -> impl Iterator<Item = SerializationKind> + '_ {
        self.adapters.keys().copied()
    }
}

impl Default for SerializerProvider {
    fn default() -> Self {
        let mut adapters: HashMap<SerializationKind, Box<dyn SerializerAdapter>> =
            HashMap::default();
        adapters.insert(SerializationKind::Json, Box::new(JsonAdapter));
        adapters.insert(SerializationKind::Ron, Box::new(RonAdapter));
        Self {
            default: SerializationKind::Json,
            adapters,
        }
    }
}

impl fmt::Debug for SerializerProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerializerProvider")
            .field("default", &self.default)
            .field("kinds", &self.adapters.keys().collect::<Vec<_>>())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// SerializerProviderBuilder

/// Builder of [`SerializerProvider`].
///
/// Registering a second adapter of the same kind replaces the first.
pub struct SerializerProviderBuilder {
    default: SerializationKind,
    adapters: HashMap<SerializationKind, Box<dyn SerializerAdapter>>,
}

impl SerializerProviderBuilder {
    fn new() -> Self {
        Self {
            default: SerializationKind::default(),
            adapters: HashMap::default(),
        }
    }

    pub fn with_adapter(mut self, adapter: impl SerializerAdapter + 'static) -> Self {
        self.adapters.insert(adapter.kind(), Box::new(adapter));
        self
    }

    pub fn with_boxed_adapter(mut self, adapter: Box<dyn SerializerAdapter>) -> Self {
        self.adapters.insert(adapter.kind(), adapter);
        self
    }

    /// Elects the default adapter, JSON unless set.
    pub fn with_default(mut self, kind: SerializationKind) -> Self {
        self.default = kind;
        self
    }

    /// Fails with [`CopyError::AdapterNotConfigured`] if no adapter of the
    /// default kind was registered.
    pub fn build(self) -> Result<SerializerProvider, CopyError> {
        if !self.adapters.contains_key(&self.default) {
            return Err(CopyError::AdapterNotConfigured { kind: self.default });
        }
        Ok(SerializerProvider {
            default: self.default,
            adapters: self.adapters,
        })
    }
}

// -----------------------------------------------------------------------------
// Tests
