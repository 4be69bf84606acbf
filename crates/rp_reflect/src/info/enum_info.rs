use serde_core::de::DeserializeOwned;

use crate::Reflect;
use crate::info::{FromNameFn, Type};

/// A container for compile-time info of a unit-only enum.
#[derive(Debug)]
pub struct EnumInfo {
    ty: Type,
    variants: &'static [&'static str],
    from_name: FromNameFn,
}

impl EnumInfo {
    pub fn new<T: Reflect + DeserializeOwned>(
        variants: &'static [&'static str],
        from_name: FromNameFn,
    ) -> Self {
        Self {
            ty: Type::of::<T>(),
            variants,
            from_name,
        }
    }

    pub fn with_default<T: Reflect + Default>(mut self) -> Self {
        self.ty = self.ty.with_default::<T>();
        self
    }

    #[inline]
    pub fn ty(&self) -> &Type {
        &self.ty
    }

    /// Variant names in declaration order.
    #[inline]
    pub fn variant_names(&self) -> &'static [&'static str] {
        self.variants
    }

    #[inline]
    pub fn variant_len(&self) -> usize {
        self.variants.len()
    }

    #[inline]
    pub fn contains_variant(&self, name: &str) -> bool {
        self.variants.contains(&name)
    }

    /// Constructs the variant named exactly `name`.
    #[inline]
    pub fn from_name(&self, name: &str) -> Option<Box<dyn Reflect>> {
        (self.from_name)(name)
    }

    /// Constructs every variant, in declaration order.
    pub fn iter_values(&self) -> impl Iterator<Item = Box<dyn Reflect>> + '_ {
        self.variants.iter().filter_map(|name| self.from_name(name))
    }
}
