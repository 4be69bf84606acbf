use core::any::TypeId;

use crate::info::{TypeInfo, Typed};

/// A named field of a reflected struct, with its copy directives.
#[derive(Clone, Debug)]
pub struct NamedField {
    name: &'static str,
    ty_id: TypeId,
    type_info: fn() -> &'static TypeInfo,
    copy_name: Option<&'static str>,
    skip_copy: bool,
    constant: bool,
}

impl NamedField {
    #[inline]
    pub fn new<T: Typed>(name: &'static str) -> Self {
        Self {
            name,
            ty_id: TypeId::of::<T>(),
            type_info: T::type_info,
            copy_name: None,
            skip_copy: false,
            constant: false,
        }
    }

    /// Matches this field on `name` instead of its declared name.
    #[inline]
    pub fn with_copy_name(mut self, name: &'static str) -> Self {
        self.copy_name = Some(name);
        self
    }

    #[inline]
    pub fn with_skip_copy(mut self) -> Self {
        self.skip_copy = true;
        self
    }

    #[inline]
    pub fn with_constant(mut self) -> Self {
        self.constant = true;
        self
    }

    /// The declared name.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.ty_id
    }

    #[inline]
    pub fn type_info(&self) -> &'static TypeInfo {
        (self.type_info)()
    }

    #[inline]
    pub fn copy_name(&self) -> Option<&'static str> {
        self.copy_name
    }

    /// The name used for matching: the copy name if any, the declared name otherwise.
    #[inline]
    pub fn match_name(&self) -> &'static str {
        self.copy_name.unwrap_or(self.name)
    }

    #[inline]
    pub fn is_skip_copy(&self) -> bool {
        self.skip_copy
    }

    #[inline]
    pub fn is_constant(&self) -> bool {
        self.constant
    }
}
