use serde_core::de::DeserializeOwned;

use rp_utils::hash::HashMap;

use crate::Reflect;
use crate::info::{NamedField, Type, TypeInfo};

/// A container for compile-time named struct info.
///
/// # Layout
///
/// Fields are stored flattened: the struct's own fields in declaration order,
/// then the fields of its `#[reflect(base)]` field, recursively. Indices used
/// by [`Struct::field_at`](crate::ops::Struct::field_at) follow this order.
/// The base field itself never appears in the list.
#[derive(Debug)]
pub struct StructInfo {
    ty: Type,
    fields: Box<[NamedField]>,
    own_len: usize,
    field_indices: HashMap<&'static str, usize>,
    base: Option<fn() -> &'static TypeInfo>,
    exclusions: &'static [&'static str],
    construct_exclusions: &'static [&'static str],
}

impl StructInfo {
    /// Creates info from the struct's own fields.
    pub fn new<T: Reflect + DeserializeOwned>(fields: &[NamedField]) -> Self {
        let field_indices = fields
            .iter()
            .enumerate()
            .map(|(index, field)| (field.name(), index))
            .collect();

        Self {
            ty: Type::of::<T>(),
            fields: fields.to_vec().into_boxed_slice(),
            own_len: fields.len(),
            field_indices,
            base: None,
            exclusions: &[],
            construct_exclusions: &[],
        }
    }

    pub fn with_default<T: Reflect + Default>(mut self) -> Self {
        self.ty = self.ty.with_default::<T>();
        self
    }

    /// Appends the flattened fields of `base`.
    ///
    /// Own fields shadow base fields of the same name for [`index_of`](Self::index_of).
    pub fn with_base(mut self, base: fn() -> &'static TypeInfo) -> Self {
        if let Ok(info) = base().as_struct() {
            let mut fields = self.fields.into_vec();
            for field in info.fields() {
                self.field_indices.entry(field.name()).or_insert(fields.len());
                fields.push(field.clone());
            }
            self.fields = fields.into_boxed_slice();
            self.base = Some(base);
        }
        self
    }

    /// Names excluded from copying whether this type is the source or the destination.
    pub fn with_exclusions(mut self, names: &'static [&'static str]) -> Self {
        self.exclusions = names;
        self
    }

    /// Names excluded from copying when this type is the destination.
    pub fn with_construct_exclusions(mut self, names: &'static [&'static str]) -> Self {
        self.construct_exclusions = names;
        self
    }

    #[inline]
    pub fn ty(&self) -> &Type {
        &self.ty
    }

    /// All fields, flattened.
    #[inline]
    pub fn fields(&self) -> &[NamedField] {
        &self.fields
    }

    /// Fields declared on this struct, excluding inherited ones.
    #[inline]
    pub fn own_fields(&self) -> &[NamedField] {
        &self.fields[..self.own_len]
    }

    #[inline]
    pub fn field_len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn field_at(&self, index: usize) -> Option<&NamedField> {
        self.fields.get(index)
    }

    #[inline]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.field_indices.get(name).copied()
    }

    #[inline]
    pub fn field(&self, name: &str) -> Option<&NamedField> {
        self.index_of(name).and_then(|index| self.field_at(index))
    }

    /// The struct playing the role of this struct's superclass.
    #[inline]
    pub fn base(&self) -> Option<&'static StructInfo> {
        self.base.and_then(|base| base().as_struct().ok())
    }

    #[inline]
    pub fn exclusions(&self) -> &'static [&'static str] {
        self.exclusions
    }

    #[inline]
    pub fn construct_exclusions(&self) -> &'static [&'static str] {
        self.construct_exclusions
    }
}
