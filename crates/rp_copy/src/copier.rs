use core::fmt;

use rp_reflect::Reflect;
use rp_reflect::info::{StructInfo, TypeInfo};
use rp_reflect::ops::{ReflectMut, ReflectRef, Struct};

use crate::accessor;
use crate::catalog::{FieldCatalog, FieldMapping};
use crate::clone::CloneEngine;
use crate::coercion::{nullable, resolve};
use crate::proxy;
use crate::serializer::{JsonAdapter, RonAdapter, SerializationKind};
use crate::serializer::{SerializerAdapter, SerializerProvider, SerializerProviderBuilder};
use crate::{CopierConfig, CopyError};

// -----------------------------------------------------------------------------
// ObjectCopier

/// Copies values field by field between reflected types.
///
/// Fields are matched by normalized name, or by their `copy_name` when one is
/// declared. Plans are computed once per source and destination type pair
/// and cached inside the copier, so one copier should be kept and reused.
///
/// # Examples
///
/// ```
/// use rp_copy::ObjectCopier;
/// use rp_reflect::derive::Reflect;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Reflect, Clone, Default, Serialize, Deserialize)]
/// struct Draft {
///     title: String,
///     words: u32,
/// }
///
/// #[derive(Reflect, Clone, Default, Serialize, Deserialize)]
/// struct Article {
///     #[reflect(copy_name = "Title")]
///     headline: String,
///     words: u64,
/// }
///
/// let copier = ObjectCopier::default();
/// let draft = Draft { title: "Hello".into(), words: 300 };
/// let article: Article = copier.copy_as(&draft).unwrap();
/// assert_eq!(article.headline, "Hello");
/// assert_eq!(article.words, 300);
/// ```
pub struct ObjectCopier {
    config: CopierConfig,
    provider: SerializerProvider,
    catalog: FieldCatalog,
}

impl ObjectCopier {
    /// Creates a copier with the built-in adapters and `config`.
    pub fn new(config: CopierConfig) -> Result<Self, CopyError> {
        Self::builder().config(config).build()
    }

    #[inline]
    pub fn builder() -> ObjectCopierBuilder {
        ObjectCopierBuilder::new()
    }

    #[inline]
    pub fn config(&self) -> &CopierConfig {
        &self.config
    }

    #[inline]
    pub fn catalog(&self) -> &FieldCatalog {
        &self.catalog
    }

    #[inline]
    pub fn provider(&self) -> &SerializerProvider {
        &self.provider
    }

    /// The adapter used for text round trips.
    #[inline]
    pub fn serializer(&self) -> &dyn SerializerAdapter {
        self.provider.serializer()
    }

    /// Returns a copy of `source` with the same type.
    pub fn copy<T: Reflect + Default>(&self, source: &T) -> Result<T, CopyError> {
        self.copy_as(source)
    }

    /// Returns a new `D` filled from `source`.
    pub fn copy_as<S: Reflect, D: Reflect + Default>(&self, source: &S) -> Result<D, CopyError> {
        let mut dest = D::default();
        self.copy_into(source, &mut dest)?;
        Ok(dest)
    }

    /// Fills the existing `dest` from `source`.
    ///
    /// Destination fields with no counterpart in `source` keep their value.
    pub fn copy_into<S: Reflect, D: Reflect>(&self, source: &S, dest: &mut D) -> Result<(), CopyError> {
        self.copy_reflect(Some(source), Some(dest))
    }

    /// Copies `source` into `dest`, both of any reflected type.
    ///
    /// If either side is not a struct, `dest` is replaced by a clone of
    /// `source` converted into its type.
    ///
    /// # Errors
    ///
    /// - [`CopyError::NullSource`] or [`CopyError::NullDestination`] for a
    ///   missing side.
    /// - [`CopyError::FieldAccess`] if a field cannot be written.
    /// - [`CopyError::Clone`] if a value cannot be cloned.
    pub fn copy_reflect(
        &self,
        source: Option<&dyn Reflect>,
        dest: Option<&mut dyn Reflect>,
    ) -> Result<(), CopyError> {
        let source = source.ok_or(CopyError::NullSource)?;
        let dest = dest.ok_or(CopyError::NullDestination)?;
        let source = proxy::unwrap(source);

        let engine = CloneEngine::new(self.serializer());
        let dest_info = dest.reflect_type_info();
        if let ReflectRef::Struct(source) = source.reflect_ref()
            && let ReflectMut::Struct(dest) = dest.reflect_mut()
        {
            let (Ok(source_info), Ok(dest_info)) =
                (source.reflect_type_info().as_struct(), dest_info.as_struct())
            else {
                return Err(whole_value_error(dest_info));
            };
            return self.copy_fields(source, source_info, dest, dest_info, engine);
        }

        let value = engine.clone_value(Some(&*source), dest_info)?;
        if accessor::write(dest, value, self.serializer()) {
            Ok(())
        } else {
            Err(whole_value_error(dest_info))
        }
    }

    fn copy_fields(
        &self,
        source: &dyn Struct,
        source_info: &'static StructInfo,
        dest: &mut dyn Struct,
        dest_info: &'static StructInfo,
        engine: CloneEngine<'_>,
    ) -> Result<(), CopyError> {
        let plan = self.catalog.plan(source_info, dest_info);
        if plan.is_empty() {
            return Ok(());
        }

        let mut slots: Vec<Option<&mut dyn Reflect>> = dest.fields_mut().into_iter().map(Some).collect();
        let pairs: Vec<(&FieldMapping, &mut dyn Reflect)> = plan
            .iter()
            .filter_map(|mapping| Some((mapping, slots.get_mut(mapping.dest)?.take()?)))
            .collect();

        #[cfg(feature = "rayon")]
        if self.config.parallel && pairs.len() > 1 {
            use rp_utils::rayon::prelude::*;
            return pairs.into_par_iter().try_for_each(|(mapping, slot)| {
                self.apply_mapping(mapping, source, slot, dest_info, engine)
            });
        }

        pairs
            .into_iter()
            .try_for_each(|(mapping, slot)| self.apply_mapping(mapping, source, slot, dest_info, engine))
    }

    fn apply_mapping(
        &self,
        mapping: &FieldMapping,
        source: &dyn Struct,
        slot: &mut dyn Reflect,
        dest_info: &'static StructInfo,
        engine: CloneEngine<'_>,
    ) -> Result<(), CopyError> {
        let field_error = || CopyError::FieldAccess {
            field: dest_info.field_at(mapping.dest).map_or("<unknown>", |field| field.name()),
            type_name: dest_info.ty().name(),
        };
        let (Some(value), Some(target)) = (
            accessor::get(source, mapping.source),
            dest_info.field_at(mapping.dest),
        ) else {
            return Err(field_error());
        };

        let value = proxy::unwrap(value);
        let resolved = resolve(mapping.conversion, nullable(&*value), target.type_info(), &engine)?;
        if accessor::write(slot, resolved, engine.serializer()) {
            Ok(())
        } else {
            Err(field_error())
        }
    }

    // -------------------------------------------------------------------------
    // Bulk

    /// Copies every element of `sources`.
    pub fn copy_all<T: Reflect + Default>(&self, sources: &[T]) -> Result<Vec<T>, CopyError> {
        self.copy_all_as(sources)
    }

    /// Copies every element of `sources` into a new `D`.
    pub fn copy_all_as<S: Reflect, D: Reflect + Default>(&self, sources: &[S]) -> Result<Vec<D>, CopyError> {
        self.copy_all_as_into::<S, D, _, _>(sources, Some(Vec::new))
    }

    /// Copies every element of `sources` into the collection made by `factory`.
    pub fn copy_all_into<T, C, F>(&self, sources: &[T], factory: Option<F>) -> Result<C, CopyError>
    where
        T: Reflect + Default,
        C: Extend<T>,
        F: FnOnce() -> C,
    {
        self.copy_all_as_into::<T, T, C, F>(sources, factory)
    }

    /// Copies every element of `sources` into a new `D`, collected into the
    /// collection made by `factory`.
    ///
    /// # Errors
    ///
    /// - [`CopyError::EmptyInput`] if `sources` is empty.
    /// - [`CopyError::InvalidTarget`] if `factory` is `None`.
    pub fn copy_all_as_into<S, D, C, F>(&self, sources: &[S], factory: Option<F>) -> Result<C, CopyError>
    where
        S: Reflect,
        D: Reflect + Default,
        C: Extend<D>,
        F: FnOnce() -> C,
    {
        if sources.is_empty() {
            return Err(CopyError::EmptyInput);
        }
        let factory = factory.ok_or(CopyError::InvalidTarget)?;

        let copies = sources
            .iter()
            .map(|source| self.copy_as::<S, D>(source))
            .collect::<Result<Vec<D>, _>>()?;
        let mut target = factory();
        target.extend(copies);
        Ok(target)
    }
}

fn whole_value_error(info: &'static TypeInfo) -> CopyError {
    CopyError::FieldAccess {
        field: "<value>",
        type_name: info.type_name(),
    }
}

impl Default for ObjectCopier {
    fn default() -> Self {
        Self {
            config: CopierConfig::default(),
            provider: SerializerProvider::default(),
            catalog: FieldCatalog::new(),
        }
    }
}

impl fmt::Debug for ObjectCopier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectCopier")
            .field("config", &self.config)
            .field("provider", &self.provider)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// ObjectCopierBuilder

/// Builder of [`ObjectCopier`].
///
/// The JSON and RON adapters are registered up front. An adapter added with
/// [`adapter`](Self::adapter) replaces the built-in one of the same kind.
pub struct ObjectCopierBuilder {
    config: CopierConfig,
    adapters: SerializerProviderBuilder,
}

impl ObjectCopierBuilder {
    fn new() -> Self {
        Self {
            config: CopierConfig::default(),
            adapters: SerializerProvider::builder()
                .with_adapter(JsonAdapter)
                .with_adapter(RonAdapter),
        }
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: CopierConfig) -> Self {
        self.config = config;
        self
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.config.parallel = parallel;
        self
    }

    /// Elects the adapter used for text round trips.
    pub fn serializer(mut self, kind: SerializationKind) -> Self {
        self.config.serializer = kind;
        self
    }

    pub fn adapter(mut self, adapter: impl SerializerAdapter + 'static) -> Self {
        self.adapters = self.adapters.with_adapter(adapter);
        self
    }

    pub fn build(self) -> Result<ObjectCopier, CopyError> {
        let provider = self.adapters.with_default(self.config.serializer).build()?;
        Ok(ObjectCopier {
            config: self.config,
            provider,
            catalog: FieldCatalog::new(),
        })
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, VecDeque};
    use std::sync::Arc;

    use rp_reflect::derive::Reflect;
    use serde::{Deserialize, Serialize};

    use super::ObjectCopier;
    use crate::serializer::SerializationKind;
    use crate::{CopierConfig, CopyError};

    #[derive(Reflect, Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
    struct Source {
        name: String,
        count: u16,
        only_here: bool,
    }

    #[derive(Reflect, Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
    struct Dest {
        name: String,
        count: u32,
        only_there: i8,
    }

    #[test]
    fn builder_elects_serializer() {
        let copier = ObjectCopier::builder()
            .parallel(false)
            .serializer(SerializationKind::Ron)
            .build()
            .unwrap();
        assert!(!copier.config().parallel);
        assert_eq!(copier.serializer().kind(), SerializationKind::Ron);

        let copier = ObjectCopier::new(CopierConfig::default()).unwrap();
        assert_eq!(copier.serializer().kind(), SerializationKind::Json);
    }

    #[test]
    fn unmatched_fields_are_untouched() {
        let copier = ObjectCopier::default();
        let source = Source {
            name: "bolt".into(),
            count: 40,
            only_here: true,
        };
        let mut dest = Dest {
            only_there: -1,
            ..Dest::default()
        };
        copier.copy_into(&source, &mut dest).unwrap();
        assert_eq!(
            dest,
            Dest {
                name: "bolt".into(),
                count: 40,
                only_there: -1,
            }
        );
    }

    #[test]
    fn plan_is_reused() {
        let copier = ObjectCopier::default();
        let _: Dest = copier.copy_as(&Source::default()).unwrap();
        let _: Dest = copier.copy_as(&Source::default()).unwrap();

        let source = <Source as rp_reflect::info::Typed>::type_info().as_struct().unwrap();
        let dest = <Dest as rp_reflect::info::Typed>::type_info().as_struct().unwrap();
        let first = copier.catalog().plan(source, dest);
        let second = copier.catalog().plan(source, dest);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn null_sides() {
        let copier = ObjectCopier::default();
        let mut dest = Dest::default();
        assert!(matches!(
            copier.copy_reflect(None, Some(&mut dest)),
            Err(CopyError::NullSource)
        ));
        assert!(matches!(
            copier.copy_reflect(Some(&Source::default()), None),
            Err(CopyError::NullDestination)
        ));
    }

    #[test]
    fn bulk_errors() {
        let copier = ObjectCopier::default();
        let empty: [Source; 0] = [];
        assert!(matches!(copier.copy_all(&empty), Err(CopyError::EmptyInput)));

        let sources = [Source::default()];
        let result = copier.copy_all_into(&sources, None::<fn() -> Vec<Source>>);
        assert!(matches!(result, Err(CopyError::InvalidTarget)));
    }

    // -------------------------------------------------------------------------
    // Nested values

    #[derive(Reflect, Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
    #[reflect(default)]
    enum Status {
        #[default]
        Active,
        Suspended,
        Closed,
    }

    #[derive(Reflect, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Address {
        street: String,
        city: String,
    }

    #[derive(Reflect, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Person {
        name: String,
        tags: Vec<String>,
        address: Address,
        scores: BTreeMap<String, u32>,
        status: Status,
    }

    #[derive(Reflect, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    struct PersonView {
        name: String,
        tags: Vec<String>,
        address: Address,
        status: String,
    }

    fn person() -> Person {
        Person {
            name: "Grace".into(),
            tags: vec!["admiral".into(), "compiler".into()],
            address: Address {
                street: "1 Navy Way".into(),
                city: "Arlington".into(),
            },
            scores: BTreeMap::from([("cobol".into(), 10), ("fortran".into(), 7)]),
            status: Status::Suspended,
        }
    }

    fn copiers() -> [ObjectCopier; 2] {
        [
            ObjectCopier::builder().parallel(true).build().unwrap(),
            ObjectCopier::builder().parallel(false).build().unwrap(),
        ]
    }

    #[test]
    fn copy_is_independent() {
        let copier = ObjectCopier::default();
        let source = person();
        let mut copy = copier.copy(&source).unwrap();
        assert_eq!(copy, source);

        copy.tags.push("rear admiral".into());
        copy.address.city.clear();
        copy.scores.insert("lisp".into(), 1);
        assert_eq!(source, person());
    }

    #[test]
    fn copy_is_idempotent() {
        for copier in copiers() {
            let once = copier.copy(&person()).unwrap();
            let twice = copier.copy(&once).unwrap();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn parallel_and_sequential_agree() {
        let [parallel, sequential] = copiers();
        let a: PersonView = parallel.copy_as(&person()).unwrap();
        let b: PersonView = sequential.copy_as(&person()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.status, "Suspended");
    }

    #[test]
    fn config_from_document() {
        let config: CopierConfig =
            serde_json::from_str(r#"{"parallel": false, "serializer": "ron"}"#).unwrap();
        let copier = ObjectCopier::new(config).unwrap();
        let view: PersonView = copier.copy_as(&person()).unwrap();
        assert_eq!(view.address.street, "1 Navy Way");
        assert_eq!(view.tags, ["admiral", "compiler"]);
    }

    // -------------------------------------------------------------------------
    // Inheritance

    #[derive(Reflect, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    #[reflect(exclude_fields("audit"))]
    struct Record {
        id: u64,
        audit: String,
    }

    #[derive(Reflect, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Invoice {
        total: f64,
        #[reflect(base)]
        record: Record,
    }

    #[derive(Reflect, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    struct FlatInvoice {
        id: u64,
        audit: String,
        total: f64,
    }

    #[test]
    fn base_fields_are_flattened() {
        let copier = ObjectCopier::default();
        let source = Invoice {
            total: 12.5,
            record: Record {
                id: 4,
                audit: "created".into(),
            },
        };
        let flat: FlatInvoice = copier.copy_as(&source).unwrap();
        assert_eq!(
            flat,
            FlatInvoice {
                id: 4,
                audit: String::new(),
                total: 12.5,
            }
        );

        let back: Invoice = copier
            .copy_as(&FlatInvoice {
                audit: "edited".into(),
                ..flat
            })
            .unwrap();
        assert_eq!(back.record.id, 4);
        assert_eq!(back.record.audit, "");
    }

    // -------------------------------------------------------------------------
    // Whole values and bulk

    #[test]
    fn non_struct_values_are_replaced() {
        let copier = ObjectCopier::default();

        let mut wide: Vec<u64> = vec![9, 9, 9, 9];
        copier.copy_reflect(Some(&vec![1_u8, 2]), Some(&mut wide)).unwrap();
        assert_eq!(wide, [1, 2]);

        let names = copier.copy(&vec![String::from("x")]).unwrap();
        assert_eq!(names, ["x"]);

        let mut status = Status::Active;
        copier.copy_reflect(Some(&Status::Closed), Some(&mut status)).unwrap();
        assert_eq!(status, Status::Closed);
    }

    #[test]
    fn bulk_copies_are_independent() {
        let copier = ObjectCopier::default();
        let sources = [person(), person()];
        let mut views: Vec<PersonView> = copier.copy_all_as(&sources).unwrap();
        assert_eq!(views.len(), 2);

        views[0].tags.clear();
        assert_eq!(views[1].tags.len(), 2);
        assert_eq!(sources[0].tags.len(), 2);

        let queue: VecDeque<PersonView> = copier
            .copy_all_as_into::<_, PersonView, _, _>(&sources, Some(VecDeque::new))
            .unwrap();
        assert_eq!(queue.len(), 2);

        let same = copier.copy_all_into(&sources, Some(Vec::new)).unwrap();
        assert_eq!(same, sources);
    }
}
