//! Per-type key maps and per-pair copy plans, computed once and cached.

use core::any::TypeId;
use core::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use log::{trace, warn};
use rp_reflect::info::StructInfo;
use rp_utils::TypeIdMap;
use rp_utils::hash::HashMap;

use crate::coercion::Conversion;
use crate::exclusion::{ExclusionSide, class_exclusions};

/// The join key of a field name.
pub fn normalize_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Normalized key to flattened field index. Collisions keep the first field.
pub type KeyMap = HashMap<String, usize>;

// -----------------------------------------------------------------------------
// ClassPairKey

/// The identity of a (source, destination) type pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClassPairKey {
    pub source: TypeId,
    pub dest: TypeId,
}

impl ClassPairKey {
    #[inline]
    pub const fn new(source: TypeId, dest: TypeId) -> Self {
        Self { source, dest }
    }

    #[inline]
    fn of(source: &StructInfo, dest: &StructInfo) -> Self {
        Self::new(source.ty().id(), dest.ty().id())
    }
}

// -----------------------------------------------------------------------------
// CopyPlan

/// One source field written into one destination field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMapping {
    pub source: usize,
    pub dest: usize,
    pub conversion: Conversion,
}

/// The compiled field mappings of a type pair.
///
/// Mappings are ordered by source index and no destination index appears twice.
#[derive(Default)]
pub struct CopyPlan {
    mappings: Box<[FieldMapping]>,
}

impl CopyPlan {
    #[inline]
    pub fn mappings(&self) -> &[FieldMapping] {
        &self.mappings
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, FieldMapping> {
        self.mappings.iter()
    }
}

impl fmt::Debug for CopyPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.mappings.iter()).finish()
    }
}

// -----------------------------------------------------------------------------
// FieldCatalog

/// Populate-once caches behind [`ObjectCopier`](crate::ObjectCopier).
///
/// Entries are never invalidated. Locks are taken in the order plans,
/// eligible fields, key maps.
#[derive(Default)]
pub struct FieldCatalog {
    keys: RwLock<TypeIdMap<Arc<KeyMap>>>,
    fields: RwLock<HashMap<ClassPairKey, Arc<[usize]>>>,
    plans: RwLock<HashMap<ClassPairKey, Arc<CopyPlan>>>,
}

impl FieldCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The key map of `info`.
    pub fn field_keys(&self, info: &'static StructInfo) -> Arc<KeyMap> {
        let id = info.ty().id();
        if let Some(keys) = self.keys.read().unwrap_or_else(PoisonError::into_inner).get(&id) {
            return keys.clone();
        }

        let mut keys = self.keys.write().unwrap_or_else(PoisonError::into_inner);
        keys.get_or_insert(id, || Arc::new(build_key_map(info)))
            .clone()
    }

    /// The source fields of the pair that survive every exclusion, by index.
    pub fn fields_to_copy(&self, source: &'static StructInfo, dest: &'static StructInfo) -> Arc<[usize]> {
        let key = ClassPairKey::of(source, dest);
        if let Some(fields) = self.fields.read().unwrap_or_else(PoisonError::into_inner).get(&key) {
            return fields.clone();
        }

        let mut fields = self.fields.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(fields) = fields.get(&key) {
            return fields.clone();
        }
        let computed = self.compute_fields_to_copy(source, dest);
        fields.insert(key, computed.clone());
        computed
    }

    /// The copy plan of the pair.
    pub fn plan(&self, source: &'static StructInfo, dest: &'static StructInfo) -> Arc<CopyPlan> {
        let key = ClassPairKey::of(source, dest);
        if let Some(plan) = self.plans.read().unwrap_or_else(PoisonError::into_inner).get(&key) {
            return plan.clone();
        }

        let mut plans = self.plans.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(plan) = plans.get(&key) {
            return plan.clone();
        }
        let computed = Arc::new(self.compute_plan(source, dest));
        plans.insert(key, computed.clone());
        computed
    }

    fn compute_fields_to_copy(&self, source: &'static StructInfo, dest: &'static StructInfo) -> Arc<[usize]> {
        let dest_exclusions = class_exclusions(dest, ExclusionSide::Destination);
        let source_exclusions = class_exclusions(source, ExclusionSide::Source);
        let dest_keys = self.field_keys(dest);

        let is_excluded = |name: &str, key: &str| {
            let name = normalize_key(name);
            [&dest_exclusions, &source_exclusions]
                .iter()
                .any(|set| set.contains(key) || set.contains(&name))
        };

        for name in dest_exclusions.iter().chain(source_exclusions.iter()) {
            let matched = source.fields().iter().any(|field| {
                normalize_key(field.name()) == *name || normalize_key(field.match_name()) == *name
            });
            if !matched {
                trace!(
                    "Exclusion '{}' matches no field of '{}'.",
                    name,
                    source.ty().name()
                );
            }
        }

        source
            .fields()
            .iter()
            .enumerate()
            .filter(|(_, field)| !field.is_constant())
            .filter(|(_, field)| !is_excluded(field.name(), &normalize_key(field.match_name())))
            .filter(|(_, field)| !field.is_skip_copy())
            .filter(|(_, field)| {
                let counterpart = dest_keys
                    .get(&normalize_key(field.match_name()))
                    .and_then(|&index| dest.field_at(index));
                !counterpart.is_some_and(|counterpart| counterpart.is_skip_copy())
            })
            .map(|(index, _)| index)
            .collect()
    }

    fn compute_plan(&self, source: &'static StructInfo, dest: &'static StructInfo) -> CopyPlan {
        let eligible = self.fields_to_copy(source, dest);
        let source_keys = self.field_keys(source);
        let dest_keys = self.field_keys(dest);

        let mut mappings = Vec::with_capacity(eligible.len());
        for &index in eligible.iter() {
            let Some(field) = source.field_at(index) else {
                continue;
            };
            let key = normalize_key(field.match_name());
            // Shadowed duplicates never take part.
            if source_keys.get(&key) != Some(&index) {
                continue;
            }
            let Some(&dest_index) = dest_keys.get(&key) else {
                continue;
            };
            let Some(dest_field) = dest.field_at(dest_index) else {
                continue;
            };
            if dest_field.is_constant() {
                continue;
            }
            mappings.push(FieldMapping {
                source: index,
                dest: dest_index,
                conversion: Conversion::classify(field.type_info(), dest_field.type_info()),
            });
        }

        CopyPlan {
            mappings: mappings.into_boxed_slice(),
        }
    }
}

impl fmt::Debug for FieldCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plans = self.plans.read().unwrap_or_else(PoisonError::into_inner).len();
        f.debug_struct("FieldCatalog")
            .field("plans", &plans)
            .finish_non_exhaustive()
    }
}

fn build_key_map(info: &'static StructInfo) -> KeyMap {
    let mut keys = KeyMap::default();
    for (index, field) in info.fields().iter().enumerate() {
        let key = normalize_key(field.match_name());
        if keys.contains_key(&key) {
            warn!(
                "Duplicate field key '{}' detected in type '{}'. Keeping first occurrence.",
                key,
                info.ty().name()
            );
        } else {
            keys.insert(key, index);
        }
    }
    keys
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rp_reflect::derive::Reflect;
    use rp_reflect::info::{StructInfo, Typed};
    use serde::{Deserialize, Serialize};

    use super::{FieldCatalog, normalize_key};
    use crate::ObjectCopier;
    use crate::coercion::Conversion;

    #[derive(Reflect, Clone, Default, Serialize, Deserialize)]
    struct Source {
        id: u64,
        #[reflect(copy_name = " Display_Name ")]
        name: String,
        #[reflect(skip_copy)]
        password: String,
        #[reflect(constant)]
        version: u32,
        token: String,
        rank: Option<u8>,
    }

    #[derive(Reflect, Clone, Default, Serialize, Deserialize)]
    #[reflect(exclude_fields("token"))]
    struct Dest {
        #[reflect(copy_name = "ID")]
        identifier: u64,
        display_name: String,
        password: String,
        version: u32,
        token: String,
        rank: u8,
        extra: bool,
    }

    #[derive(Reflect, Clone, Default, Serialize, Deserialize)]
    struct Duplicated {
        name: String,
        #[reflect(copy_name = "NAME")]
        other: String,
    }

    fn info<T: Typed>() -> &'static StructInfo {
        T::type_info().as_struct().unwrap()
    }

    #[test]
    fn normalization() {
        assert_eq!(normalize_key("  IntValue "), "intvalue");
    }

    #[test]
    fn keys_keep_first_duplicate() {
        let catalog = FieldCatalog::new();
        let keys = catalog.field_keys(info::<Duplicated>());
        assert_eq!(keys.len(), 1);
        assert_eq!(keys.get("name"), Some(&0));
    }

    #[test]
    fn eligible_fields() {
        let catalog = FieldCatalog::new();
        let fields = catalog.fields_to_copy(info::<Source>(), info::<Dest>());
        // id, name, rank
        assert_eq!(&*fields, &[0, 1, 5]);
    }

    #[test]
    fn plan_joins_on_keys() {
        let catalog = FieldCatalog::new();
        let plan = catalog.plan(info::<Source>(), info::<Dest>());
        let pairs: Vec<_> = plan.iter().map(|m| (m.source, m.dest)).collect();
        assert_eq!(pairs, [(0, 0), (1, 1), (5, 5)]);
        assert_eq!(plan.mappings()[2].conversion, Conversion::UnboxOrDefault);

        let again = catalog.plan(info::<Source>(), info::<Dest>());
        assert!(Arc::ptr_eq(&plan, &again));
    }

    #[derive(Reflect, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Numbers {
        #[reflect(copy_name = "INTVALUE")]
        int_value: i32,
        long_value: i64,
        bool_value: bool,
    }

    #[derive(Reflect, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    struct RenamedNumbers {
        #[reflect(copy_name = " intValue ")]
        number: i32,
        #[reflect(copy_name = "Long_Value")]
        long: i64,
        bool_value: bool,
    }

    #[test]
    fn renamed_fields_match_case_insensitively() {
        let copier = ObjectCopier::default();
        let source = Numbers {
            int_value: 1,
            long_value: 2,
            bool_value: true,
        };
        let dest: RenamedNumbers = copier.copy_as(&source).unwrap();
        assert_eq!(
            dest,
            RenamedNumbers {
                number: 1,
                long: 2,
                bool_value: true,
            }
        );

        let back: Numbers = copier.copy_as(&dest).unwrap();
        assert_eq!(back, source);
    }
}
