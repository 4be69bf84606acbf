use crate::Reflect;
use crate::info::StructInfo;

/// A trait used to power struct-like operations via reflection.
///
/// Fields are addressed by their flattened index, see [`StructInfo`] for the layout.
pub trait Struct: Reflect {
    /// Returns the field at `index` in the flattened layout.
    fn field_at(&self, index: usize) -> Option<&dyn Reflect>;

    /// Returns the field at `index` in the flattened layout, mutably.
    fn field_at_mut(&mut self, index: usize) -> Option<&mut dyn Reflect>;

    /// Returns the number of fields in the flattened layout.
    fn field_len(&self) -> usize;

    /// Returns every field mutably, in flattened order.
    ///
    /// The borrows are disjoint, so they can be written from several threads.
    fn fields_mut(&mut self) -> Vec<&mut dyn Reflect>;
}

impl dyn Struct {
    #[inline]
    pub fn struct_info(&self) -> Option<&'static StructInfo> {
        self.reflect_type_info().as_struct().ok()
    }

    /// Returns the field named `name`, searching inherited fields too.
    pub fn field(&self, name: &str) -> Option<&dyn Reflect> {
        let index = self.struct_info()?.index_of(name)?;
        self.field_at(index)
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut dyn Reflect> {
        let index = self.struct_info()?.index_of(name)?;
        self.field_at_mut(index)
    }

    pub fn iter_fields(&self) -> impl Iterator<Item = &dyn Reflect> + '_ {
        (0..self.field_len()).filter_map(|index| self.field_at(index))
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    use super::Struct;
    use crate::derive::Reflect;
    use crate::info::Typed;
    use crate::ops::ReflectRef;
    use crate::{FromReflect, Reflect as _};

    #[derive(Reflect, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    #[reflect(default)]
    struct Entity {
        id: u64,
        #[reflect(skip_copy)]
        revision: u32,
    }

    #[derive(Reflect, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    #[reflect(default, exclude_fields("notes"), exclude_on_construct("id"))]
    struct Customer {
        #[reflect(copy_name = "displayName")]
        name: String,
        notes: String,
        #[reflect(constant)]
        kind: String,
        #[reflect(base)]
        entity: Entity,
    }

    #[test]
    fn struct_info_is_flattened() {
        let info = Customer::type_info().as_struct().unwrap();
        let names: Vec<_> = info.fields().iter().map(|f| f.name()).collect();
        assert_eq!(names, ["name", "notes", "kind", "id", "revision"]);
        assert_eq!(info.own_fields().len(), 3);

        assert_eq!(info.field("name").unwrap().match_name(), "displayName");
        assert!(info.field("kind").unwrap().is_constant());
        assert!(info.field("revision").unwrap().is_skip_copy());
        assert_eq!(info.exclusions(), ["notes"]);
        assert_eq!(info.construct_exclusions(), ["id"]);
        assert!(info.base().unwrap().ty().is::<Entity>());
        assert!(info.ty().has_default());
    }

    #[test]
    fn field_access_reaches_base() {
        let mut customer = Customer {
            name: "Ada".to_owned(),
            entity: Entity { id: 7, revision: 1 },
            ..Default::default()
        };

        assert_eq!(customer.field_len(), 5);
        let id = customer.field_at(3).unwrap();
        assert_eq!(id.downcast_ref::<u64>(), Some(&7));
        assert!(customer.field_at(5).is_none());

        let fields = customer.fields_mut();
        assert_eq!(fields.len(), 5);
        for field in fields {
            field.reset();
        }
        assert_eq!(customer, Customer::default());
    }

    #[test]
    fn dyn_struct_by_name() {
        let customer = Customer {
            name: "Grace".to_owned(),
            ..Default::default()
        };
        let ReflectRef::Struct(reflected) = customer.reflect_ref() else {
            panic!("expected a struct");
        };
        let name = reflected.field("name").unwrap();
        assert_eq!(name.downcast_ref::<String>().map(String::as_str), Some("Grace"));
        assert!(reflected.field("displayName").is_none());
    }

    #[test]
    fn partial_eq_and_clone() {
        let a = Customer {
            name: "a".to_owned(),
            ..Default::default()
        };
        let b = a.reflect_clone();
        assert_eq!(a.reflect_partial_eq(b.as_ref()), Some(true));
        assert_eq!(a.reflect_partial_eq(&Customer::default()), Some(false));
        assert_eq!(a.reflect_partial_eq(&1_u8), Some(false));
        assert_eq!(Customer::from_reflect(b.as_ref()), Some(a));
    }

    #[test]
    fn serialize_through_reflect() {
        let customer = Customer {
            name: "Lin".to_owned(),
            ..Default::default()
        };
        let text = serde_json::to_string(customer.as_serialize()).unwrap();
        assert!(text.contains("\"name\":\"Lin\""));
    }
}
