use crate::Reflect;

/// A trait used to power unit-enum operations via reflection.
pub trait Enum: Reflect {
    /// The name of the current variant, exactly as declared.
    fn variant_name(&self) -> &'static str;

    /// The index of the current variant in declaration order.
    fn variant_index(&self) -> usize;
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    use super::Enum;
    use crate::derive::Reflect;
    use crate::info::{ReflectKind, Typed};
    use crate::Reflect as _;

    #[derive(Reflect, Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
    #[reflect(default)]
    enum Status {
        #[default]
        Active,
        Suspended,
    }

    #[test]
    fn enum_by_name() {
        let info = Status::type_info().as_enum().unwrap();
        assert_eq!(info.variant_names(), ["Active", "Suspended"]);

        let suspended = info.from_name("Suspended").unwrap();
        assert_eq!(suspended.downcast_ref::<Status>(), Some(&Status::Suspended));
        assert!(info.from_name("suspended").is_none());

        assert_eq!(Status::Suspended.variant_name(), "Suspended");
        assert_eq!(Status::Suspended.variant_index(), 1);
        assert_eq!(Status::Active.reflect_kind(), ReflectKind::Enum);

        let values: Vec<_> = info.iter_values().collect();
        assert_eq!(values.len(), 2);
    }
}
