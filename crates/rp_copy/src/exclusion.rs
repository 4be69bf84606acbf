//! Class-level exclusion directives, collected through the base chain.

use rp_reflect::info::StructInfo;
use rp_utils::hash::HashSet;

use crate::catalog::normalize_key;

/// Which directives to collect for a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExclusionSide {
    /// The type is the source: only `exclude_fields` applies.
    Source,
    /// The type is the destination: `exclude_on_construct` applies as well.
    Destination,
}

/// Collects the normalized excluded names of `info` and all its bases.
pub fn class_exclusions(info: &'static StructInfo, side: ExclusionSide) -> HashSet<String> {
    let mut names = HashSet::default();
    let mut current = Some(info);
    while let Some(info) = current {
        if side == ExclusionSide::Destination {
            names.extend(info.construct_exclusions().iter().map(|name| normalize_key(name)));
        }
        names.extend(info.exclusions().iter().map(|name| normalize_key(name)));
        current = info.base();
    }
    names
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use rp_reflect::derive::Reflect;
    use rp_reflect::info::Typed;
    use serde::{Deserialize, Serialize};

    use super::{ExclusionSide, class_exclusions};
    use crate::ObjectCopier;

    #[derive(Reflect, Clone, Default, Serialize, Deserialize)]
    #[reflect(exclude_fields("Audit"), exclude_on_construct("id"))]
    struct Base {
        id: u64,
        audit: String,
    }

    #[derive(Reflect, Clone, Default, Serialize, Deserialize)]
    #[reflect(exclude_fields(" Secret "))]
    struct Derived {
        secret: String,
        #[reflect(base)]
        base: Base,
    }

    #[test]
    fn walks_the_base_chain() {
        let info = Derived::type_info().as_struct().unwrap();

        let source = class_exclusions(info, ExclusionSide::Source);
        assert_eq!(source.len(), 2);
        assert!(source.contains("secret"));
        assert!(source.contains("audit"));

        let dest = class_exclusions(info, ExclusionSide::Destination);
        assert_eq!(dest.len(), 3);
        assert!(dest.contains("id"));
    }

    #[derive(Reflect, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    #[reflect(exclude_fields("shared"))]
    struct Upload {
        #[reflect(constant)]
        version: u8,
        #[reflect(skip_copy)]
        checksum: u32,
        guarded: u32,
        shared: u32,
        own: u32,
        built: u32,
        kept: u32,
    }

    #[derive(Reflect, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    #[reflect(exclude_fields("own"), exclude_on_construct("built"))]
    struct Stored {
        version: u8,
        checksum: u32,
        #[reflect(skip_copy)]
        guarded: u32,
        shared: u32,
        own: u32,
        built: u32,
        kept: u32,
    }

    #[test]
    fn every_exclusion_source_applies() {
        let copier = ObjectCopier::default();
        let source = Upload {
            version: 1,
            checksum: 2,
            guarded: 3,
            shared: 4,
            own: 5,
            built: 6,
            kept: 7,
        };
        let dest: Stored = copier.copy_as(&source).unwrap();
        assert_eq!(
            dest,
            Stored {
                kept: 7,
                ..Stored::default()
            }
        );
    }

    #[test]
    fn construct_exclusion_is_destination_only() {
        let copier = ObjectCopier::default();
        let source = Stored {
            built: 9,
            kept: 1,
            ..Stored::default()
        };
        let dest: Upload = copier.copy_as(&source).unwrap();
        assert_eq!(dest.built, 9);
        assert_eq!(dest.kept, 1);
        assert_eq!(dest.own, 0);
    }
}
