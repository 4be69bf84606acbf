//! Variant lookup by projection.

use core::any::Any;

use rp_reflect::info::Typed;

use crate::CopyError;

/// The first variant of `E`, in declaration order, whose projection equals
/// `expected`.
///
/// Returns `None` if `E` is not a unit enum or no variant matches.
///
/// # Examples
///
/// ```
/// use rp_copy::enums::find_enum_or_none;
/// use rp_reflect::derive::Reflect;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Reflect, Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
/// enum Level {
///     Low,
///     High,
/// }
///
/// impl Level {
///     fn code(&self) -> u8 {
///         match self {
///             Level::Low => 1,
///             Level::High => 9,
///         }
///     }
/// }
///
/// assert_eq!(find_enum_or_none(Level::code, &9), Some(Level::High));
/// assert_eq!(find_enum_or_none(Level::code, &5), None);
/// ```
pub fn find_enum_or_none<E, R, F>(projection: F, expected: &R) -> Option<E>
where
    E: Typed + Any,
    R: PartialEq,
    F: Fn(&E) -> R,
{
    let info = E::type_info().as_enum().ok()?;
    info.iter_values()
        .filter_map(|value| value.take::<E>().ok())
        .find(|variant| projection(variant) == *expected)
}

/// Like [`find_enum_or_none`], but a miss is an error.
pub fn find_enum<E, R, F>(projection: F, expected: &R) -> Result<E, CopyError>
where
    E: Typed + Any,
    R: PartialEq,
    F: Fn(&E) -> R,
{
    find_enum_or_none(projection, expected).ok_or_else(|| CopyError::NoSuchVariant {
        type_name: E::type_info().type_name(),
    })
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use rp_reflect::derive::Reflect;
    use serde::{Deserialize, Serialize};

    use super::{find_enum, find_enum_or_none};
    use crate::CopyError;

    #[derive(Reflect, Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
    enum Currency {
        Euro,
        Dollar,
        Yen,
    }

    impl Currency {
        fn symbol(&self) -> &'static str {
            match self {
                Self::Euro => "€",
                Self::Dollar => "$",
                Self::Yen => "¥",
            }
        }
    }

    #[test]
    fn finds_first_match() {
        assert_eq!(find_enum_or_none(Currency::symbol, &"$"), Some(Currency::Dollar));
        assert_eq!(find_enum(Currency::symbol, &"¥").unwrap(), Currency::Yen);
    }

    #[test]
    fn miss() {
        assert_eq!(find_enum_or_none(Currency::symbol, &"£"), None);
        let err = find_enum(Currency::symbol, &"£").unwrap_err();
        assert!(matches!(err, CopyError::NoSuchVariant { ref type_name } if type_name == "Currency"));
    }
}
