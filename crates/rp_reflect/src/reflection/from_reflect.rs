use serde_core::Serialize;
use serde_core::de::DeserializeOwned;

use crate::Reflect;
use crate::info::Typed;

/// A trait that enables types to be constructed from reflected data.
///
/// The default rule is a same-type clone. Wrappers widen it:
/// `Option<T>` accepts a `T`, and lazy placeholders accept their real value.
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `FromReflect` so cannot be created through reflection",
    note = "consider annotating `{Self}` with `#[derive(Reflect)]`"
)]
pub trait FromReflect: Reflect + Sized {
    /// Constructs a concrete instance of `Self` from a reflected value.
    fn from_reflect(reflect: &dyn Reflect) -> Option<Self>;

    /// Attempts to downcast the given value to `Self`; if that fails, try to construct
    /// the value using [`FromReflect::from_reflect`].
    fn take_from_reflect(reflect: Box<dyn Reflect>) -> Result<Self, Box<dyn Reflect>> {
        match reflect.take::<Self>() {
            Ok(value) => Ok(value),
            Err(reflect) => match Self::from_reflect(reflect.as_ref()) {
                Some(success) => Ok(success),
                None => Err(reflect),
            },
        }
    }
}

/// Everything a type needs to live inside a reflected container.
pub trait Reflectable: Typed + FromReflect + Clone + Serialize + DeserializeOwned {}

impl<T> Reflectable for T where T: Typed + FromReflect + Clone + Serialize + DeserializeOwned {}
