use crate::Reflect;
use crate::info::TypeInfo;

/// The boundary to a lazy-loading layer.
///
/// A lazy value stands in for a real value that may not have been loaded
/// yet. Consumers inspect it without forcing a load: [`materialized`] is
/// only `Some` once the value is available, and [`blank`] builds an empty
/// instance of the real type.
///
/// [`materialized`]: LazyValue::materialized
/// [`blank`]: LazyValue::blank
pub trait LazyValue: Reflect {
    fn is_initialized(&self) -> bool;

    /// Info of the type this placeholder stands in for.
    fn real_type_info(&self) -> &'static TypeInfo;

    /// The loaded value, `None` while uninitialized.
    fn materialized(&self) -> Option<&dyn Reflect>;

    /// A blank instance of the real type. Never triggers a load.
    fn blank(&self) -> Box<dyn Reflect>;

    /// Returns the real value, loading it if needed.
    fn materialize(&self) -> Box<dyn Reflect>;
}
