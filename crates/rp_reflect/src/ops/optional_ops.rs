use crate::Reflect;

/// A trait used to power `Option`-like operations via reflection.
pub trait Optional: Reflect {
    fn value(&self) -> Option<&dyn Reflect>;

    fn value_mut(&mut self) -> Option<&mut dyn Reflect>;

    fn set_none(&mut self);

    #[inline]
    fn is_none(&self) -> bool {
        self.value().is_none()
    }
}
