use crate::Reflect;

/// A trait used to power fixed-size array operations via reflection.
pub trait Array: Reflect {
    fn len(&self) -> usize;

    fn get(&self, index: usize) -> Option<&dyn Reflect>;

    fn iter(&self) -> Box<dyn Iterator<Item = &dyn Reflect> + '_>;
}
