use std::any::Any;

/// Marker trait for types that can be attached to an actor.
pub trait Component: 'static + Send + Sync {}

impl<T: 'static + Send + Sync> Component for T {}

/// Type-erased access to a column, used when despawning.
pub(crate) trait AnyColumn: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn clear_slot(&mut self, index: u32) -> bool;
}

/// One component type's values, indexed directly by entity slot.
///
/// Actor counts in a scene are small, so a slot-indexed column keeps lookups
/// a single bounds check.
pub(crate) struct Column<T> {
    slots: Vec<Option<T>>,
}

impl<T: Component> Column<T> {
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    pub fn insert(&mut self, index: u32, value: T) {
        let idx = index as usize;
        if idx >= self.slots.len() {
            self.slots.resize_with(idx + 1, || None);
        }
        self.slots[idx] = Some(value);
    }

    pub fn get(&self, index: u32) -> Option<&T> {
        self.slots.get(index as usize).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, index: u32) -> Option<&mut T> {
        self.slots.get_mut(index as usize).and_then(Option::as_mut)
    }

    /// Occupied slots in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| slot.as_ref().map(|value| (idx as u32, value)))
    }
}

impl<T: Component> AnyColumn for Column<T> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn clear_slot(&mut self, index: u32) -> bool {
        self.slots
            .get_mut(index as usize)
            .map_or(false, |slot| slot.take().is_some())
    }
}
