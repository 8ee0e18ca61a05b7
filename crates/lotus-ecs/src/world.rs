use std::any::TypeId;
use std::collections::HashMap;

use crate::component::{AnyColumn, Column, Component};
use crate::entity::{Entity, EntityAllocator};

/// Owns every actor in a scene and the components attached to them.
#[derive(Default)]
pub struct World {
    entities: EntityAllocator,
    columns: HashMap<TypeId, Box<dyn AnyColumn>>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- Entity management ----

    /// Spawn a new entity with no components.
    pub fn spawn(&mut self) -> Entity {
        self.entities.allocate()
    }

    /// Despawn an entity, dropping all of its components.
    ///
    /// Returns `false` if the handle was already stale.
    pub fn despawn(&mut self, entity: Entity) -> bool {
        if !self.entities.deallocate(entity) {
            return false;
        }
        for column in self.columns.values_mut() {
            column.clear_slot(entity.index);
        }
        true
    }

    /// Check whether an entity is alive.
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    /// Number of alive entities.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    // ---- Component management ----

    fn column<T: Component>(&self) -> Option<&Column<T>> {
        self.columns
            .get(&TypeId::of::<T>())
            .and_then(|c| c.as_any().downcast_ref::<Column<T>>())
    }

    fn column_mut<T: Component>(&mut self) -> Option<&mut Column<T>> {
        self.columns
            .get_mut(&TypeId::of::<T>())
            .and_then(|c| c.as_any_mut().downcast_mut::<Column<T>>())
    }

    /// Attach a component, replacing any existing one of the same type.
    ///
    /// Returns `false` and drops the value if the entity is dead.
    pub fn insert<T: Component>(&mut self, entity: Entity, component: T) -> bool {
        if !self.entities.is_alive(entity) {
            return false;
        }
        let column = self
            .columns
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(Column::<T>::new()));
        match column.as_any_mut().downcast_mut::<Column<T>>() {
            Some(column) => {
                column.insert(entity.index, component);
                true
            }
            None => false,
        }
    }

    /// Get a component of a live entity.
    pub fn get<T: Component>(&self, entity: Entity) -> Option<&T> {
        if !self.entities.is_alive(entity) {
            return None;
        }
        self.column::<T>()?.get(entity.index)
    }

    /// Get a mutable component of a live entity.
    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        if !self.entities.is_alive(entity) {
            return None;
        }
        self.column_mut::<T>()?.get_mut(entity.index)
    }

    /// Detach a component. Returns `true` if it was present.
    pub fn remove<T: Component>(&mut self, entity: Entity) -> bool {
        if !self.entities.is_alive(entity) {
            return false;
        }
        self.columns
            .get_mut(&TypeId::of::<T>())
            .map_or(false, |column| column.clear_slot(entity.index))
    }

    /// Check whether a live entity has a component of the given type.
    pub fn has<T: Component>(&self, entity: Entity) -> bool {
        self.get::<T>(entity).is_some()
    }

    /// Iterate live entities carrying `T`, in ascending slot order.
    pub fn iter<T: Component>(&self) -> impl Iterator<Item = (Entity, &T)> + '_ {
        self.column::<T>().into_iter().flat_map(move |column| {
            column.iter().filter_map(move |(index, value)| {
                self.entities.entity_at(index).map(|entity| (entity, value))
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Health(f32);

    #[derive(Debug, Clone, PartialEq)]
    struct AimOffset(f32);

    #[test]
    fn spawn_and_despawn() {
        let mut world = World::new();
        let e = world.spawn();
        assert!(world.is_alive(e));
        assert_eq!(world.entity_count(), 1);
        assert!(world.despawn(e));
        assert!(!world.is_alive(e));
        assert!(!world.despawn(e));
        assert_eq!(world.entity_count(), 0);
    }

    #[test]
    fn insert_get_remove_component() {
        let mut world = World::new();
        let e = world.spawn();
        assert!(world.insert(e, Health(100.0)));
        assert_eq!(world.get::<Health>(e), Some(&Health(100.0)));
        assert!(world.has::<Health>(e));
        assert!(!world.has::<AimOffset>(e));
        assert!(world.remove::<Health>(e));
        assert!(!world.has::<Health>(e));
    }

    #[test]
    fn component_mutation() {
        let mut world = World::new();
        let e = world.spawn();
        world.insert(e, Health(100.0));
        if let Some(health) = world.get_mut::<Health>(e) {
            health.0 -= 40.0;
        }
        assert_eq!(world.get::<Health>(e), Some(&Health(60.0)));
    }

    #[test]
    fn insert_on_dead_entity_is_rejected() {
        let mut world = World::new();
        let e = world.spawn();
        world.despawn(e);
        assert!(!world.insert(e, Health(1.0)));
    }

    #[test]
    fn stale_handle_does_not_see_new_occupant() {
        let mut world = World::new();
        let dummy = world.spawn();
        world.insert(dummy, Health(50.0));
        world.despawn(dummy);

        let replacement = world.spawn();
        world.insert(replacement, Health(75.0));

        assert_eq!(replacement.index(), dummy.index());
        assert_eq!(world.get::<Health>(dummy), None);
        assert_eq!(world.get::<Health>(replacement), Some(&Health(75.0)));
    }

    #[test]
    fn iter_skips_despawned() {
        let mut world = World::new();
        let a = world.spawn();
        let b = world.spawn();
        let c = world.spawn();
        world.insert(a, AimOffset(90.0));
        world.insert(b, AimOffset(60.0));
        world.insert(c, Health(10.0));
        world.despawn(a);

        let offsets: Vec<_> = world.iter::<AimOffset>().collect();
        assert_eq!(offsets, vec![(b, &AimOffset(60.0))]);
        assert_eq!(world.iter::<String>().count(), 0);
    }
}
