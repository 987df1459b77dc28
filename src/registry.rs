//! Component registry
//!
//! The animation core only needs a handful of things from the engine's
//! entity-component storage: every component of a type in a stable order,
//! the component of a type owned by an entity, an existence check and a name
//! for diagnostics. `Registry` provides exactly that for the component types
//! the animation passes touch.

mod store;

use crate::{
    anim_error::AnimError,
    animation::{AnimatedEntity, BlendShapeSet, SkinnedMesh},
    types::{Entity, Mesh, Transform},
};
use ahash::HashMap;
use log::trace;
use parking_lot::Mutex;
use std::sync::Arc;

pub use store::Store;

/// Registry shared with other threads. The scheduler holds the lock for a
/// whole tick.
pub type SharedRegistry = Arc<Mutex<Registry>>;

/// Something that can be attached to an entity in the `Registry`
pub trait Component: Sized {
    fn store(registry: &Registry) -> &Store<Self>;
    fn store_mut(registry: &mut Registry) -> &mut Store<Self>;
}

/// Diagnostic names of entities
#[derive(Clone, Debug, Default)]
pub struct Names(HashMap<Entity, String>);

impl Names {
    /// Name of the entity, or an empty string if it was never named or has
    /// been removed
    #[must_use]
    pub fn get(&self, entity: Entity) -> &str {
        self.0.get(&entity).map_or("", String::as_str)
    }
}

#[derive(Debug, Default)]
pub struct Registry {
    next_id: u32,
    pub(crate) names: Names,
    pub(crate) transforms: Store<Transform>,
    pub(crate) meshes: Store<Mesh>,
    pub(crate) animations: Store<AnimatedEntity>,
    pub(crate) skinned_meshes: Store<SkinnedMesh>,
    pub(crate) blend_shapes: Store<BlendShapeSet>,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps the registry for use with `Scheduler::update_shared`
    #[must_use]
    pub fn into_shared(self) -> SharedRegistry {
        Arc::new(Mutex::new(self))
    }

    /// Creates a new entity with a name used in diagnostics. Ids are never
    /// reused.
    ///
    /// # Errors
    /// Returns `AnimError::EntitiesExhausted` once every id has been used
    pub fn spawn(&mut self, name: &str) -> Result<Entity, AnimError> {
        let entity = Entity(self.next_id);
        self.next_id = self
            .next_id
            .checked_add(1)
            .ok_or(AnimError::EntitiesExhausted)?;
        self.names.0.insert(entity, name.to_owned());
        trace!("spawn {entity} name={name}");
        Ok(entity)
    }

    /// Removes an entity and every component it owns
    pub fn remove_entity(&mut self, entity: Entity) {
        self.names.0.remove(&entity);
        self.transforms.remove(entity);
        self.meshes.remove(entity);
        self.animations.remove(entity);
        self.skinned_meshes.remove(entity);
        self.blend_shapes.remove(entity);
    }

    #[must_use]
    pub fn entity_name(&self, entity: Entity) -> Option<&str> {
        self.names.0.get(&entity).map(String::as_str)
    }

    /// Attaches a component, returning any component of the same type that
    /// it replaced
    pub fn insert<T: Component>(
        &mut self,
        entity: Entity,
        component: T,
    ) -> Option<T> {
        T::store_mut(self).insert(entity, component)
    }

    pub fn remove<T: Component>(&mut self, entity: Entity) -> Option<T> {
        T::store_mut(self).remove(entity)
    }

    #[must_use]
    pub fn all_components<T: Component>(&self) -> &Store<T> {
        T::store(self)
    }

    pub fn all_components_mut<T: Component>(&mut self) -> &mut Store<T> {
        T::store_mut(self)
    }

    #[must_use]
    pub fn component<T: Component>(&self, entity: Entity) -> Option<&T> {
        T::store(self).get(entity)
    }

    pub fn component_mut<T: Component>(
        &mut self,
        entity: Entity,
    ) -> Option<&mut T> {
        T::store_mut(self).get_mut(entity)
    }

    #[must_use]
    pub fn has_component<T: Component>(&self, entity: Entity) -> bool {
        T::store(self).contains(entity)
    }
}

macro_rules! component {
    ($type:ty, $field:ident) => {
        impl Component for $type {
            fn store(registry: &Registry) -> &Store<Self> {
                &registry.$field
            }

            fn store_mut(registry: &mut Registry) -> &mut Store<Self> {
                &mut registry.$field
            }
        }
    };
}

component!(Transform, transforms);
component!(Mesh, meshes);
component!(AnimatedEntity, animations);
component!(SkinnedMesh, skinned_meshes);
component!(BlendShapeSet, blend_shapes);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn components_are_found_by_owner() {
        let mut registry = Registry::new();
        let a = registry.spawn("a").unwrap();
        let b = registry.spawn("b").unwrap();
        registry.insert(a, Transform::default());
        registry.insert(b, Mesh::default());
        assert!(registry.has_component::<Transform>(a));
        assert!(!registry.has_component::<Transform>(b));
        assert!(registry.has_component::<Mesh>(b));
        assert_eq!(registry.entity_name(b), Some("b"));
    }

    #[test]
    fn remove_entity_drops_everything() {
        let mut registry = Registry::new();
        let a = registry.spawn("ball").unwrap();
        registry.insert(a, Transform::default());
        registry.insert(a, AnimatedEntity::new(vec![Transform::default()]));
        registry.remove_entity(a);
        assert!(registry.entity_name(a).is_none());
        assert!(registry.all_components::<Transform>().is_empty());
        assert!(registry.all_components::<AnimatedEntity>().is_empty());
        assert_eq!(registry.names.get(a), "");
    }

    #[test]
    fn spawn_stops_when_ids_run_out() {
        let mut registry = Registry::new();
        registry.next_id = u32::MAX - 1;
        let last = registry.spawn("last").unwrap();
        assert_eq!(last, Entity(u32::MAX - 1));
        assert!(matches!(
            registry.spawn("one too many"),
            Err(AnimError::EntitiesExhausted)
        ));
        assert!(registry.entity_name(Entity(u32::MAX)).is_none());
        assert_eq!(registry.entity_name(last), Some("last"));
    }
}
