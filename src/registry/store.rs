use crate::types::Entity;
use ahash::{HashMap, HashMapExt};

/// Insertion ordered storage for one component type
///
/// Components live in a dense `Vec` so that iteration order is the order they
/// were attached in. A side table maps each owning entity to its slot.
/// Removal shifts later components down rather than swapping, which keeps the
/// order stable at the cost of rebuilding the slot table. Components are
/// added and removed during scene setup, not per frame, so that is fine.
#[derive(Clone, Debug)]
pub struct Store<T> {
    owners: Vec<Entity>,
    items: Vec<T>,
    slots: HashMap<Entity, usize>,
}

impl<T> Default for Store<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Store<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            owners: Vec::new(),
            items: Vec::new(),
            slots: HashMap::new(),
        }
    }

    /// Attaches a component to `entity`, returning the one it replaced. A
    /// replaced component keeps its original position in the iteration order.
    pub fn insert(&mut self, entity: Entity, item: T) -> Option<T> {
        if let Some(&slot) = self.slots.get(&entity) {
            return Some(std::mem::replace(&mut self.items[slot], item));
        }
        self.slots.insert(entity, self.items.len());
        self.owners.push(entity);
        self.items.push(item);
        None
    }

    pub fn remove(&mut self, entity: Entity) -> Option<T> {
        let slot = self.slots.remove(&entity)?;
        self.owners.remove(slot);
        let item = self.items.remove(slot);
        for (index, owner) in self.owners.iter().enumerate().skip(slot) {
            self.slots.insert(*owner, index);
        }
        Some(item)
    }

    #[must_use]
    pub fn get(&self, entity: Entity) -> Option<&T> {
        self.slots.get(&entity).map(|&slot| &self.items[slot])
    }

    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        self.slots.get(&entity).map(|&slot| &mut self.items[slot])
    }

    #[must_use]
    pub fn contains(&self, entity: Entity) -> bool {
        self.slots.contains_key(&entity)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates `(owner, component)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.owners.iter().copied().zip(self.items.iter())
    }

    /// Iterates `(owner, component)` pairs in insertion order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> {
        self.owners.iter().copied().zip(self.items.iter_mut())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iteration_follows_insertion_order() {
        let mut store = Store::new();
        store.insert(Entity(7), "a");
        store.insert(Entity(2), "b");
        store.insert(Entity(5), "c");
        let order: Vec<_> = store.iter().map(|(e, v)| (e.0, *v)).collect();
        assert_eq!(order, vec![(7, "a"), (2, "b"), (5, "c")]);
    }

    #[test]
    fn replace_keeps_position() {
        let mut store = Store::new();
        store.insert(Entity(1), 10);
        store.insert(Entity(2), 20);
        assert_eq!(store.insert(Entity(1), 11), Some(10));
        let values: Vec<_> = store.iter().map(|(_, v)| *v).collect();
        assert_eq!(values, vec![11, 20]);
    }

    #[test]
    fn remove_keeps_order_and_lookups() {
        let mut store = Store::new();
        for i in 0..5 {
            store.insert(Entity(i), i * 100);
        }
        assert_eq!(store.remove(Entity(1)), Some(100));
        assert_eq!(store.remove(Entity(1)), None);
        assert_eq!(store.len(), 4);
        assert_eq!(store.get(Entity(3)), Some(&300));
        assert_eq!(store.get(Entity(4)), Some(&400));
        let owners: Vec<_> = store.iter().map(|(e, _)| e.0).collect();
        assert_eq!(owners, vec![0, 2, 3, 4]);
    }
}
