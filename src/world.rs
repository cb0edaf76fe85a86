/// Entity registry.
/// Owns every registered entity and hands out stable slot ids; the
/// renderer's per-frame records refer back into the registry by id, so
/// removal must not shift surviving entities.
use crate::entity::Entity;

/// Stable handle to a registered entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId(pub usize);

/// Slot-indexed container of boxed entities with free-list reuse.
#[derive(Default)]
pub struct World {
    slots: Vec<Option<Box<dyn Entity>>>,
    free: Vec<usize>,
    live: usize,
}

impl World {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
        }
    }

    /// Register an entity; returns the id the renderer will use for it.
    pub fn add_entity(&mut self, entity: Box<dyn Entity>) -> EntityId {
        self.live += 1;
        match self.free.pop() {
            Some(index) => {
                self.slots[index] = Some(entity);
                EntityId(index)
            }
            None => {
                self.slots.push(Some(entity));
                EntityId(self.slots.len() - 1)
            }
        }
    }

    /// Unregister an entity, returning ownership to the caller.
    pub fn remove_entity(&mut self, id: EntityId) -> Option<Box<dyn Entity>> {
        let removed = self.slots.get_mut(id.0).and_then(Option::take);
        if removed.is_some() {
            self.free.push(id.0);
            self.live -= 1;
        }
        removed
    }

    pub fn get(&self, id: EntityId) -> Option<&dyn Entity> {
        self.slots.get(id.0).and_then(|slot| slot.as_deref())
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut (dyn Entity + 'static)> {
        self.slots.get_mut(id.0).and_then(|slot| slot.as_deref_mut())
    }

    /// Number of live entities.
    pub fn entity_count(&self) -> usize {
        self.live
    }

    /// Iterate live entities in slot order. Slot order is the queue
    /// insertion order, which is what breaks depth ties.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut (dyn Entity + 'static))> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_deref_mut().map(|e| (EntityId(index), e)))
    }

    /// Advance all entities; independent of rendering.
    pub fn update(&mut self, dt: f32) {
        for (_, entity) in self.iter_mut() {
            entity.update(dt);
        }
    }

    /// Drop all entities
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.live = 0;
    }
}
