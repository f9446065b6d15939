use std::collections::HashMap;
use std::fmt::{Debug, Display};
use std::hash::Hash;

// =============================================================================
// 1. THE ABSTRACTION (Entity trait with actions)
// =============================================================================

/// Trait that any domain entity must implement to be held by a [`ResourceStore`].
pub trait Entity: Clone + Debug {
    type Id: Eq + Hash + Clone + Display + Debug;

    // --- Custom Actions ---
    type Action: Debug;
    type ActionResult: Debug;
    type Error: From<StoreError<Self::Id>>;

    /// Get the ID of the entity
    fn id(&self) -> &Self::Id;

    // --- Action Handler ---

    /// Handle a domain-specific action. On error the entity must be left unchanged.
    fn handle_action(&mut self, action: Self::Action) -> Result<Self::ActionResult, Self::Error>;
}

/// Failures raised by the store itself rather than by an entity.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreError<Id> {
    Duplicate(Id),
    NotFound(Id),
}

// =============================================================================
// 2. THE GENERIC STORE
// =============================================================================

/// Keyed collection of entities that remembers insertion order.
#[derive(Debug, Clone)]
pub struct ResourceStore<T: Entity> {
    items: HashMap<T::Id, T>,
    order: Vec<T::Id>,
}

impl<T: Entity> Default for ResourceStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> ResourceStore<T> {
    pub fn new() -> Self {
        Self {
            items: HashMap::new(),
            order: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, id: &T::Id) -> bool {
        self.items.contains_key(id)
    }

    pub fn get(&self, id: &T::Id) -> Option<&T> {
        self.items.get(id)
    }

    pub fn insert(&mut self, item: T) -> Result<(), T::Error> {
        let id = item.id().clone();
        if self.items.contains_key(&id) {
            return Err(StoreError::Duplicate(id).into());
        }
        self.order.push(id.clone());
        self.items.insert(id, item);
        Ok(())
    }

    pub fn remove(&mut self, id: &T::Id) -> Result<T, T::Error> {
        let item = self
            .items
            .remove(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        self.order.retain(|existing| existing != id);
        Ok(item)
    }

    pub fn perform_action(&mut self, id: &T::Id, action: T::Action) -> Result<T::ActionResult, T::Error> {
        match self.items.get_mut(id) {
            Some(item) => item.handle_action(action),
            None => Err(StoreError::NotFound(id.clone()).into()),
        }
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.order.iter().filter_map(move |id| self.items.get(id))
    }

    /// Remove every entity for which `predicate` returns true, returning them in insertion order.
    pub fn extract_if(&mut self, mut predicate: impl FnMut(&T) -> bool) -> Vec<T> {
        let items = &mut self.items;
        let mut removed = Vec::new();
        self.order.retain(|id| {
            let matched = items.get(id).map(&mut predicate).unwrap_or(false);
            if matched {
                if let Some(item) = items.remove(id) {
                    removed.push(item);
                }
            }
            !matched
        });
        removed
    }
}
