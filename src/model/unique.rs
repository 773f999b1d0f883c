// File: ./src/model/unique.rs
use crate::model::error::{EntityKind, ModelError};

/// Records that carry an identity weaker than full value equality.
/// Two items can be "the same" record while their mutable fields differ.
pub trait UniqueItem: Clone + PartialEq {
    const KIND: EntityKind;

    fn is_same(&self, other: &Self) -> bool;
}

/// Ordered collection that never holds two items of the same identity.
/// Lookup for replacement is identity-based; removal is full equality.
#[derive(Debug, Clone)]
pub struct UniqueList<T: UniqueItem> {
    items: Vec<T>,
}

impl<T: UniqueItem> Default for UniqueList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: UniqueItem> UniqueList<T> {
    pub fn new() -> Self {
        UniqueList { items: Vec::new() }
    }

    pub fn contains(&self, item: &T) -> bool {
        self.items.iter().any(|existing| existing.is_same(item))
    }

    /// Appends `item`, preserving insertion order.
    pub fn add(&mut self, item: T) -> Result<(), ModelError> {
        if self.contains(&item) {
            return Err(ModelError::Duplicate(T::KIND));
        }
        self.items.push(item);
        Ok(())
    }

    /// Replaces the element matching `target` by identity, in place.
    /// The replacement may change the identity as long as the new one
    /// does not collide with a different element.
    pub fn set(&mut self, target: &T, replacement: T) -> Result<(), ModelError> {
        let index = self
            .items
            .iter()
            .position(|existing| existing.is_same(target))
            .ok_or(ModelError::NotFound(T::KIND))?;
        if !target.is_same(&replacement) && self.contains(&replacement) {
            return Err(ModelError::Duplicate(T::KIND));
        }
        self.items[index] = replacement;
        Ok(())
    }

    /// Removes the element fully equal to `item`, identity aside.
    pub fn remove(&mut self, item: &T) -> Result<(), ModelError> {
        let index = self
            .items
            .iter()
            .position(|existing| existing == item)
            .ok_or(ModelError::NotFound(T::KIND))?;
        self.items.remove(index);
        Ok(())
    }

    /// Wholesale replacement, rejected when `items` holds two entries of
    /// the same identity.
    pub fn replace_all(&mut self, items: Vec<T>) -> Result<(), ModelError> {
        if !Self::are_unique(&items) {
            return Err(ModelError::Duplicate(T::KIND));
        }
        self.items = items;
        Ok(())
    }

    /// True when no pair in `items` shares an identity.
    pub fn are_unique(items: &[T]) -> bool {
        for (index, item) in items.iter().enumerate() {
            if items[index + 1..].iter().any(|other| item.is_same(other)) {
                return false;
            }
        }
        true
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
