use crate::sequential_list::{SequentialList, SequentialListResult};

/// a container that declares a maximum size over a [`SequentialList`].
///
/// the declared capacity is carried verbatim from construction, but no
/// operation reads it: `add` keeps succeeding past the declared size. whether
/// to enforce it (turning `add` fallible) is an open question tracked in
/// DESIGN.md; until it is resolved the container reproduces the original,
/// unenforced behavior.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct BoundedContainer<T> {
    capacity: usize,
    values: SequentialList<T>,
}

impl<T> BoundedContainer<T> {
    /// create an empty container declaring `capacity`. the value is not
    /// validated.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            values: SequentialList::new(),
        }
    }

    /// append `value` at the end of the container
    pub fn add(&mut self, value: T) {
        self.values.push_back(value);
    }

    /// insert `value` so that it occupies position `index`
    pub fn insert(&mut self, index: usize, value: T) -> SequentialListResult<()> {
        self.values.insert(index, value)
    }

    /// borrow the element at `index`
    pub fn get(&self, index: usize) -> SequentialListResult<&T> {
        self.values.get(index)
    }

    /// remove the first element equal to `value`, reporting whether one was
    /// found
    pub fn remove_value(&mut self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.values.remove_value(value)
    }

    /// remove and return the element at `index`
    pub fn remove(&mut self, index: usize) -> SequentialListResult<T> {
        self.values.remove(index)
    }

    /// the capacity declared at construction
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// an independent copy of the stored values; mutating it never touches
    /// the container
    pub fn values(&self) -> SequentialList<T>
    where
        T: Clone,
    {
        self.values.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequential_list::SequentialListError;

    #[test]
    fn new_container_is_empty_and_keeps_capacity() {
        let container: BoundedContainer<String> = BoundedContainer::new(5);
        assert_eq!(container.capacity(), 5);
        assert!(container.values().is_empty());
    }

    #[test]
    fn add_and_get_forward_to_the_list() {
        let mut container = BoundedContainer::new(5);
        container.add("test1");
        container.add("test2");
        assert_eq!(container.values().len(), 2);
        assert_eq!(container.get(0), Ok(&"test1"));
        assert_eq!(container.get(1), Ok(&"test2"));
    }

    #[test]
    fn insert_at_index_forwards_to_the_list() {
        let mut container = BoundedContainer::new(5);
        container.add("first");
        container.insert(0, "newFirst").expect("failed to insert");
        container.insert(1, "middle").expect("failed to insert");
        assert_eq!(container.values().len(), 3);
        assert_eq!(container.get(0), Ok(&"newFirst"));
        assert_eq!(container.get(1), Ok(&"middle"));
        assert_eq!(container.get(2), Ok(&"first"));
    }

    #[test]
    fn remove_value_reports_presence() {
        let mut container = BoundedContainer::new(5);
        container.add("toRemove");
        container.add("toKeep");
        assert!(container.remove_value(&"toRemove"));
        assert!(!container.remove_value(&"nonExistent"));
        assert_eq!(container.values().len(), 1);
    }

    #[test]
    fn remove_at_index_forwards_failures() {
        let mut container = BoundedContainer::new(5);
        container.add(73);
        assert_eq!(container.remove(0), Ok(73));
        assert_eq!(
            container.remove(0),
            Err(SequentialListError::OutOfRange { index: 0, len: 0 })
        );
    }

    #[test]
    fn declared_capacity_is_not_enforced() {
        // documents the unenforced capacity: every add past the declared
        // size still succeeds
        let mut container = BoundedContainer::new(1);
        container.add(1);
        container.add(2);
        container.add(3);
        assert_eq!(container.values().len(), 3);
        assert_eq!(container.capacity(), 1);
    }

    #[test]
    fn values_returns_an_independent_copy() {
        let mut container = BoundedContainer::new(5);
        container.add(1);
        container.add(2);
        let mut values = container.values();
        values.push_back(3);
        values.remove(0).expect("failed to remove");
        assert_eq!(container.values().to_vec(), vec![1, 2]);
    }

    #[test]
    fn equality_requires_equal_capacity_and_values() {
        let mut a = BoundedContainer::new(5);
        let mut b = BoundedContainer::new(5);
        a.add(1);
        b.add(1);
        assert_eq!(a, b);

        let mut different_capacity = BoundedContainer::new(6);
        different_capacity.add(1);
        assert_ne!(a, different_capacity);

        b.add(2);
        assert_ne!(a, b);
    }

    #[test]
    fn hash_is_consistent_with_equality() {
        use std::collections::HashSet;

        let mut a = BoundedContainer::new(5);
        let mut b = BoundedContainer::new(5);
        a.add(1);
        b.add(1);
        let mut set = HashSet::new();
        set.insert(a);
        set.insert(b);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn debug_renders_capacity_and_values() {
        let mut container = BoundedContainer::new(2);
        container.add(1);
        assert_eq!(
            format!("{container:?}"),
            "BoundedContainer { capacity: 2, values: [1] }"
        );
    }
}
