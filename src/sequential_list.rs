use core::fmt;
use core::hash::{Hash, Hasher};
use core::mem;

use thiserror::Error;

pub type SequentialListResult<T> = Result<T, SequentialListError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SequentialListError {
    #[error("index {index} out of range for list of length {len}")]
    OutOfRange { index: usize, len: usize },
}

/// a doubly-linked list with 0-based index addressing, stored as an arena of
/// slots. links are slot indices rather than pointers, so nodes never move
/// and no reference cycles exist; removed slots are recycled through a free
/// chain threaded through the arena.
pub struct SequentialList<T> {
    /// the arena. every slot is on exactly one of the two chains: the list
    /// chain rooted at `head` or the free chain rooted at `free`
    slots: Vec<Slot<T>>,
    /// first node of the list, or None when the list is empty
    head: Option<usize>,
    /// last node of the list, or None when the list is empty
    tail: Option<usize>,
    /// first slot of the free chain
    free: Option<usize>,
    /// the number of occupied slots
    len: usize,
}

/// one arena slot: either a live node or a link in the free chain
enum Slot<T> {
    Occupied {
        value: T,
        prev: Option<usize>,
        next: Option<usize>,
    },
    Vacant {
        next_free: Option<usize>,
    },
}

impl<T> SequentialList<T> {
    /// create a new, empty list
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            head: None,
            tail: None,
            free: None,
            len: 0,
        }
    }

    /// the number of elements in the list
    pub fn len(&self) -> usize {
        self.len
    }

    /// returns true if the length of the list is 0
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// append `value` at the end of the list
    pub fn push_back(&mut self, value: T) {
        let tail = self.tail;
        let idx = self.alloc(value, tail, None);
        match tail {
            Some(t) => self.set_next(t, Some(idx)),
            None => self.head = Some(idx),
        }
        self.tail = Some(idx);
        self.len += 1;
    }

    /// insert `value` so that it occupies position `index`. every index in
    /// `0..=len` is valid; `insert(len, value)` is equivalent to
    /// `push_back(value)`. the list is untouched when the index is rejected.
    pub fn insert(&mut self, index: usize, value: T) -> SequentialListResult<()> {
        if index > self.len {
            return Err(SequentialListError::OutOfRange {
                index,
                len: self.len,
            });
        }

        if index == self.len {
            self.push_back(value);
            return Ok(());
        }

        let at = self.node_at(index);
        let before = self.prev(at);
        let idx = self.alloc(value, before, Some(at));
        self.set_prev(at, Some(idx));
        match before {
            Some(b) => self.set_next(b, Some(idx)),
            None => self.head = Some(idx),
        }
        self.len += 1;
        Ok(())
    }

    /// borrow the element at `index`. valid indices are `0..len`.
    pub fn get(&self, index: usize) -> SequentialListResult<&T> {
        if index >= self.len {
            return Err(SequentialListError::OutOfRange {
                index,
                len: self.len,
            });
        }
        Ok(self.value(self.node_at(index)))
    }

    /// remove and return the element at `index`, relinking its neighbors.
    /// valid indices are `0..len`. the list is untouched when the index is
    /// rejected.
    pub fn remove(&mut self, index: usize) -> SequentialListResult<T> {
        if index >= self.len {
            return Err(SequentialListError::OutOfRange {
                index,
                len: self.len,
            });
        }
        let at = self.node_at(index);
        self.unlink(at);
        Ok(self.release(at))
    }

    /// remove the first element equal to `value`, scanning from the head.
    /// returns whether a removal happened; absence is not an error.
    pub fn remove_value(&mut self, value: &T) -> bool
    where
        T: PartialEq,
    {
        let mut curr = self.head;
        while let Some(idx) = curr {
            if self.value(idx) == value {
                self.unlink(idx);
                self.release(idx);
                return true;
            }
            curr = self.next(idx);
        }
        false
    }

    /// drop every element and reset to the empty state. the arena and its
    /// free chain are discarded wholesale.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.head = None;
        self.tail = None;
        self.free = None;
        self.len = 0;
    }

    /// the position of the first element equal to `value`, or None
    pub fn index_of(&self, value: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.iter().position(|v| v == value)
    }

    /// returns true if some element of the list equals `value`
    pub fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.index_of(value).is_some()
    }

    /// materialize the elements, in traversal order, into an independently
    /// owned `Vec`. this is the bridge into std sequence types; mutating the
    /// result never affects the list.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }

    /// build a new list whose elements are cloned one at a time. the `Clone`
    /// bound settles cloneability at compile time, so unlike a runtime
    /// capability probe there is no fallback path: for element types without
    /// `Clone`, neither this nor [`Clone::clone`] is expressible.
    pub fn deep_copy(&self) -> Self
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }

    /// return an iterator over the elements in traversal order
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            curr: self.head,
        }
    }

    /// the slot index of the node at `index`, walking from whichever end of
    /// the list is nearer. callers must have bounds-checked `index < len`.
    fn node_at(&self, index: usize) -> usize {
        debug_assert!(index < self.len);
        if index < self.len / 2 {
            let mut curr = self.head.expect("bounds-checked index on an empty list");
            for _ in 0..index {
                curr = self.next(curr).expect("next chain ended before tail");
            }
            curr
        } else {
            let mut curr = self.tail.expect("bounds-checked index on an empty list");
            for _ in index + 1..self.len {
                curr = self.prev(curr).expect("prev chain ended before head");
            }
            curr
        }
    }

    /// take a slot from the free chain, or grow the arena, returning the new
    /// node's index. links are stored as given; the caller patches neighbors.
    fn alloc(&mut self, value: T, prev: Option<usize>, next: Option<usize>) -> usize {
        let slot = Slot::Occupied { value, prev, next };
        match self.free {
            Some(idx) => {
                let vacant = mem::replace(&mut self.slots[idx], slot);
                self.free = match vacant {
                    Slot::Vacant { next_free } => next_free,
                    Slot::Occupied { .. } => {
                        unreachable!("free chain never points at occupied slots")
                    }
                };
                idx
            }
            None => {
                self.slots.push(slot);
                self.slots.len() - 1
            }
        }
    }

    /// detach the node at `idx` from the list chain, patching its neighbors
    /// (or `head`/`tail` at the ends) and decrementing `len`. the slot itself
    /// stays occupied until `release` reclaims it.
    fn unlink(&mut self, idx: usize) {
        let (prev, next) = (self.prev(idx), self.next(idx));
        match prev {
            Some(p) => self.set_next(p, next),
            None => self.head = next,
        }
        match next {
            Some(n) => self.set_prev(n, prev),
            None => self.tail = prev,
        }
        self.len -= 1;
    }

    /// push the slot at `idx` onto the free chain, yielding its value
    fn release(&mut self, idx: usize) -> T {
        let slot = mem::replace(
            &mut self.slots[idx],
            Slot::Vacant {
                next_free: self.free,
            },
        );
        self.free = Some(idx);
        match slot {
            Slot::Occupied { value, .. } => value,
            Slot::Vacant { .. } => unreachable!("released slots are always occupied"),
        }
    }

    fn value(&self, idx: usize) -> &T {
        match &self.slots[idx] {
            Slot::Occupied { value, .. } => value,
            Slot::Vacant { .. } => unreachable!("list links never point at vacant slots"),
        }
    }

    fn prev(&self, idx: usize) -> Option<usize> {
        match &self.slots[idx] {
            Slot::Occupied { prev, .. } => *prev,
            Slot::Vacant { .. } => unreachable!("list links never point at vacant slots"),
        }
    }

    fn next(&self, idx: usize) -> Option<usize> {
        match &self.slots[idx] {
            Slot::Occupied { next, .. } => *next,
            Slot::Vacant { .. } => unreachable!("list links never point at vacant slots"),
        }
    }

    fn set_prev(&mut self, idx: usize, new_prev: Option<usize>) {
        match &mut self.slots[idx] {
            Slot::Occupied { prev, .. } => *prev = new_prev,
            Slot::Vacant { .. } => unreachable!("list links never point at vacant slots"),
        }
    }

    fn set_next(&mut self, idx: usize, new_next: Option<usize>) {
        match &mut self.slots[idx] {
            Slot::Occupied { next, .. } => *next = new_next,
            Slot::Vacant { .. } => unreachable!("list links never point at vacant slots"),
        }
    }

    /// walk both chains and panic on any broken link or bookkeeping mismatch
    #[cfg(test)]
    fn check_invariants(&self) {
        assert_eq!(self.len == 0, self.head.is_none());
        assert_eq!(self.len == 0, self.tail.is_none());

        // the forward walk must visit exactly `len` nodes, end at `tail`, and
        // see a matching back-link at every step
        let mut visited = 0;
        let mut last = None;
        let mut curr = self.head;
        while let Some(idx) = curr {
            assert_eq!(self.prev(idx), last, "back-link mismatch at slot {idx}");
            assert!(visited < self.len, "forward walk exceeded len");
            last = Some(idx);
            visited += 1;
            curr = self.next(idx);
        }
        assert_eq!(visited, self.len);
        assert_eq!(last, self.tail);

        // the free chain must account for every slot the list chain does not
        let mut vacant = 0;
        let mut curr = self.free;
        while let Some(idx) = curr {
            vacant += 1;
            assert!(vacant <= self.slots.len(), "free chain longer than arena");
            curr = match self.slots[idx] {
                Slot::Vacant { next_free } => next_free,
                Slot::Occupied { .. } => panic!("free chain points at an occupied slot"),
            };
        }
        assert_eq!(self.len + vacant, self.slots.len());
    }
}

impl<T> Default for SequentialList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for SequentialList<T> {
    /// a copy rebuilds the node structure from scratch: no slot or link is
    /// shared with the source, so mutating one list can never affect the
    /// other. element values follow `T`'s own clone semantics.
    fn clone(&self) -> Self {
        let mut copy = Self::new();
        for value in self.iter() {
            copy.push_back(value.clone());
        }
        copy
    }
}

/// the copy-constructor call form; equivalent to [`Clone::clone`]
impl<T: Clone> From<&SequentialList<T>> for SequentialList<T> {
    fn from(other: &SequentialList<T>) -> Self {
        other.clone()
    }
}

impl<T> Extend<T> for SequentialList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push_back(value);
        }
    }
}

impl<T> FromIterator<T> for SequentialList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}

impl<'a, T> IntoIterator for &'a SequentialList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T: PartialEq> PartialEq for SequentialList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for SequentialList<T> {}

impl<T: Hash> Hash for SequentialList<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len.hash(state);
        for value in self.iter() {
            value.hash(state);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for SequentialList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// diagnostic rendering: `[a, b, c]`, `[]` when empty. never parsed back.
impl<T: fmt::Display> fmt::Display for SequentialList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, value) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{value}")?;
        }
        write!(f, "]")
    }
}

/// an immutable, in-order iterator over a [`SequentialList`]
pub struct Iter<'a, T> {
    list: &'a SequentialList<T>,
    curr: Option<usize>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.curr?;
        self.curr = self.list.next(idx);
        Some(self.list.value(idx))
    }
}


// proptest doesn't run under miri with default config
#[cfg(all(not(miri), test))]
mod proptests {
    use std::collections::VecDeque;

    use proptest::prelude::*;
    use proptest::test_runner::Config;
    use proptest_state_machine::{ReferenceStateMachine, StateMachineTest};

    use super::*;

    proptest_state_machine::prop_state_machine! {
        #![proptest_config(Config {
            // No regression file is captured for this test.
            failure_persistence: None,
            .. Config::default()
        })]

        #[test]
        fn sequential_list_state_machine_test(
            // This is a macro's keyword - only `sequential` is currently supported.
            sequential
            // The number of transitions to be generated for each case.
            1..100
            // Macro's boilerplate to separate the following identifier.
            =>
            // The name of the type that implements `StateMachineTest`.
            SequentialList<u32>
        );
    }

    /// The possible transitions of the state machine.
    #[derive(Clone, Debug)]
    pub enum Transition {
        PushBack(u32),
        Insert(usize, u32),
        Remove(usize),
        RemoveValue(u32),
        Clear,
    }

    pub struct SequentialListStateMachine;

    // Implementation of the reference state machine that drives the test. The
    // reference is a std VecDeque, which supports the same indexed insert and
    // remove operations.
    impl ReferenceStateMachine for SequentialListStateMachine {
        type State = VecDeque<u32>;
        type Transition = Transition;

        fn init_state() -> BoxedStrategy<Self::State> {
            Just(VecDeque::new()).boxed()
        }

        fn transitions(state: &Self::State) -> BoxedStrategy<Self::Transition> {
            let len = state.len();
            if len == 0 {
                prop_oneof![
                    3 => any::<u32>().prop_map(Transition::PushBack),
                    1 => any::<u32>().prop_map(|v| Transition::Insert(0, v)),
                    1 => any::<u32>().prop_map(Transition::RemoveValue),
                    1 => Just(Transition::Clear),
                ]
                .boxed()
            } else {
                prop_oneof![
                    3 => any::<u32>().prop_map(Transition::PushBack),
                    2 => (0..=len, any::<u32>()).prop_map(|(i, v)| Transition::Insert(i, v)),
                    2 => (0..len).prop_map(Transition::Remove),
                    1 => any::<u32>().prop_map(Transition::RemoveValue),
                    1 => Just(Transition::Clear),
                ]
                .boxed()
            }
        }

        fn preconditions(state: &Self::State, transition: &Self::Transition) -> bool {
            // Generated indices can fall out of bounds after shrinking.
            match transition {
                Transition::Insert(index, _) => *index <= state.len(),
                Transition::Remove(index) => *index < state.len(),
                _ => true,
            }
        }

        fn apply(mut state: Self::State, transition: &Self::Transition) -> Self::State {
            match transition {
                Transition::PushBack(value) => state.push_back(*value),
                Transition::Insert(index, value) => state.insert(*index, *value),
                Transition::Remove(index) => {
                    state.remove(*index);
                }
                Transition::RemoveValue(value) => {
                    if let Some(pos) = state.iter().position(|v| v == value) {
                        state.remove(pos);
                    }
                }
                Transition::Clear => state.clear(),
            }
            state
        }
    }

    impl StateMachineTest for SequentialList<u32> {
        type SystemUnderTest = Self;
        type Reference = SequentialListStateMachine;

        fn init_test(
            _ref_state: &<Self::Reference as ReferenceStateMachine>::State,
        ) -> Self::SystemUnderTest {
            Self::new()
        }

        fn apply(
            mut state: Self::SystemUnderTest,
            _ref_state: &<Self::Reference as ReferenceStateMachine>::State,
            transition: Transition,
        ) -> Self::SystemUnderTest {
            match transition {
                Transition::PushBack(value) => state.push_back(value),
                Transition::Insert(index, value) => {
                    state.insert(index, value).expect("in-bounds insert failed");
                }
                Transition::Remove(index) => {
                    state.remove(index).expect("in-bounds remove failed");
                }
                Transition::RemoveValue(value) => {
                    state.remove_value(&value);
                }
                Transition::Clear => state.clear(),
            }
            state
        }

        fn check_invariants(
            state: &Self::SystemUnderTest,
            ref_state: &<Self::Reference as ReferenceStateMachine>::State,
        ) {
            assert_eq!(state.len(), ref_state.len());

            for (got, expected) in state.iter().zip(ref_state.iter()) {
                assert_eq!(got, expected);
            }

            state.check_invariants();
        }
    }
}
