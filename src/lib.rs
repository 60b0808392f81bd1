//! Index-addressable sequential collections backed by an arena of slots.
//!
//! [`SequentialList`] is a doubly-linked list whose links are stable slot
//! indices rather than pointers; [`BoundedContainer`] pairs a list with a
//! declared (but unenforced) capacity.

pub mod bounded_container;
pub mod sequential_list;

pub use bounded_container::BoundedContainer;
pub use sequential_list::{SequentialList, SequentialListError, SequentialListResult};
