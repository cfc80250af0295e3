//! Arena-based red-black tree shared by ordered map and set containers.
//!
//! One balancing engine, [`RbTree`], is parameterised by a projection policy
//! ([`TreeTraits`]) that tells it how to pull a key out of a stored value.
//! [`RbSet`] stores bare keys, [`RbMap`] stores `(K, V)` pairs; neither
//! duplicates any of the insert/erase/rebalance logic.
//!
//! Instead of raw pointers, every link is an `Option<u32>` index into an
//! arena owned by the tree ([`NodeArena`]). Slot 0 is the head sentinel. It
//! is the parent of the root and links to the minimum and maximum; it also
//! serves as the end position of every traversal.
//!
//! Positions are [`Cursor`]s. They survive inserts and the erase of other
//! nodes, and are checked against the owning tree in debug builds.
//!
//! ```
//! use ordered_tree::RbMap;
//!
//! let mut map = RbMap::<u32, &str>::new();
//! map.insert((2, "two")).unwrap();
//! map.insert((1, "one")).unwrap();
//! let two = map.find(&2);
//! map.insert((3, "three")).unwrap();
//! assert_eq!(map.value(two), &(2, "two"));
//! assert_eq!(map.erase_key(&1), 1);
//! assert_eq!(map.erase_key(&1), 0);
//! assert!(map.at(&1).is_err());
//! map.verify().unwrap();
//! ```
//!
//! # Module layout
//!
//! | Module | Contents |
//! |--------|----------|
//! [`types`] | [`Node`] trait, [`RbNode`], [`Color`], [`HEAD`] |
//! [`arena`] | [`NodeArena`] slot allocator, [`Reservation`], [`TreeOptions`] |
//! [`traits`] | [`TreeTraits`], [`SetTraits`], [`MapTraits`] |
//! [`compare`] | [`Comparator`], [`Less`] |
//! [`util`] | `first`, `last`, `next`, `prev`, `swap` over arena links |
//! [`red_black`] | rebalancing, [`RbTree`], iterators, map/set façades |

pub mod arena;
pub mod compare;
pub mod cursor;
pub mod error;
pub mod red_black;
pub mod traits;
pub mod types;
pub mod util;

pub use arena::{NodeArena, Reservation, TreeOptions};
pub use compare::{Comparator, Less};
pub use cursor::Cursor;
pub use error::{InvariantViolation, TreeError};
pub use red_black::{IntoIter, Iter, Range, RbMap, RbSet, RbTree};
pub use traits::{MapTraits, MappedMut, SetTraits, TreeTraits};
pub use types::{Color, Node, RbNode, HEAD};
