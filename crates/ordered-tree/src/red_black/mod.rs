//! Red-black tree engine and its map/set façades.

pub mod iter;
pub mod map;
pub mod set;
pub mod tree;
pub mod util;

pub use iter::{IntoIter, Iter, Range};
pub use map::RbMap;
pub use set::RbSet;
pub use tree::RbTree;
pub use util::{assert_red_black_tree, insert_at, remove};
