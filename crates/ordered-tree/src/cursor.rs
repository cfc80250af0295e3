use crate::types::HEAD;

/// A position in a tree: a node, or the end position.
///
/// Cursors are plain handles. They do not borrow the tree, so one taken
/// before an insert (or before an erase of some other node) stays valid and
/// keeps addressing the same value afterwards. A cursor is invalidated only
/// by erasing the node it addresses; debug builds catch the use of such a
/// cursor through the slot generation it records.
///
/// Every cursor also records the identity of the tree that produced it.
/// Cursors of different trees never form a range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cursor {
    pub(crate) tree: u64,
    pub(crate) node: u32,
    pub(crate) gen: u32,
}

impl Cursor {
    #[inline]
    pub(crate) fn new(tree: u64, node: u32, gen: u32) -> Self {
        Self { tree, node, gen }
    }

    #[inline]
    pub(crate) fn end(tree: u64) -> Self {
        Self {
            tree,
            node: HEAD,
            gen: 0,
        }
    }

    /// Whether this is the one-past-the-last position.
    #[inline]
    pub fn is_end(&self) -> bool {
        self.node == HEAD
    }

    /// Arena slot addressed by the cursor.
    #[inline]
    pub fn index(&self) -> u32 {
        self.node
    }

    /// Whether `self` and `other` come from the same tree instance.
    #[inline]
    pub fn same_tree(&self, other: &Cursor) -> bool {
        self.tree == other.tree
    }
}
