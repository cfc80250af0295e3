use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{self, AtomicU64};

use log::trace;

use crate::arena::{NodeArena, TreeOptions};
use crate::compare::{Comparator, Less};
use crate::cursor::Cursor;
use crate::error::{InvariantViolation, TreeError};
use crate::traits::{MappedMut, TreeTraits};
use crate::types::{RbNode, HEAD};
use crate::util;

use super::iter::{IntoIter, Iter, Range};
use super::util as rb;

static NEXT_TREE_ID: AtomicU64 = AtomicU64::new(1);

fn next_tree_id() -> u64 {
    NEXT_TREE_ID.fetch_add(1, atomic::Ordering::Relaxed)
}

/// Result of a descent: the node holding an equivalent key, or the leaf
/// position where the key would be linked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Position {
    Found(u32),
    Vacant { parent: u32, left: bool },
}

/// Arena-backed red-black tree, generic over a key-projection policy `P`
/// and a comparator `C`.
///
/// The same engine backs [`RbSet`](crate::RbSet) (`P = SetTraits<K>`) and
/// [`RbMap`](crate::RbMap) (`P = MapTraits<K, V>`). Positions are reported
/// as [`Cursor`]s, which stay valid across unrelated inserts and erases.
///
/// ```
/// use ordered_tree::{RbTree, SetTraits};
///
/// let mut tree = RbTree::<SetTraits<i32>>::new();
/// for k in [5, 3, 8, 1, 4, 7, 9] {
///     tree.insert(k).unwrap();
/// }
/// let four = tree.find(&4);
/// tree.insert(6).unwrap();
/// assert_eq!(*tree.value(four), 4);
/// assert_eq!(tree.iter().copied().collect::<Vec<_>>(), vec![1, 3, 4, 5, 6, 7, 8, 9]);
/// tree.verify().unwrap();
/// ```
pub struct RbTree<P: TreeTraits, C = Less> {
    id: u64,
    arena: NodeArena<P::Value>,
    len: usize,
    comparator: C,
    _traits: PhantomData<P>,
}

impl<P: TreeTraits> RbTree<P, Less>
where
    P::Key: Ord,
{
    pub fn new() -> Self {
        Self::with_comparator(Less)
    }
}

impl<P: TreeTraits, C: Default> Default for RbTree<P, C> {
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<P: TreeTraits, C> RbTree<P, C> {
    pub fn with_comparator(comparator: C) -> Self {
        Self::with_options(comparator, TreeOptions::default())
    }

    pub fn with_options(comparator: C, options: TreeOptions) -> Self {
        Self {
            id: next_tree_id(),
            arena: NodeArena::new(options),
            len: 0,
            comparator,
            _traits: PhantomData,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    /// Raw node slots, [`HEAD`] first. Vacant slots hold no value.
    #[inline]
    pub fn nodes(&self) -> &[RbNode<P::Value>] {
        self.arena.nodes()
    }

    #[inline]
    fn cursor(&self, node: u32) -> Cursor {
        Cursor::new(self.id, node, self.arena.node(node).g)
    }

    #[inline]
    fn min_node(&self) -> u32 {
        self.arena.node(HEAD).l.unwrap_or(HEAD)
    }

    #[inline]
    fn max_node(&self) -> u32 {
        self.arena.node(HEAD).r.unwrap_or(HEAD)
    }

    #[inline]
    pub(crate) fn value_at(&self, node: u32) -> &P::Value {
        self.arena
            .node(node)
            .v
            .as_ref()
            .expect("linked node holds a value")
    }

    #[inline]
    fn key_at(&self, node: u32) -> &P::Key {
        P::extract_key(self.value_at(node))
    }

    #[inline]
    fn check_cursor(&self, cursor: &Cursor) {
        debug_assert_eq!(cursor.tree, self.id, "cursor belongs to another tree");
        debug_assert!(
            cursor.is_end() || {
                let node = self.arena.node(cursor.node);
                node.is_occupied() && node.g == cursor.gen
            },
            "cursor addresses an erased node"
        );
    }

    /// Cursor on the minimum, or [`Self::end`] when empty.
    pub fn begin(&self) -> Cursor {
        self.cursor(self.min_node())
    }

    /// The one-past-the-last position.
    pub fn end(&self) -> Cursor {
        Cursor::end(self.id)
    }

    pub fn first(&self) -> Option<&P::Value> {
        let min = self.min_node();
        (min != HEAD).then(|| self.value_at(min))
    }

    pub fn last(&self) -> Option<&P::Value> {
        let max = self.max_node();
        (max != HEAD).then(|| self.value_at(max))
    }

    /// In-order successor of `cursor`. Advancing [`Self::end`] is a
    /// precondition violation.
    pub fn next(&self, cursor: Cursor) -> Cursor {
        self.check_cursor(&cursor);
        debug_assert!(!cursor.is_end(), "cannot advance past end");
        self.cursor(util::next(self.nodes(), cursor.node))
    }

    /// In-order predecessor of `cursor`; `prev(end())` is the maximum.
    /// Stepping back from [`Self::begin`] is a precondition violation.
    pub fn prev(&self, cursor: Cursor) -> Cursor {
        self.check_cursor(&cursor);
        let prev = util::prev(self.nodes(), cursor.node);
        debug_assert_ne!(prev, HEAD, "cannot step before begin");
        self.cursor(prev)
    }

    /// Value at `cursor`.
    ///
    /// # Panics
    ///
    /// When `cursor` is the end position or addresses an erased node.
    pub fn value(&self, cursor: Cursor) -> &P::Value {
        self.check_cursor(&cursor);
        debug_assert!(!cursor.is_end(), "cannot dereference end");
        self.value_at(cursor.node)
    }

    pub fn key(&self, cursor: Cursor) -> &P::Key {
        P::extract_key(self.value(cursor))
    }

    pub fn mapped(&self, cursor: Cursor) -> &P::Mapped {
        P::extract_mapped(self.value(cursor))
    }

    /// Number of steps from `first` to `last`.
    pub fn distance(&self, first: Cursor, last: Cursor) -> usize {
        debug_assert!(first.same_tree(&last), "cursors belong to different trees");
        self.range(first, last).count()
    }

    pub fn iter(&self) -> Iter<'_, P, C> {
        Iter::new(self.range(self.begin(), self.end()), self.len)
    }

    /// Values in `[first, last)`.
    pub fn range(&self, first: Cursor, last: Cursor) -> Range<'_, P, C> {
        self.check_cursor(&first);
        self.check_cursor(&last);
        debug_assert!(first.same_tree(&last), "cursors belong to different trees");
        Range::new(self, first.node, last.node)
    }

    /// Values from `cursor` to the end.
    pub fn iter_from(&self, cursor: Cursor) -> Range<'_, P, C> {
        self.range(cursor, self.end())
    }

    /// Erases the node at `cursor` and returns its successor.
    pub fn erase(&mut self, cursor: Cursor) -> Cursor {
        self.check_cursor(&cursor);
        debug_assert!(!cursor.is_end(), "cannot erase end");
        let after = util::next(self.nodes(), cursor.node);
        self.unlink(cursor.node);
        self.cursor(after)
    }

    /// Erases `[first, last)` and returns `last`.
    pub fn erase_range(&mut self, first: Cursor, last: Cursor) -> Cursor {
        self.check_cursor(&first);
        self.check_cursor(&last);
        debug_assert!(first.same_tree(&last), "cursors belong to different trees");
        if first.node == self.min_node() && last.is_end() {
            self.clear();
            return self.end();
        }
        let mut curr = first;
        while curr.node != last.node {
            curr = self.erase(curr);
        }
        curr
    }

    /// Removes and returns the minimum.
    pub fn pop_first(&mut self) -> Option<P::Value> {
        let min = self.min_node();
        (min != HEAD).then(|| self.unlink(min))
    }

    /// Removes and returns the maximum.
    pub fn pop_last(&mut self) -> Option<P::Value> {
        let max = self.max_node();
        (max != HEAD).then(|| self.unlink(max))
    }

    /// Keeps only the values for which `keep` returns `true`.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&P::Value) -> bool,
    {
        let mut curr = self.begin();
        while !curr.is_end() {
            curr = if keep(self.value(curr)) {
                self.next(curr)
            } else {
                self.erase(curr)
            };
        }
    }

    pub fn clear(&mut self) {
        self.arena.clear();
        self.len = 0;
    }

    fn unlink(&mut self, node: u32) -> P::Value {
        rb::remove(self.arena.nodes_mut(), node);
        self.len -= 1;
        let value = self
            .arena
            .destroy(node)
            .expect("linked node holds a value");
        self.arena.deallocate(node);
        value
    }

    fn attach(&mut self, slot: u32, parent: u32, left: bool) -> Cursor {
        rb::insert_at(self.arena.nodes_mut(), slot, parent, left);
        self.len += 1;
        self.cursor(slot)
    }
}

impl<P: MappedMut, C> RbTree<P, C> {
    /// Mutable access to the mapped half of the value at `cursor`. The key is
    /// never reachable mutably.
    pub fn mapped_mut(&mut self, cursor: Cursor) -> &mut P::Mapped {
        self.check_cursor(&cursor);
        debug_assert!(!cursor.is_end(), "cannot dereference end");
        let value = self
            .arena
            .node_mut(cursor.node)
            .v
            .as_mut()
            .expect("linked node holds a value");
        P::extract_mapped_mut(value)
    }
}

impl<P: TreeTraits, C: Comparator<P::Key>> RbTree<P, C> {
    fn find_node(&self, key: &P::Key) -> Option<u32> {
        let mut curr = util::root(self.nodes());
        while let Some(i) = curr {
            curr = match self.comparator.order(key, self.key_at(i)) {
                Ordering::Equal => return Some(i),
                Ordering::Less => self.arena.node(i).l,
                Ordering::Greater => self.arena.node(i).r,
            };
        }
        None
    }

    /// Descends to `key`, trying the extremes first so that sorted input
    /// appends in O(1) comparisons.
    fn locate(&self, key: &P::Key) -> Position {
        let Some(root) = util::root(self.nodes()) else {
            return Position::Vacant {
                parent: HEAD,
                left: true,
            };
        };

        let max = self.max_node();
        match self.comparator.order(key, self.key_at(max)) {
            Ordering::Greater => {
                return Position::Vacant {
                    parent: max,
                    left: false,
                }
            }
            Ordering::Equal => return Position::Found(max),
            Ordering::Less => {}
        }

        let min = self.min_node();
        match self.comparator.order(key, self.key_at(min)) {
            Ordering::Less => {
                return Position::Vacant {
                    parent: min,
                    left: true,
                }
            }
            Ordering::Equal => return Position::Found(min),
            Ordering::Greater => {}
        }

        let mut curr = root;
        loop {
            let node = self.arena.node(curr);
            match self.comparator.order(key, self.key_at(curr)) {
                Ordering::Equal => return Position::Found(curr),
                Ordering::Less => match node.l {
                    Some(l) => curr = l,
                    None => {
                        return Position::Vacant {
                            parent: curr,
                            left: true,
                        }
                    }
                },
                Ordering::Greater => match node.r {
                    Some(r) => curr = r,
                    None => {
                        return Position::Vacant {
                            parent: curr,
                            left: false,
                        }
                    }
                },
            }
        }
    }

    /// Like [`Self::locate`], but first checks whether `key` belongs right
    /// next to `hint`.
    fn locate_near(&self, hint: u32, key: &P::Key) -> Position {
        let nodes = self.nodes();
        if hint == HEAD {
            let max = self.max_node();
            if max != HEAD && self.comparator.less(self.key_at(max), key) {
                return Position::Vacant {
                    parent: max,
                    left: false,
                };
            }
            return self.locate(key);
        }

        match self.comparator.order(key, self.key_at(hint)) {
            Ordering::Equal => Position::Found(hint),
            Ordering::Less => {
                if hint == self.min_node() {
                    return Position::Vacant {
                        parent: hint,
                        left: true,
                    };
                }
                let before = util::prev(nodes, hint);
                if !self.comparator.less(self.key_at(before), key) {
                    return self.locate(key);
                }
                if nodes[hint as usize].l.is_none() {
                    Position::Vacant {
                        parent: hint,
                        left: true,
                    }
                } else {
                    Position::Vacant {
                        parent: before,
                        left: false,
                    }
                }
            }
            Ordering::Greater => {
                if hint == self.max_node() {
                    return Position::Vacant {
                        parent: hint,
                        left: false,
                    };
                }
                let after = util::next(nodes, hint);
                if !self.comparator.less(key, self.key_at(after)) {
                    return self.locate(key);
                }
                if nodes[hint as usize].r.is_none() {
                    Position::Vacant {
                        parent: hint,
                        left: false,
                    }
                } else {
                    Position::Vacant {
                        parent: after,
                        left: true,
                    }
                }
            }
        }
    }

    /// Cursor on the node with a key equivalent to `key`, or [`Self::end`].
    pub fn find(&self, key: &P::Key) -> Cursor {
        match self.find_node(key) {
            Some(i) => self.cursor(i),
            None => self.end(),
        }
    }

    pub fn contains(&self, key: &P::Key) -> bool {
        self.find_node(key).is_some()
    }

    /// `1` when `key` is present, `0` otherwise.
    pub fn count(&self, key: &P::Key) -> usize {
        usize::from(self.contains(key))
    }

    /// First position whose key is not less than `key`.
    pub fn lower_bound(&self, key: &P::Key) -> Cursor {
        let mut curr = util::root(self.nodes());
        let mut res = HEAD;
        while let Some(i) = curr {
            let node = self.arena.node(i);
            if self.comparator.less(self.key_at(i), key) {
                curr = node.r;
            } else {
                res = i;
                curr = node.l;
            }
        }
        self.cursor(res)
    }

    /// First position whose key is greater than `key`.
    pub fn upper_bound(&self, key: &P::Key) -> Cursor {
        let mut curr = util::root(self.nodes());
        let mut res = HEAD;
        while let Some(i) = curr {
            let node = self.arena.node(i);
            if self.comparator.less(key, self.key_at(i)) {
                res = i;
                curr = node.l;
            } else {
                curr = node.r;
            }
        }
        self.cursor(res)
    }

    /// `(lower_bound(key), upper_bound(key))`.
    pub fn equal_range(&self, key: &P::Key) -> (Cursor, Cursor) {
        (self.lower_bound(key), self.upper_bound(key))
    }

    /// Position of the greatest key not greater than `key`, or [`Self::end`].
    pub fn floor(&self, key: &P::Key) -> Cursor {
        let mut curr = util::root(self.nodes());
        let mut res = HEAD;
        while let Some(i) = curr {
            let node = self.arena.node(i);
            if self.comparator.less(key, self.key_at(i)) {
                curr = node.l;
            } else {
                res = i;
                curr = node.r;
            }
        }
        self.cursor(res)
    }

    /// Inserts `value` unless an equivalent key is present.
    ///
    /// Returns the position of the value with that key and whether it was
    /// inserted. On allocation failure the tree is unchanged.
    pub fn insert(&mut self, value: P::Value) -> Result<(Cursor, bool), TreeError> {
        match self.locate(P::extract_key(&value)) {
            Position::Found(i) => Ok((self.cursor(i), false)),
            Position::Vacant { parent, left } => {
                let slot = self.arena.reserve()?.fill(value);
                Ok((self.attach(slot, parent, left), true))
            }
        }
    }

    /// Inserts `value`, using `hint` as a guess of the position right after
    /// it. A correct hint makes the insert O(1) comparisons.
    pub fn insert_hint(
        &mut self,
        hint: Cursor,
        value: P::Value,
    ) -> Result<(Cursor, bool), TreeError> {
        self.check_cursor(&hint);
        match self.locate_near(hint.node, P::extract_key(&value)) {
            Position::Found(i) => Ok((self.cursor(i), false)),
            Position::Vacant { parent, left } => {
                let slot = self.arena.reserve()?.fill(value);
                Ok((self.attach(slot, parent, left), true))
            }
        }
    }

    /// Builds the candidate with `make`, then inserts it. The candidate is
    /// dropped if its key is already present.
    pub fn emplace_with<F>(&mut self, make: F) -> Result<(Cursor, bool), TreeError>
    where
        F: FnOnce() -> P::Value,
    {
        self.insert(make())
    }

    /// Inserts `make(key)` unless `key` is present. `make` is not called when
    /// the key exists or when no node can be allocated. If `make` panics, the
    /// reserved slot is released and the tree is unchanged.
    ///
    /// `make` must return a value whose key is equivalent to `key`.
    pub fn try_emplace_with<F>(
        &mut self,
        key: P::Key,
        make: F,
    ) -> Result<(Cursor, bool), TreeError>
    where
        F: FnOnce(P::Key) -> P::Value,
    {
        match self.locate(&key) {
            Position::Found(i) => Ok((self.cursor(i), false)),
            Position::Vacant { parent, left } => {
                let reserved = self.arena.reserve()?;
                let value = make(key);
                let slot = reserved.fill(value);
                Ok((self.attach(slot, parent, left), true))
            }
        }
    }

    /// Erases the node with a key equivalent to `key`; returns how many were
    /// erased (0 or 1).
    pub fn erase_key(&mut self, key: &P::Key) -> usize {
        match self.find_node(key) {
            Some(i) => {
                self.unlink(i);
                1
            }
            None => 0,
        }
    }

    /// Removes the value with a key equivalent to `key` and returns it.
    pub fn remove(&mut self, key: &P::Key) -> Option<P::Value> {
        let node = self.find_node(key)?;
        Some(self.unlink(node))
    }

    /// Checks every structural invariant: ordering, coloring, black height,
    /// parent links, head min/max links and the size counter.
    pub fn verify(&self) -> Result<(), InvariantViolation> {
        rb::assert_red_black_tree(self.nodes(), self.len, P::extract_key, |a, b| {
            self.comparator.less(a, b)
        })
    }
}

impl<P: TreeTraits, C: Clone> Clone for RbTree<P, C>
where
    P::Value: Clone,
{
    /// O(n) structural copy: same shape, same colors, fresh identity.
    fn clone(&self) -> Self {
        trace!("cloning tree of {} nodes", self.len);
        Self {
            id: next_tree_id(),
            arena: self.arena.clone_tree(),
            len: self.len,
            comparator: self.comparator.clone(),
            _traits: PhantomData,
        }
    }
}

impl<P: TreeTraits, C> PartialEq for RbTree<P, C>
where
    P::Value: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<P: TreeTraits, C> Eq for RbTree<P, C> where P::Value: Eq {}

impl<P: TreeTraits, C> PartialOrd for RbTree<P, C>
where
    P::Value: PartialOrd,
{
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<P: TreeTraits, C> Ord for RbTree<P, C>
where
    P::Value: Ord,
{
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<P: TreeTraits, C> fmt::Debug for RbTree<P, C>
where
    P::Value: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<P: TreeTraits, C: Comparator<P::Key>> Extend<P::Value> for RbTree<P, C> {
    /// # Panics
    ///
    /// When a node cannot be allocated.
    fn extend<I: IntoIterator<Item = P::Value>>(&mut self, iter: I) {
        let mut hint = self.end();
        for value in iter {
            match self.insert_hint(hint, value) {
                Ok((at, _)) => hint = self.next(at),
                Err(err) => panic!("extend failed: {err}"),
            }
        }
    }
}

impl<P: TreeTraits, C: Comparator<P::Key> + Default> FromIterator<P::Value> for RbTree<P, C> {
    fn from_iter<I: IntoIterator<Item = P::Value>>(iter: I) -> Self {
        let mut tree = Self::default();
        tree.extend(iter);
        tree
    }
}

impl<'a, P: TreeTraits, C> IntoIterator for &'a RbTree<P, C> {
    type Item = &'a P::Value;
    type IntoIter = Iter<'a, P, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<P: TreeTraits, C> IntoIterator for RbTree<P, C> {
    type Item = P::Value;
    type IntoIter = IntoIter<P, C>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{MapTraits, SetTraits};

    type Set = RbTree<SetTraits<i32>>;

    fn keys(tree: &Set) -> Vec<i32> {
        tree.iter().copied().collect()
    }

    #[test]
    fn locate_uses_extremes() {
        let mut tree = Set::new();
        assert_eq!(
            tree.locate(&1),
            Position::Vacant {
                parent: HEAD,
                left: true
            }
        );
        let (a, _) = tree.insert(10).unwrap();
        let (b, _) = tree.insert(20).unwrap();
        assert_eq!(
            tree.locate(&30),
            Position::Vacant {
                parent: b.node,
                left: false
            }
        );
        assert_eq!(
            tree.locate(&5),
            Position::Vacant {
                parent: a.node,
                left: true
            }
        );
        assert_eq!(tree.locate(&20), Position::Found(b.node));
    }

    #[test]
    fn hinted_insert_matches_plain_insert() {
        let mut hinted = Set::new();
        let mut hint = hinted.end();
        for k in 0..50 {
            let (at, inserted) = hinted.insert_hint(hint, k * 2).unwrap();
            assert!(inserted);
            hint = at;
            hinted.verify().unwrap();
        }
        for k in 0..50 {
            let hint = hinted.find(&(k * 2));
            hinted.insert_hint(hint, k * 2 + 1).unwrap();
            hinted.verify().unwrap();
        }
        let plain: Set = (0..100).collect();
        assert_eq!(hinted, plain);

        // A wrong hint still lands in the right place.
        let end = hinted.end();
        hinted.insert_hint(end, -1).unwrap();
        let begin = hinted.begin();
        hinted.insert_hint(begin, 500).unwrap();
        assert_eq!(hinted.first(), Some(&-1));
        assert_eq!(hinted.last(), Some(&500));
        hinted.verify().unwrap();
    }

    #[test]
    fn erase_returns_successor() {
        let mut tree: Set = [1, 2, 3, 4].into_iter().collect();
        let two = tree.find(&2);
        let after = tree.erase(two);
        assert_eq!(*tree.value(after), 3);
        let four = tree.find(&4);
        assert!(tree.erase(four).is_end());
        assert_eq!(keys(&tree), vec![1, 3]);
    }

    #[test]
    fn erase_range_middle_and_whole() {
        let mut tree: Set = (0..10).collect();
        let first = tree.find(&3);
        let last = tree.find(&7);
        let at = tree.erase_range(first, last);
        assert_eq!(*tree.value(at), 7);
        assert_eq!(keys(&tree), vec![0, 1, 2, 7, 8, 9]);
        tree.verify().unwrap();

        let (begin, end) = (tree.begin(), tree.end());
        assert!(tree.erase_range(begin, end).is_end());
        assert!(tree.is_empty());
        tree.verify().unwrap();
    }

    #[test]
    fn retain_and_pop() {
        let mut tree: Set = (0..20).collect();
        tree.retain(|k| k % 3 == 0);
        assert_eq!(keys(&tree), vec![0, 3, 6, 9, 12, 15, 18]);
        assert_eq!(tree.pop_first(), Some(0));
        assert_eq!(tree.pop_last(), Some(18));
        assert_eq!(tree.len(), 5);
        tree.verify().unwrap();
    }

    #[test]
    fn panicking_constructor_releases_slot() {
        use std::panic::{catch_unwind, AssertUnwindSafe};

        let mut tree = RbTree::<MapTraits<i32, i32>>::with_options(Less, TreeOptions::with_node_limit(2));
        tree.insert((1, 10)).unwrap();
        assert_eq!(tree.nodes().len(), 2);

        let unwound = catch_unwind(AssertUnwindSafe(|| {
            tree.try_emplace_with(2, |_| panic!("constructor failed"))
        }));
        assert!(unwound.is_err());
        assert_eq!(tree.len(), 1);
        assert!(!tree.contains(&2));
        tree.verify().unwrap();
        let arena_len = tree.nodes().len();

        tree.insert((3, 30)).unwrap();
        assert_eq!(tree.nodes().len(), arena_len);
        assert_eq!(tree.len(), 2);
        tree.verify().unwrap();
    }

    #[test]
    fn mapped_mut_leaves_key_alone() {
        let mut tree = RbTree::<MapTraits<&str, i32>>::new();
        let (at, _) = tree.insert(("a", 1)).unwrap();
        *tree.mapped_mut(at) += 41;
        assert_eq!(tree.value(at), &("a", 42));
        assert_eq!(*tree.key(at), "a");
        assert_eq!(*tree.mapped(at), 42);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "cannot dereference end")]
    fn deref_end_is_caught_in_debug() {
        let tree = Set::new();
        tree.value(tree.end());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "another tree")]
    fn foreign_cursor_is_caught_in_debug() {
        let a: Set = (0..4).collect();
        let b: Set = (0..4).collect();
        b.value(a.begin());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "erased node")]
    fn stale_cursor_is_caught_in_debug() {
        let mut tree: Set = (0..4).collect();
        let two = tree.find(&2);
        tree.erase(two);
        tree.insert(10).unwrap();
        tree.value(two);
    }
}
