use std::iter::FusedIterator;

use crate::traits::TreeTraits;
use crate::util;

use super::tree::RbTree;

/// Values in a half-open cursor range, in key order.
pub struct Range<'a, P: TreeTraits, C> {
    tree: &'a RbTree<P, C>,
    front: u32,
    back: u32,
}

impl<'a, P: TreeTraits, C> Range<'a, P, C> {
    pub(crate) fn new(tree: &'a RbTree<P, C>, front: u32, back: u32) -> Self {
        Self { tree, front, back }
    }
}

impl<P: TreeTraits, C> Clone for Range<'_, P, C> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            front: self.front,
            back: self.back,
        }
    }
}

impl<'a, P: TreeTraits, C> Iterator for Range<'a, P, C> {
    type Item = &'a P::Value;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        let out = self.front;
        self.front = util::next(self.tree.nodes(), out);
        Some(self.tree.value_at(out))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.front == self.back {
            (0, Some(0))
        } else {
            (1, Some(self.tree.len()))
        }
    }
}

impl<P: TreeTraits, C> DoubleEndedIterator for Range<'_, P, C> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        self.back = util::prev(self.tree.nodes(), self.back);
        Some(self.tree.value_at(self.back))
    }
}

impl<P: TreeTraits, C> FusedIterator for Range<'_, P, C> {}

/// All values of a tree, in key order.
pub struct Iter<'a, P: TreeTraits, C> {
    range: Range<'a, P, C>,
    remaining: usize,
}

impl<'a, P: TreeTraits, C> Iter<'a, P, C> {
    pub(crate) fn new(range: Range<'a, P, C>, remaining: usize) -> Self {
        Self { range, remaining }
    }
}

impl<P: TreeTraits, C> Clone for Iter<'_, P, C> {
    fn clone(&self) -> Self {
        Self {
            range: self.range.clone(),
            remaining: self.remaining,
        }
    }
}

impl<'a, P: TreeTraits, C> Iterator for Iter<'a, P, C> {
    type Item = &'a P::Value;

    fn next(&mut self) -> Option<Self::Item> {
        let out = self.range.next()?;
        self.remaining -= 1;
        Some(out)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<P: TreeTraits, C> DoubleEndedIterator for Iter<'_, P, C> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let out = self.range.next_back()?;
        self.remaining -= 1;
        Some(out)
    }
}

impl<P: TreeTraits, C> ExactSizeIterator for Iter<'_, P, C> {}

impl<P: TreeTraits, C> FusedIterator for Iter<'_, P, C> {}

/// Owning iterator, draining the tree from both ends.
pub struct IntoIter<P: TreeTraits, C> {
    tree: RbTree<P, C>,
}

impl<P: TreeTraits, C> IntoIter<P, C> {
    pub(crate) fn new(tree: RbTree<P, C>) -> Self {
        Self { tree }
    }
}

impl<P: TreeTraits, C> Iterator for IntoIter<P, C> {
    type Item = P::Value;

    fn next(&mut self) -> Option<Self::Item> {
        self.tree.pop_first()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.tree.len(), Some(self.tree.len()))
    }
}

impl<P: TreeTraits, C> DoubleEndedIterator for IntoIter<P, C> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.tree.pop_last()
    }
}

impl<P: TreeTraits, C> ExactSizeIterator for IntoIter<P, C> {}

impl<P: TreeTraits, C> FusedIterator for IntoIter<P, C> {}

#[cfg(test)]
mod tests {
    use crate::traits::SetTraits;
    use crate::RbTree;

    #[test]
    fn iterates_from_both_ends() {
        let tree: RbTree<SetTraits<i32>> = (1..=6).collect();
        let mut it = tree.iter();
        assert_eq!(it.len(), 6);
        assert_eq!(it.next(), Some(&1));
        assert_eq!(it.next_back(), Some(&6));
        assert_eq!(it.next_back(), Some(&5));
        assert_eq!(it.len(), 3);
        assert_eq!(it.collect::<Vec<_>>(), vec![&2, &3, &4]);
    }

    #[test]
    fn range_between_cursors() {
        let tree: RbTree<SetTraits<i32>> = (0..10).collect();
        let from = tree.lower_bound(&3);
        let to = tree.upper_bound(&6);
        let got: Vec<i32> = tree.range(from, to).copied().collect();
        assert_eq!(got, vec![3, 4, 5, 6]);
        let back: Vec<i32> = tree.range(from, to).rev().copied().collect();
        assert_eq!(back, vec![6, 5, 4, 3]);
        assert_eq!(tree.distance(from, to), 4);
        assert_eq!(tree.range(from, from).next(), None);
    }

    #[test]
    fn into_iter_drains_in_order() {
        let tree: RbTree<SetTraits<i32>> = [3, 1, 2].into_iter().collect();
        let mut it = tree.into_iter();
        assert_eq!(it.next_back(), Some(3));
        assert_eq!(it.collect::<Vec<_>>(), vec![1, 2]);
    }
}
