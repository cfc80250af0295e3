//! Key ordering.

use std::cmp::Ordering;

/// A strict weak ordering over keys, expressed as a `less` predicate.
///
/// Two keys are equivalent when neither is less than the other.
///
/// Any `Fn(&K, &K) -> bool` closure is a comparator:
///
/// ```
/// use ordered_tree::RbSet;
///
/// let mut set = RbSet::<i32, _>::with_comparator(|a: &i32, b: &i32| a > b);
/// set.insert(1).unwrap();
/// set.insert(3).unwrap();
/// set.insert(2).unwrap();
/// assert_eq!(set.iter().copied().collect::<Vec<_>>(), vec![3, 2, 1]);
/// ```
pub trait Comparator<K: ?Sized> {
    fn less(&self, a: &K, b: &K) -> bool;

    /// Three-way comparison derived from [`Comparator::less`].
    ///
    /// Debug builds assert that `less(a, b)` and `less(b, a)` never both
    /// hold.
    #[inline]
    fn order(&self, a: &K, b: &K) -> Ordering {
        let lt = self.less(a, b);
        let gt = self.less(b, a);
        debug_assert!(!(lt && gt), "comparator is not a strict weak ordering");
        if lt {
            Ordering::Less
        } else if gt {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }
}

/// Natural ordering through [`Ord`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Less;

impl<K: Ord + ?Sized> Comparator<K> for Less {
    #[inline]
    fn less(&self, a: &K, b: &K) -> bool {
        a < b
    }

    #[inline]
    fn order(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

impl<K: ?Sized, F> Comparator<K> for F
where
    F: Fn(&K, &K) -> bool,
{
    #[inline]
    fn less(&self, a: &K, b: &K) -> bool {
        self(a, b)
    }
}
