use crate::compare::{Comparator, Less};
use crate::traits::SetTraits;

use super::tree::RbTree;

/// Ordered set: the red-black engine over bare keys.
pub type RbSet<K, C = Less> = RbTree<SetTraits<K>, C>;

impl<K, C: Comparator<K>> RbTree<SetTraits<K>, C> {
    /// The stored key equivalent to `key`.
    pub fn get(&self, key: &K) -> Option<&K> {
        let at = self.find(key);
        (!at.is_end()).then(|| self.value(at))
    }

    /// Removes and returns the stored key equivalent to `key`.
    pub fn take(&mut self, key: &K) -> Option<K> {
        self.remove(key)
    }

    /// Whether every key of `self` is in `other`.
    pub fn is_subset<D: Comparator<K>>(&self, other: &RbTree<SetTraits<K>, D>) -> bool {
        self.len() <= other.len() && self.iter().all(|k| other.contains(k))
    }

    /// Whether no key of `self` is in `other`.
    pub fn is_disjoint<D: Comparator<K>>(&self, other: &RbTree<SetTraits<K>, D>) -> bool {
        self.iter().all(|k| !other.contains(k))
    }
}
