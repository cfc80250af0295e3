use std::ops::Index;

use crate::compare::{Comparator, Less};
use crate::cursor::Cursor;
use crate::error::TreeError;
use crate::traits::MapTraits;

use super::tree::RbTree;

/// Ordered map: the red-black engine over `(K, V)` pairs.
///
/// ```
/// use ordered_tree::RbMap;
///
/// let mut map = RbMap::<&str, i32>::new();
/// map.insert(("b", 2)).unwrap();
/// map.try_emplace("a", || 1).unwrap();
/// map.try_emplace("a", || unreachable!()).unwrap();
/// assert_eq!(map.get(&"a"), Some(&1));
/// assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec!["a", "b"]);
/// ```
pub type RbMap<K, V, C = Less> = RbTree<MapTraits<K, V>, C>;

impl<K, V, C: Comparator<K>> RbTree<MapTraits<K, V>, C> {
    /// Inserts `(key, make())` unless `key` is present. `make` is only
    /// called when a new entry is actually created.
    pub fn try_emplace<F>(&mut self, key: K, make: F) -> Result<(Cursor, bool), TreeError>
    where
        F: FnOnce() -> V,
    {
        self.try_emplace_with(key, |key| (key, make()))
    }

    /// Inserts `(key, value)`, overwriting the mapped value when `key` is
    /// present. The boolean is `true` when a new entry was created.
    pub fn insert_or_assign(&mut self, key: K, value: V) -> Result<(Cursor, bool), TreeError> {
        let at = self.find(&key);
        if !at.is_end() {
            *self.mapped_mut(at) = value;
            return Ok((at, false));
        }
        self.insert((key, value))
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        let at = self.find(key);
        (!at.is_end()).then(|| self.mapped(at))
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let at = self.find(key);
        if at.is_end() {
            return None;
        }
        Some(self.mapped_mut(at))
    }

    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        let at = self.find(key);
        (!at.is_end()).then(|| {
            let (k, v) = self.value(at);
            (k, v)
        })
    }

    /// Checked access.
    ///
    /// Fails with [`TreeError::OutOfRange`] when `key` is absent.
    pub fn at(&self, key: &K) -> Result<&V, TreeError> {
        self.get(key).ok_or(TreeError::OutOfRange)
    }

    pub fn at_mut(&mut self, key: &K) -> Result<&mut V, TreeError> {
        self.get_mut(key).ok_or(TreeError::OutOfRange)
    }

    /// Value mapped to the greatest key not greater than `key`.
    pub fn get_or_next_lower(&self, key: &K) -> Option<&V> {
        let at = self.floor(key);
        (!at.is_end()).then(|| self.mapped(at))
    }

    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> + '_ {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> + '_ {
        self.iter().map(|(_, v)| v)
    }
}

impl<K, V, C: Comparator<K>> Index<&K> for RbTree<MapTraits<K, V>, C> {
    type Output = V;

    /// # Panics
    ///
    /// When `key` is absent.
    fn index(&self, key: &K) -> &V {
        self.get(key).expect("no entry found for key")
    }
}
