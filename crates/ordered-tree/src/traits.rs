//! Key/mapped projection policies.
//!
//! The tree core only ever sees a stored `Value`; every comparison goes
//! through [`TreeTraits::extract_key`]. [`SetTraits`] and [`MapTraits`] let
//! the one balancing engine back both a set and a map.

use std::marker::PhantomData;

/// Projection from a stored value to its key and mapped views.
pub trait TreeTraits {
    type Value;
    type Key;
    type Mapped;

    fn extract_key(value: &Self::Value) -> &Self::Key;
    fn extract_mapped(value: &Self::Value) -> &Self::Mapped;
}

/// Policies whose mapped view can be mutated without touching the key.
///
/// Only implemented where the mapped half is disjoint from the key, so a
/// mutable projection can never break ordering.
pub trait MappedMut: TreeTraits {
    fn extract_mapped_mut(value: &mut Self::Value) -> &mut Self::Mapped;
}

/// Key-only policy: the value is its own key and its own mapped view.
pub struct SetTraits<K>(PhantomData<fn() -> K>);

impl<K> TreeTraits for SetTraits<K> {
    type Value = K;
    type Key = K;
    type Mapped = K;

    #[inline]
    fn extract_key(value: &K) -> &K {
        value
    }

    #[inline]
    fn extract_mapped(value: &K) -> &K {
        value
    }
}

/// Key-value policy over `(K, V)` pairs.
pub struct MapTraits<K, V>(PhantomData<fn() -> (K, V)>);

impl<K, V> TreeTraits for MapTraits<K, V> {
    type Value = (K, V);
    type Key = K;
    type Mapped = V;

    #[inline]
    fn extract_key(value: &(K, V)) -> &K {
        &value.0
    }

    #[inline]
    fn extract_mapped(value: &(K, V)) -> &V {
        &value.1
    }
}

impl<K, V> MappedMut for MapTraits<K, V> {
    #[inline]
    fn extract_mapped_mut(value: &mut (K, V)) -> &mut V {
        &mut value.1
    }
}
