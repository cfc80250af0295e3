//! ordered-tree-util - test workload helpers for ordered-tree
//!
//! Provides a seeded [`Fuzzer`] that produces reproducible insert/erase traces
//! and key permutations.

pub mod fuzzer;

pub use fuzzer::{Fuzzer, Op};
