//! Fold keyed record streams into per-key accumulators, concurrently.
//!
//! # Overview
//!
//! Producers emit [Batch]es: a key and an ordered list of values. A caller-supplied
//! combining function `combine(accumulator, value) -> accumulator` reduces every value
//! bearing the same key into a single accumulated value, yielding an [Accumulator]
//! (a mapping from key to folded value).
//!
//! Three folders are provided, each built on the one before it:
//!
//! - [fold] / [fold_all]: reduce batches that are already fully available.
//! - [fold_stream]: reduce a lazily produced [futures::Stream] of batches until the
//!   producer closes it (or the caller cancels).
//! - [fan_in::Folder]: spawn one [fold_stream] task per input stream, wait for every
//!   task to finish, and [merge] the partial accumulators into one.
//!
//! # Ordering
//!
//! Within a single sequence, each key is seeded with `initial` at its first encounter and
//! its values are folded in arrival order. `combine` need not be commutative for this to
//! hold.
//!
//! Across partitions of a [fan_in::Folder], partial accumulators are merged in task
//! completion order, which is not defined. The merged value of a key present in more than
//! one partition is only deterministic if `combine` is commutative and associative.
//!
//! # Example
//!
//! ```
//! use commonware_fold::{fold, Batch};
//!
//! let result = fold(0, |acc, v| acc * 10 + v, Batch::new("x", vec![1, 2, 3]));
//! assert_eq!(result.get("x"), Some(&123));
//! ```
//!
//! # Status
//!
//! `commonware-fold` is **ALPHA** software and is not yet recommended for production use. Developers should
//! expect breaking changes and occasional instability.

#![doc(
    html_logo_url = "https://commonware.xyz/imgs/rustdoc_logo.svg",
    html_favicon_url = "https://commonware.xyz/favicon.ico"
)]

use std::{collections::HashMap, hash::Hash};
use thiserror::Error;

pub mod fan_in;
mod sequential;
pub use sequential::{fold, fold_all};
mod stream;
pub use stream::fold_stream;

/// Mapping from key to the value folded for that key.
pub type Accumulator<K, V> = HashMap<K, V>;

/// Errors that can occur when folding.
#[derive(Error, Debug)]
pub enum Error {
    #[error("canceled")]
    Canceled,
    #[error("timeout")]
    Timeout,
    #[error("partition {0} failed: {1}")]
    PartitionFailed(usize, commonware_runtime::Error),
}

/// An immutable unit of input: a key and the values to fold into it, in order.
///
/// Producers are expected to provide at least one value. A batch without values is
/// folded as a no-op (its key is still seeded with the initial value).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Batch<K, V> {
    pub key: K,
    pub values: Vec<V>,
}

impl<K, V> Batch<K, V> {
    /// Create a new batch.
    pub fn new(key: K, values: Vec<V>) -> Self {
        Self { key, values }
    }
}

impl<K, V> From<(K, Vec<V>)> for Batch<K, V> {
    fn from((key, values): (K, Vec<V>)) -> Self {
        Self::new(key, values)
    }
}

/// Merge a `partial` accumulator into `result`.
///
/// Keys absent from `result` take the partial value as-is (it already includes the
/// initial seed). Keys present in both are combined as `combine(existing, partial)`.
pub fn merge<K, V, F>(
    result: &mut Accumulator<K, V>,
    combine: &F,
    partial: Accumulator<K, V>,
) where
    K: Eq + Hash,
    F: Fn(V, V) -> V,
{
    for (key, value) in partial {
        let value = match result.remove(&key) {
            Some(existing) => combine(existing, value),
            None => value,
        };
        result.insert(key, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_disjoint() {
        let mut result = Accumulator::from([("x", 3)]);
        merge(&mut result, &|a: i32, b: i32| a + b, Accumulator::from([("y", 5)]));
        assert_eq!(result, Accumulator::from([("x", 3), ("y", 5)]));
    }

    #[test]
    fn test_merge_shared_key() {
        // Partial values are not re-seeded with the initial value
        let mut result = Accumulator::from([("x", 3)]);
        merge(&mut result, &|a: i32, b: i32| a * 10 + b, Accumulator::from([("x", 12)]));
        assert_eq!(result, Accumulator::from([("x", 42)]));
    }

    #[test]
    fn test_merge_into_empty() {
        let mut result = Accumulator::new();
        merge(&mut result, &|a: u64, b: u64| a.max(b), Accumulator::from([(1u32, 7u64)]));
        assert_eq!(result.get(&1), Some(&7));
    }

    #[test]
    fn test_batch_from_tuple() {
        let batch: Batch<&str, i64> = ("x", vec![1, 2]).into();
        assert_eq!(batch, Batch::new("x", vec![1, 2]));
    }
}
