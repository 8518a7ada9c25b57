//! Fold batches that are already fully available.

use crate::{Accumulator, Batch};
use std::hash::Hash;

/// Fold one batch into `result`, seeding its key with `initial` if this is the first
/// time the key is seen.
pub(crate) fn accumulate<K, V, F>(
    result: &mut Accumulator<K, V>,
    initial: &V,
    combine: &F,
    batch: Batch<K, V>,
) where
    K: Eq + Hash,
    V: Clone,
    F: Fn(V, V) -> V,
{
    let Batch { key, values } = batch;
    let mut acc = result.remove(&key).unwrap_or_else(|| initial.clone());
    for value in values {
        acc = combine(acc, value);
    }
    result.insert(key, acc);
}

/// Fold a single `batch`, starting from `initial`.
///
/// The returned [Accumulator] contains exactly one entry (`batch.key`) whose value is
/// `combine(...combine(initial, v1)..., vk)`. If the batch has no values, the entry is
/// left at `initial`.
///
/// Unlike [fold_all], `initial` is consumed directly, so `V` need not be [Clone].
pub fn fold<K, V, F>(initial: V, combine: F, batch: Batch<K, V>) -> Accumulator<K, V>
where
    K: Eq + Hash,
    F: Fn(V, V) -> V,
{
    let Batch { key, values } = batch;
    let value = values.into_iter().fold(initial, &combine);
    Accumulator::from([(key, value)])
}

/// Fold a finite sequence of batches, in order, starting each key from `initial`.
///
/// This is the synchronous counterpart of [crate::fold_stream]: keys are seeded at their
/// first encounter and every batch is folded in the order it is yielded.
///
/// ```
/// use commonware_fold::{fold_all, Batch};
///
/// let result = fold_all(
///     0,
///     |acc, v| acc + v,
///     vec![Batch::new("x", vec![1, 2]), Batch::new("y", vec![5]), Batch::new("x", vec![3])],
/// );
/// assert_eq!(result.get("x"), Some(&6));
/// assert_eq!(result.get("y"), Some(&5));
/// ```
pub fn fold_all<K, V, F, I>(initial: V, combine: F, batches: I) -> Accumulator<K, V>
where
    K: Eq + Hash,
    V: Clone,
    F: Fn(V, V) -> V,
    I: IntoIterator<Item = Batch<K, V>>,
{
    let mut result = Accumulator::new();
    for batch in batches {
        accumulate(&mut result, &initial, &combine, batch);
    }
    result
}
