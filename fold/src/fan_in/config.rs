use std::time::Duration;

/// Configuration for the [`Folder`](super::Folder).
pub struct Config<V, F> {
    /// The value every key is seeded with, in every partition.
    pub initial: V,

    /// Folds a value into an accumulator: `combine(accumulator, value)`.
    ///
    /// The same function merges partial accumulators across partitions. For keys that
    /// appear in more than one partition, the result is only deterministic if `combine`
    /// is commutative and associative.
    pub combine: F,

    /// Maximum time to wait for every partition to finish.
    ///
    /// If `None`, a partition whose stream is never closed blocks the fold until the
    /// caller cancels it.
    pub timeout: Option<Duration>,
}
