//! Fold many streams concurrently and merge the results.
//!
//! # Overview
//!
//! The core of the module is the [Folder]. Given N streams of [Batch](crate::Batch)es, it
//! spawns one task per stream, each running [fold_stream](crate::fold_stream) over its own
//! stream into a private [Accumulator](crate::Accumulator). Once every task has returned
//! (the barrier), the partial accumulators are merged on the calling task with the same
//! combining function used to fold values.
//!
//! # Details
//!
//! Partial accumulators are merged in the order tasks complete, which is not defined. For a
//! key present in a single partition the merged value is that partition's value. For a key
//! present in several partitions, the first partial to complete becomes the seed and later
//! ones are folded in with `combine(existing, partial)`: callers must supply a commutative
//! and associative `combine` if they need a deterministic result for such keys.
//!
//! A partition only finishes once its producer closes its stream. To avoid waiting forever on
//! a stalled producer, [Folder::fold] accepts a cancellation future and [Config] accepts an
//! optional timeout. Either one stops every outstanding partition.
//!
//! Panics raised by `combine` are not caught by the folder. If the runtime catches them, the
//! panicking partition surfaces as [Error::PartitionFailed](crate::Error::PartitionFailed) and
//! the whole fold fails rather than returning a result missing that partition.

mod config;
pub use config::Config;
mod folder;
pub use folder::Folder;
mod metrics;
