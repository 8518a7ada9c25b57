//! Fold a lazily produced stream of batches.

use crate::{sequential::accumulate, Accumulator, Batch, Error};
use commonware_macros::select;
use futures::{pin_mut, Future, Stream, StreamExt};
use std::hash::Hash;
use tracing::{debug, trace};

/// Fold every [Batch] yielded by `stream` until the stream ends.
///
/// Each key is seeded with `initial` the first time it is seen and the values of every
/// batch are folded in the order batches arrive. Keys may interleave arbitrarily.
///
/// Waiting for the next batch is the only suspension point. If `cancel` resolves before
/// the stream ends, the partially folded accumulator is discarded and [Error::Canceled]
/// is returned (the output of `cancel` is ignored). Pass [futures::future::pending] to
/// wait on the stream alone; a stream that is never closed then blocks forever.
///
/// ```
/// use commonware_fold::{fold_stream, Batch};
/// use futures::{channel::mpsc, executor::block_on, future::pending, SinkExt};
///
/// block_on(async {
///     let (mut sender, receiver) = mpsc::channel(4);
///     sender.send(Batch::new("x", vec![1, 2])).await.unwrap();
///     sender.send(Batch::new("x", vec![3])).await.unwrap();
///     drop(sender);
///
///     let result = fold_stream(0, |acc, v| acc * 10 + v, receiver, pending::<()>())
///         .await
///         .unwrap();
///     assert_eq!(result.get("x"), Some(&123));
/// });
/// ```
pub async fn fold_stream<K, V, F, S, C>(
    initial: V,
    combine: F,
    stream: S,
    cancel: C,
) -> Result<Accumulator<K, V>, Error>
where
    K: Eq + Hash,
    V: Clone,
    F: Fn(V, V) -> V,
    S: Stream<Item = Batch<K, V>>,
    C: Future,
{
    pin_mut!(stream);
    pin_mut!(cancel);

    let mut result = Accumulator::new();
    let mut batches = 0usize;
    loop {
        select! {
            _ = &mut cancel => {
                debug!(batches, keys = result.len(), "fold canceled");
                return Err(Error::Canceled);
            },
            batch = stream.next() => {
                let Some(batch) = batch else {
                    break;
                };
                trace!(values = batch.values.len(), "folding batch");
                accumulate(&mut result, &initial, &combine, batch);
                batches += 1;
            },
        }
    }
    debug!(batches, keys = result.len(), "stream closed");
    Ok(result)
}
