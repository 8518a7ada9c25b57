use super::{metrics, Config};
use crate::{fold_stream, merge, Accumulator, Batch, Error};
use commonware_macros::select;
use commonware_runtime::{Clock, Metrics, Spawner};
use futures::{
    channel::oneshot,
    future::{self, Either},
    pin_mut,
    stream::FuturesUnordered,
    Future, FutureExt, Stream, StreamExt,
};
use std::{hash::Hash, sync::Arc, time::Duration};
use tracing::{debug, warn};

/// Folds many streams concurrently and merges their partial accumulators.
///
/// Each call to [Folder::fold] spawns one task per stream. Tasks never share their
/// accumulator: partial results are only combined once every task has finished.
pub struct Folder<E: Clock + Spawner + Metrics, V, F> {
    context: E,

    initial: V,
    combine: Arc<F>,
    timeout: Option<Duration>,

    metrics: metrics::Metrics,
}

impl<E, V, F> Folder<E, V, F>
where
    E: Clock + Spawner + Metrics,
    V: Clone + Send + 'static,
    F: Fn(V, V) -> V + Send + Sync + 'static,
{
    /// Create a new folder with the given context and configuration.
    pub fn new(context: E, cfg: Config<V, F>) -> Self {
        let metrics = metrics::Metrics::init(context.clone());
        Self {
            context,
            initial: cfg.initial,
            combine: Arc::new(cfg.combine),
            timeout: cfg.timeout,
            metrics,
        }
    }

    /// Fold every stream in its own task and merge the results.
    ///
    /// Returns once all streams have been closed by their producers and every partial
    /// accumulator has been merged. The key set of the result is the union of the key sets
    /// of all partitions.
    ///
    /// Partial accumulators are merged in task completion order. A key present in more than
    /// one partition is merged as `combine(existing, partial)`, so its value is only
    /// deterministic if `combine` is commutative and associative.
    ///
    /// If `cancel` resolves (or the configured timeout elapses) first, every partition is
    /// told to stop and [Error::Canceled] (or [Error::Timeout]) is returned. If any partition
    /// fails to deliver its accumulator, the remaining partitions are stopped and
    /// [Error::PartitionFailed] is returned.
    pub async fn fold<K, S, C>(
        &self,
        streams: Vec<S>,
        cancel: C,
    ) -> Result<Accumulator<K, V>, Error>
    where
        K: Eq + Hash + Send + 'static,
        S: Stream<Item = Batch<K, V>> + Send + 'static,
        C: Future,
    {
        let partitions = streams.len();
        debug!(partitions, "starting fold");

        // Spawn one task per stream. Dropping a stop sender cancels its task.
        let mut stops = Vec::with_capacity(partitions);
        let mut handles = FuturesUnordered::new();
        for (index, stream) in streams.into_iter().enumerate() {
            let (stop, stopped) = oneshot::channel::<()>();
            stops.push(stop);

            let initial = self.initial.clone();
            let combine = self.combine.clone();
            let batches = self.metrics.batches.clone();
            let values = self.metrics.values.clone();
            let stream = stream.inspect(move |batch| {
                batches.inc();
                values.inc_by(batch.values.len() as u64);
            });
            let handle = self
                .context
                .with_label("partition")
                .spawn(move |_| async move {
                    fold_stream(
                        initial,
                        move |acc, value| (*combine)(acc, value),
                        stream,
                        stopped,
                    )
                    .await
                });
            handles.push(handle.map(move |result| (index, result)));
            self.metrics.partitions.inc();
        }

        // Wait for every partition to deliver before merging anything
        let deadline = match self.timeout {
            Some(timeout) => Either::Left(self.context.sleep(timeout)),
            None => Either::Right(future::pending::<()>()),
        };
        pin_mut!(cancel);
        pin_mut!(deadline);
        let mut partials = Vec::with_capacity(partitions);
        loop {
            select! {
                _ = &mut cancel => {
                    debug!(partitions, completed = partials.len(), "fold canceled");
                    self.metrics.canceled.inc();
                    return Err(Error::Canceled);
                },
                _ = &mut deadline => {
                    warn!(partitions, completed = partials.len(), "fold timed out");
                    self.metrics.timeouts.inc();
                    return Err(Error::Timeout);
                },
                completed = handles.next() => {
                    let Some((index, result)) = completed else {
                        break;
                    };
                    match result {
                        Ok(Ok(partial)) => {
                            debug!(index, keys = partial.len(), "partition completed");
                            partials.push(partial);
                        }
                        Ok(Err(err)) => {
                            // Stop senders are only dropped after this loop returns, so a
                            // partition cannot report `Canceled` here.
                            unreachable!("partition {index} stopped before fold returned: {err}");
                        }
                        Err(err) => {
                            warn!(index, ?err, "partition failed");
                            self.metrics.failures.inc();
                            return Err(Error::PartitionFailed(index, err));
                        }
                    }
                },
            }
        }
        drop(stops);

        // Merge on this task only, after the barrier
        let mut result = Accumulator::new();
        for partial in partials {
            merge(&mut result, &*self.combine, partial);
        }
        debug!(partitions, keys = result.len(), "fold complete");
        Ok(result)
    }
}
