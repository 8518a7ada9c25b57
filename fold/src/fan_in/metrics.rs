use commonware_runtime::Metrics as RuntimeMetrics;
use prometheus_client::metrics::counter::Counter;

/// Metrics for the [`Folder`](super::Folder)
#[derive(Default)]
pub struct Metrics {
    /// Number of partitions spawned
    pub partitions: Counter,
    /// Number of batches folded across all partitions
    pub batches: Counter,
    /// Number of values folded across all partitions
    pub values: Counter,
    /// Number of folds canceled by the caller
    pub canceled: Counter,
    /// Number of folds that exceeded their timeout
    pub timeouts: Counter,
    /// Number of folds aborted because a partition failed
    pub failures: Counter,
}

impl Metrics {
    /// Create and return a new set of metrics, registered with the given context.
    pub fn init<E: RuntimeMetrics>(context: E) -> Self {
        let metrics = Metrics::default();
        context.register(
            "partitions",
            "Number of partitions spawned",
            metrics.partitions.clone(),
        );
        context.register(
            "batches",
            "Number of batches folded across all partitions",
            metrics.batches.clone(),
        );
        context.register(
            "values",
            "Number of values folded across all partitions",
            metrics.values.clone(),
        );
        context.register(
            "canceled",
            "Number of folds canceled by the caller",
            metrics.canceled.clone(),
        );
        context.register(
            "timeouts",
            "Number of folds that exceeded their timeout",
            metrics.timeouts.clone(),
        );
        context.register(
            "failures",
            "Number of folds aborted because a partition failed",
            metrics.failures.clone(),
        );
        metrics
    }
}
