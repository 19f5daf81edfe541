//! Background collection from an asynchronous record stream
//!
//! [`CollectionHandle::spawn`] moves an aggregator behind a mutex and spawns a
//! task that feeds it every record the stream yields. Records are applied one
//! at a time on that single task, so updates stay serialized no matter how the
//! host produces them.
//!
//! # Example
//!
//! ```
//! use futures::stream;
//! use vitals_collector::host::CapturedHost;
//! use vitals_collector::metrics::{CollectionHandle, ObservationRecord, VitalsAggregator};
//!
//! # async fn example() {
//! let records = stream::iter(vec![
//!     ObservationRecord::paint("first-contentful-paint", 640.0),
//!     ObservationRecord::largest_contentful_paint(1720.0),
//! ]);
//!
//! let mut handle = CollectionHandle::spawn(VitalsAggregator::new(CapturedHost::new()), records);
//! handle.drain().await;
//!
//! let report = handle.collect().await;
//! assert_eq!(report.core_web_vitals.fcp, Some(640.0));
//! # }
//! ```

use futures::{FutureExt, Stream, StreamExt};
use std::sync::Arc;
use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use super::aggregator::VitalsAggregator;
use super::record::ObservationRecord;
use crate::host::PerformanceHost;
use crate::report::Report;

/// Handle to a running collection task
pub struct CollectionHandle<H> {
    aggregator: Arc<Mutex<VitalsAggregator<H>>>,
    task: Option<JoinHandle<()>>,
    stop: Option<oneshot::Sender<()>>,
}

impl<H> CollectionHandle<H>
where
    H: PerformanceHost + Send + 'static,
{
    /// Start feeding `records` into `aggregator` in the background
    pub fn spawn<S>(aggregator: VitalsAggregator<H>, mut records: S) -> Self
    where
        S: Stream<Item = ObservationRecord> + Send + Unpin + 'static,
    {
        debug!(session = aggregator.session_name(), "Starting background collection");

        let aggregator = Arc::new(Mutex::new(aggregator));
        let shared = aggregator.clone();
        let (stop, mut stopped) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    _ = &mut stopped => {
                        // Records already delivered still count; later ones do not.
                        let mut aggregator = shared.lock().await;
                        let mut flushed = 0usize;
                        while let Some(Some(record)) = records.next().now_or_never() {
                            aggregator.on_record(&record);
                            flushed += 1;
                        }
                        trace!(flushed, "Applied buffered records before stopping");
                        return;
                    }
                    next = records.next() => match next {
                        Some(record) => shared.lock().await.on_record(&record),
                        None => break,
                    },
                }
            }
            debug!("Observation stream closed");
        });

        Self {
            aggregator,
            task: Some(task),
            stop: Some(stop),
        }
    }

    /// Report on the metrics collected so far
    pub async fn snapshot(&self) -> Report {
        self.aggregator.lock().await.snapshot()
    }

    /// Wait until the record stream ends and every record has been applied
    pub async fn drain(&mut self) {
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!("Collection task ended abnormally: {}", e);
            }
        }
    }

    /// Stop the collection task and unsubscribe from every stream
    ///
    /// Records the stream has already delivered are applied before the task
    /// stops. Returns `false` if the session was already torn down.
    pub async fn teardown(&mut self) -> bool {
        if let Some(stop) = self.stop.take() {
            // The task may already have finished with the stream
            let _ = stop.send(());
        }
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!("Collection task ended abnormally: {}", e);
            }
        }
        self.aggregator.lock().await.teardown()
    }

    /// Tear down and return the final report
    pub async fn collect(mut self) -> Report {
        self.teardown().await;
        self.snapshot().await
    }
}

impl<H> Drop for CollectionHandle<H> {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
