use std::future::Future;
use std::sync::Arc;

use futures_util::future::FutureExt;
use futures_util::stream::{FuturesUnordered, StreamExt};
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::options::MapOptions;
use crate::task::Deferred;

/// Await all deferred results concurrently and collect them in input order.
///
/// The first failure is returned as is. Items still in flight at that point
/// are handed to the ambient tokio runtime and driven to completion in the
/// background; their results are discarded. Without a runtime they are
/// dropped.
pub async fn join_ordered<T>(deferred: Vec<Deferred<T>>) -> Result<Vec<T>>
where
    T: Send + 'static,
{
    let total = deferred.len();
    let mut pending: FuturesUnordered<_> = deferred
        .into_iter()
        .enumerate()
        .map(|(index, item)| item.map(move |outcome| (index, outcome)))
        .collect();
    let mut slots: Vec<Option<T>> = std::iter::repeat_with(|| None).take(total).collect();

    while let Some((index, outcome)) = pending.next().await {
        match outcome {
            Ok(value) => slots[index] = Some(value),
            Err(err) => {
                debug!(event = "join_failed", index, total, error = %err);
                detach(pending);
                return Err(err);
            }
        }
    }

    slots
        .into_iter()
        .enumerate()
        .map(|(index, slot)| {
            slot.ok_or_else(|| Error::Scheduler(format!("missing result for item {index}")))
        })
        .collect()
}

/// Map `inputs` through an async `transform`, keeping input order.
///
/// At most `options.concurrency` transforms are outstanding at any time.
/// `transform` is called for an item only once it has been admitted, in
/// input order. Once a transform fails no further item is admitted; items
/// already running finish in the background.
pub async fn map_concurrent<I, T, F, Fut>(
    inputs: I,
    options: &MapOptions,
    transform: F,
) -> Result<Vec<T>>
where
    I: IntoIterator,
    I::Item: Send + 'static,
    F: Fn(I::Item) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T>> + Send + 'static,
    T: Send + 'static,
{
    let gate = options
        .concurrency
        .map(|limit| Arc::new(Semaphore::new(limit.get().min(Semaphore::MAX_PERMITS))));
    let transform = Arc::new(transform);

    let deferred: Vec<Deferred<T>> = inputs
        .into_iter()
        .map(|item| {
            let gate = gate.clone();
            let transform = Arc::clone(&transform);
            async move {
                let permit = match &gate {
                    Some(gate) => Some(Arc::clone(gate).acquire_owned().await.map_err(|_| {
                        Error::Scheduler("admission stopped after an earlier failure".to_string())
                    })?),
                    None => None,
                };
                let outcome = (*transform)(item).await;
                // Close before releasing the permit so no queued item is admitted.
                if let (Err(_), Some(gate)) = (&outcome, &gate) {
                    gate.close();
                }
                drop(permit);
                outcome
            }
            .boxed()
        })
        .collect();

    join_ordered(deferred).await
}

fn detach<F>(leftovers: FuturesUnordered<F>)
where
    F: Future + Send + 'static,
{
    if leftovers.is_empty() {
        return;
    }

    let count = leftovers.len();
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => {
            debug!(event = "leftovers_detached", count);
            handle.spawn(async move {
                let mut leftovers = leftovers;
                while leftovers.next().await.is_some() {}
            });
        }
        Err(_) => {
            warn!(event = "leftovers_dropped", count, "no tokio runtime to drive leftover tasks");
        }
    }
}
