use std::future::IntoFuture;

use futures_util::future::FutureExt;
use tracing::debug;

use fakeflow_core::{Deferred, Result, TaskRef, join_ordered};

/// A fixed list of tasks awaited concurrently, results kept in list order.
pub struct InParallel<P, T> {
    tasks: Vec<TaskRef<P, T>>,
}

/// Run every element of `tasks` concurrently.
///
/// Elements may be already started ([`TaskRef::Started`]) or waiting for a
/// parent ([`TaskRef::Later`]). Awaiting the result directly runs it without
/// a parent; chaining it after a previous step hands that step's result to
/// every waiting element.
pub fn in_parallel<P, T, I>(tasks: I) -> InParallel<P, T>
where
    I: IntoIterator,
    I::Item: Into<TaskRef<P, T>>,
{
    InParallel {
        tasks: tasks.into_iter().map(Into::into).collect(),
    }
}

impl<P, T> InParallel<P, T> {
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn push(mut self, task: impl Into<TaskRef<P, T>>) -> Self {
        self.tasks.push(task.into());
        self
    }
}

impl<P, T> InParallel<P, T>
where
    P: Clone + 'static,
    T: Send + 'static,
{
    /// Start every waiting element with a clone of `parent` and join them all.
    pub fn with_parent(self, parent: P) -> Deferred<Vec<T>> {
        let total = self.tasks.len();
        let waiting = self
            .tasks
            .iter()
            .filter(|task| matches!(task, TaskRef::Later(_)))
            .count();
        debug!(event = "parallel_started", tasks = total, waiting);

        let deferred: Vec<Deferred<T>> = self
            .tasks
            .into_iter()
            .map(|task| task.resolve(&parent))
            .collect();

        async move {
            let results = join_ordered(deferred).await;
            if let Err(err) = &results {
                debug!(event = "parallel_failed", tasks = total, error = %err);
            }
            results
        }
        .boxed()
    }
}

impl<T: Send + 'static> InParallel<(), T> {
    /// Join every element without a parent.
    pub fn run(self) -> Deferred<Vec<T>> {
        self.with_parent(())
    }
}

impl<T: Send + 'static> IntoFuture for InParallel<(), T> {
    type Output = Result<Vec<T>>;
    type IntoFuture = Deferred<Vec<T>>;

    fn into_future(self) -> Self::IntoFuture {
        self.run()
    }
}
