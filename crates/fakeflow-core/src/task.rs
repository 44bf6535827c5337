use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures_util::future::{BoxFuture, FutureExt, TryFutureExt};

use crate::error::Result;

/// A result that is not available yet but will resolve or fail.
pub type Deferred<T> = BoxFuture<'static, Result<T>>;

type TaskFn<P, T> = dyn Fn(P, Option<usize>) -> Deferred<T> + Send + Sync;

/// A composable unit of deferred work.
///
/// A task accepts a parent value and an optional parent index and starts a
/// new [`Deferred`] on every call. It holds no state between calls.
pub struct Task<P, T> {
    run: Arc<TaskFn<P, T>>,
}

impl<P, T> Clone for Task<P, T> {
    fn clone(&self) -> Self {
        Self {
            run: Arc::clone(&self.run),
        }
    }
}

impl<P, T> fmt::Debug for Task<P, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task").finish_non_exhaustive()
    }
}

impl<P: 'static, T: 'static> Task<P, T> {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(P, Option<usize>) -> Deferred<T> + Send + Sync + 'static,
    {
        Self { run: Arc::new(f) }
    }

    /// Build a task from an async function of the parent value.
    pub fn from_fn<F, Fut>(f: F) -> Self
    where
        F: Fn(P) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        Self::new(move |parent, _| f(parent).boxed())
    }

    pub fn call(&self, parent: P) -> Deferred<T> {
        (self.run)(parent, None)
    }

    pub fn call_indexed(&self, parent: P, parent_index: usize) -> Deferred<T> {
        (self.run)(parent, Some(parent_index))
    }

    pub fn call_with(&self, parent: P, parent_index: Option<usize>) -> Deferred<T> {
        (self.run)(parent, parent_index)
    }

    /// Convert every output of this task.
    pub fn map<U, F>(self, f: F) -> Task<P, U>
    where
        F: Fn(T) -> U + Send + Sync + 'static,
        T: Send,
        U: Send + 'static,
    {
        let f = Arc::new(f);
        Task::new(move |parent, parent_index| {
            let f = Arc::clone(&f);
            self.call_with(parent, parent_index)
                .map_ok(move |value| (*f)(value))
                .boxed()
        })
    }

    /// Run `next` with this task's output as its parent.
    pub fn then<U>(self, next: Task<T, U>) -> Task<P, U>
    where
        T: Send,
        U: Send + 'static,
    {
        Task::new(move |parent, parent_index| {
            let first = self.call_with(parent, parent_index);
            let next = next.clone();
            async move {
                let value = first.await?;
                next.call(value).await
            }
            .boxed()
        })
    }
}

/// Element of a parallel task list: already started, or waiting for a parent.
pub enum TaskRef<P, T> {
    Started(Deferred<T>),
    Later(Task<P, T>),
}

impl<P: Clone + 'static, T: 'static> TaskRef<P, T> {
    /// Start the task if needed, handing it a clone of `parent`.
    pub fn resolve(self, parent: &P) -> Deferred<T> {
        match self {
            TaskRef::Started(deferred) => deferred,
            TaskRef::Later(task) => task.call(parent.clone()),
        }
    }
}

impl<P, T> From<Deferred<T>> for TaskRef<P, T> {
    fn from(deferred: Deferred<T>) -> Self {
        TaskRef::Started(deferred)
    }
}

impl<P, T> From<Task<P, T>> for TaskRef<P, T> {
    fn from(task: Task<P, T>) -> Self {
        TaskRef::Later(task)
    }
}

impl<P, T> fmt::Debug for TaskRef<P, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskRef::Started(_) => f.write_str("Started(..)"),
            TaskRef::Later(_) => f.write_str("Later(..)"),
        }
    }
}
