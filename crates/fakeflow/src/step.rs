use std::any::Any;

use futures_util::future::{self, FutureExt};

use fakeflow_core::{Deferred, Task, join_ordered};

use crate::parallel::InParallel;
use crate::project::{ForEach, ForTheFirst};
use crate::remember::RememberAs;

/// Something that can follow a previous step, consuming its result.
pub trait Step<In>: Send + 'static {
    type Output: Send + 'static;

    fn step(self, input: In) -> Deferred<Self::Output>;
}

impl<P, T> Step<P> for Task<P, T>
where
    P: 'static,
    T: Send + 'static,
{
    type Output = T;

    fn step(self, input: P) -> Deferred<T> {
        self.call(input)
    }
}

impl<P, T> Step<P> for InParallel<P, T>
where
    P: Clone + Send + 'static,
    T: Send + 'static,
{
    type Output = Vec<T>;

    fn step(self, input: P) -> Deferred<Vec<T>> {
        self.with_parent(input)
    }
}

/// Chained after a collection, every projected task is joined concurrently.
impl<P, T> Step<Vec<P>> for ForEach<P, T>
where
    P: 'static,
    T: Send + 'static,
{
    type Output = Vec<T>;

    fn step(self, input: Vec<P>) -> Deferred<Vec<T>> {
        join_ordered(self.apply(input)).boxed()
    }
}

impl<P, T> Step<Vec<P>> for ForTheFirst<P, T>
where
    P: 'static,
    T: Send + 'static,
{
    type Output = T;

    fn step(self, input: Vec<P>) -> Deferred<T> {
        self.apply(input)
    }
}

impl<T> Step<T> for RememberAs
where
    T: Any + Clone + Send + Sync,
{
    type Output = T;

    fn step(self, input: T) -> Deferred<T> {
        future::ready(Ok(self.apply(input))).boxed()
    }
}

/// Continuations on a [`Deferred`] result.
pub trait DeferredExt<T>: Sized {
    /// Feed the resolved value into `step`.
    fn chain<S>(self, step: S) -> Deferred<S::Output>
    where
        S: Step<T>;

    /// Transform the resolved value.
    fn then_with<U, F>(self, f: F) -> Deferred<U>
    where
        F: FnOnce(T) -> U + Send + 'static,
        U: Send + 'static;
}

impl<T: Send + 'static> DeferredExt<T> for Deferred<T> {
    fn chain<S>(self, step: S) -> Deferred<S::Output>
    where
        S: Step<T>,
    {
        async move {
            let value = self.await?;
            step.step(value).await
        }
        .boxed()
    }

    fn then_with<U, F>(self, f: F) -> Deferred<U>
    where
        F: FnOnce(T) -> U + Send + 'static,
        U: Send + 'static,
    {
        async move { self.await.map(f) }.boxed()
    }
}
