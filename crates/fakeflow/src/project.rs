use futures_util::future::{self, FutureExt};

use fakeflow_core::{Deferred, Error, Task};

/// Applies a following step to every item of a parent collection.
#[derive(Debug)]
pub struct ForEach<P, T> {
    task: Task<P, T>,
}

/// Project `task` over every parent item.
pub fn for_each<P, T>(task: Task<P, T>) -> ForEach<P, T> {
    ForEach { task }
}

impl<P, T> Clone for ForEach<P, T> {
    fn clone(&self) -> Self {
        Self {
            task: self.task.clone(),
        }
    }
}

impl<P: 'static, T: 'static> ForEach<P, T> {
    /// Start `task` once per parent. Each call receives the item as parent and
    /// its position as parent index. Nothing is awaited here.
    pub fn apply<I>(&self, parents: I) -> Vec<Deferred<T>>
    where
        I: IntoIterator<Item = P>,
    {
        parents
            .into_iter()
            .enumerate()
            .map(|(index, parent)| self.task.call_indexed(parent, index))
            .collect()
    }
}

/// Applies a following step to the first item of a parent collection only.
#[derive(Debug)]
pub struct ForTheFirst<P, T> {
    task: Task<P, T>,
}

/// Project `task` over the first parent item, ignoring the rest.
pub fn for_the_first<P, T>(task: Task<P, T>) -> ForTheFirst<P, T> {
    ForTheFirst { task }
}

impl<P, T> Clone for ForTheFirst<P, T> {
    fn clone(&self) -> Self {
        Self {
            task: self.task.clone(),
        }
    }
}

impl<P: 'static, T: Send + 'static> ForTheFirst<P, T> {
    /// Start `task` with the first parent. Fails with [`Error::EmptyParent`]
    /// when there is none.
    pub fn apply<I>(&self, parents: I) -> Deferred<T>
    where
        I: IntoIterator<Item = P>,
    {
        match parents.into_iter().next() {
            Some(first) => self.task.call_indexed(first, 0),
            None => future::ready(Err(Error::EmptyParent)).boxed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use fakeflow_core::join_ordered;

    use super::*;

    fn tagged(calls: Arc<AtomicUsize>) -> Task<char, String> {
        Task::new(move |parent: char, parent_index| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move { Ok(format!("{parent}@{parent_index:?}")) }.boxed()
        })
    }

    #[tokio::test]
    async fn for_each_starts_one_task_per_parent() {
        let calls = Arc::new(AtomicUsize::new(0));
        let deferred = for_each(tagged(calls.clone())).apply(vec!['a', 'b', 'c']);
        assert_eq!(deferred.len(), 3);

        let out = join_ordered(deferred).await.unwrap();
        assert_eq!(out, vec!["a@Some(0)", "b@Some(1)", "c@Some(2)"]);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn for_the_first_ignores_the_rest() {
        let calls = Arc::new(AtomicUsize::new(0));
        let out = for_the_first(tagged(calls.clone()))
            .apply(vec!['x', 'y', 'z'])
            .await
            .unwrap();
        assert_eq!(out, "x@Some(0)");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn for_the_first_on_empty_input_fails() {
        let calls = Arc::new(AtomicUsize::new(0));
        let err = for_the_first(tagged(calls.clone()))
            .apply(Vec::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::EmptyParent));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
