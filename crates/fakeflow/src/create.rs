use std::fmt;
use std::sync::Arc;

use futures_util::future::FutureExt;
use tracing::debug;

use fakeflow_core::{Deferred, Fakeable, MapOptions, Options, Task, map_concurrent};

/// A step that fakes `amount` instances of one entity.
///
/// `P` is the type of the parent value the step accepts when it follows a
/// previous step. Root steps use `()`.
pub struct Create<E, P = ()>
where
    E: Fakeable + ?Sized,
{
    amount: usize,
    entity: Arc<E>,
    options: Options<E::Options, P>,
    map_options: MapOptions,
}

/// Fake `amount` instances of `entity` with default options and unbounded
/// concurrency.
pub fn create<E, P>(amount: usize, entity: Arc<E>) -> Create<E, P>
where
    E: Fakeable + ?Sized,
    E::Options: Default,
{
    Create::new(amount, entity, Options::default(), MapOptions::default())
}

impl<E, P> Create<E, P>
where
    E: Fakeable + ?Sized,
{
    pub fn new(
        amount: usize,
        entity: Arc<E>,
        options: Options<E::Options, P>,
        map_options: MapOptions,
    ) -> Self {
        Self {
            amount,
            entity,
            options,
            map_options,
        }
    }

    /// Use the same options for every item.
    pub fn with(mut self, options: E::Options) -> Self {
        self.options = Options::Static(options);
        self
    }

    /// Compute options per item from `(index, parent, parent_index)`.
    pub fn per_item<F>(mut self, f: F) -> Self
    where
        F: Fn(usize, &P, Option<usize>) -> E::Options + Send + Sync + 'static,
    {
        self.options = Options::per_item(f);
        self
    }

    /// Bound the number of outstanding factory calls. Zero means unbounded.
    pub fn concurrency(mut self, limit: usize) -> Self {
        self.map_options = MapOptions::with_concurrency(limit);
        self
    }

    pub fn map_options(mut self, map_options: MapOptions) -> Self {
        self.map_options = map_options;
        self
    }

    pub fn amount(&self) -> usize {
        self.amount
    }

    pub fn entity(&self) -> &Arc<E> {
        &self.entity
    }
}

impl<E, P> Create<E, P>
where
    E: Fakeable + ?Sized + 'static,
    E::Options: Clone + Sync,
    P: Send + Sync + 'static,
{
    /// Start generating with the result of a previous step as parent.
    pub fn entries_for(&self, parent: P, parent_index: Option<usize>) -> Deferred<Vec<E::Output>> {
        let amount = self.amount;
        let entity = Arc::clone(&self.entity);
        let options = self.options.clone();
        let map_options = self.map_options;
        let parent = Arc::new(parent);

        async move {
            let name = entity.name().to_string();
            debug!(
                event = "create_started",
                entity = %name,
                amount,
                parent_index = ?parent_index,
                concurrency = ?map_options.concurrency
            );
            if amount == 0 {
                debug!(event = "create_finished", entity = %name, amount);
                return Ok(Vec::new());
            }

            let entries = map_concurrent(0..amount, &map_options, move |index| {
                let options = options.resolve(index, &parent, parent_index);
                let entity = Arc::clone(&entity);
                async move { entity.fake(options).await }
            })
            .await;

            match &entries {
                Ok(_) => debug!(event = "create_finished", entity = %name, amount),
                Err(err) => debug!(event = "create_failed", entity = %name, error = %err),
            }
            entries
        }
        .boxed()
    }

    /// Same as [`Create::entries_for`], for steps expected to yield one item.
    pub fn entry_for(&self, parent: P, parent_index: Option<usize>) -> Deferred<Vec<E::Output>> {
        self.entries_for(parent, parent_index)
    }

    /// The not-yet-started form of this step, to be invoked later with a parent.
    pub fn task(&self) -> Task<P, Vec<E::Output>> {
        let this = self.clone();
        Task::new(move |parent, parent_index| this.entries_for(parent, parent_index))
    }
}

impl<E> Create<E, ()>
where
    E: Fakeable + ?Sized + 'static,
    E::Options: Clone + Sync,
{
    /// Start generating without a parent.
    pub fn entries(&self) -> Deferred<Vec<E::Output>> {
        self.entries_for((), None)
    }

    pub fn entry(&self) -> Deferred<Vec<E::Output>> {
        self.entries_for((), None)
    }
}

impl<E, P> Clone for Create<E, P>
where
    E: Fakeable + ?Sized,
    E::Options: Clone,
{
    fn clone(&self) -> Self {
        Self {
            amount: self.amount,
            entity: Arc::clone(&self.entity),
            options: self.options.clone(),
            map_options: self.map_options,
        }
    }
}

impl<E, P> fmt::Debug for Create<E, P>
where
    E: Fakeable + ?Sized,
    E::Options: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Create")
            .field("amount", &self.amount)
            .field("entity", &self.entity.name())
            .field("options", &self.options)
            .field("map_options", &self.map_options)
            .finish()
    }
}
