use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Per-item options function: `(index, parent, parent_index) -> options`.
pub type OptionsFn<O, P> = Arc<dyn Fn(usize, &P, Option<usize>) -> O + Send + Sync>;

/// Options handed to an entity's faking operation.
pub enum Options<O, P = ()> {
    /// Same options for every generated item.
    Static(O),
    /// Options computed for every item from its index and the parent result.
    PerItem(OptionsFn<O, P>),
}

impl<O, P> Options<O, P> {
    pub fn per_item<F>(f: F) -> Self
    where
        F: Fn(usize, &P, Option<usize>) -> O + Send + Sync + 'static,
    {
        Options::PerItem(Arc::new(f))
    }

    pub fn is_static(&self) -> bool {
        matches!(self, Options::Static(_))
    }
}

impl<O: Clone, P> Options<O, P> {
    /// Options for the item at `index`.
    pub fn resolve(&self, index: usize, parent: &P, parent_index: Option<usize>) -> O {
        match self {
            Options::Static(options) => options.clone(),
            Options::PerItem(f) => f(index, parent, parent_index),
        }
    }
}

impl<O: Default, P> Default for Options<O, P> {
    fn default() -> Self {
        Options::Static(O::default())
    }
}

impl<O: Clone, P> Clone for Options<O, P> {
    fn clone(&self) -> Self {
        match self {
            Options::Static(options) => Options::Static(options.clone()),
            Options::PerItem(f) => Options::PerItem(Arc::clone(f)),
        }
    }
}

impl<O: fmt::Debug, P> fmt::Debug for Options<O, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Options::Static(options) => f.debug_tuple("Static").field(options).finish(),
            Options::PerItem(_) => f.write_str("PerItem(..)"),
        }
    }
}

/// Options for the concurrency-bounded scheduler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapOptions {
    /// Maximum number of outstanding items. `None` means unbounded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<NonZeroUsize>,
}

impl MapOptions {
    pub fn unbounded() -> Self {
        Self { concurrency: None }
    }

    /// Bound the number of outstanding items. A limit of zero means unbounded.
    pub fn with_concurrency(limit: usize) -> Self {
        Self {
            concurrency: NonZeroUsize::new(limit),
        }
    }

    pub fn is_bounded(&self) -> bool {
        self.concurrency.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_options_are_cloned_for_every_item() {
        let options: Options<String> = Options::Static("fixed".to_string());
        assert!(options.is_static());
        assert_eq!(options.resolve(0, &(), None), "fixed");
        assert_eq!(options.resolve(7, &(), Some(2)), "fixed");
    }

    #[test]
    fn per_item_options_see_index_and_parent() {
        let options: Options<String, Vec<u32>> =
            Options::per_item(|index, parent: &Vec<u32>, parent_index| {
                format!("{index}:{}:{parent_index:?}", parent.len())
            });
        assert!(!options.is_static());
        assert_eq!(options.resolve(3, &vec![1, 2], Some(1)), "3:2:Some(1)");
    }

    #[test]
    fn zero_concurrency_is_unbounded() {
        assert_eq!(MapOptions::with_concurrency(0), MapOptions::unbounded());
        assert!(MapOptions::with_concurrency(4).is_bounded());
        assert!(!MapOptions::default().is_bounded());
    }
}
