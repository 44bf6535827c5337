use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

type Slot = Arc<dyn Any + Send + Sync>;

/// Caller-owned store for values produced along a chain.
///
/// Cloning a `Context` shares the same store.
#[derive(Clone, Default)]
pub struct Context {
    entries: Arc<RwLock<HashMap<String, Slot>>>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `name`. Last write wins.
    pub fn set<T>(&self, name: impl Into<String>, value: T)
    where
        T: Any + Send + Sync,
    {
        let name = name.into();
        debug!(event = "context_remembered", name = %name);
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name, Arc::new(value));
    }

    /// A clone of the value stored under `name`, if it has type `T`.
    pub fn get<T>(&self, name: &str) -> Option<T>
    where
        T: Any + Clone,
    {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .and_then(|slot| slot.downcast_ref::<T>())
            .cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Shortcut for [`remember_as`] bound to this context.
    pub fn remember_as(&self, name: impl Into<String>) -> RememberAs {
        remember_as(self, name)
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<&String> = entries.keys().collect();
        names.sort();
        f.debug_struct("Context").field("names", &names).finish()
    }
}

/// Passthrough step that stores the value flowing through it.
#[derive(Debug, Clone)]
pub struct RememberAs {
    context: Context,
    name: String,
}

/// Store whatever flows through the returned step under `name` in `context`.
pub fn remember_as(context: &Context, name: impl Into<String>) -> RememberAs {
    RememberAs {
        context: context.clone(),
        name: name.into(),
    }
}

impl RememberAs {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Store a clone of `value` and return `value` unchanged.
    pub fn apply<T>(&self, value: T) -> T
    where
        T: Any + Clone + Send + Sync,
    {
        self.context.set(self.name.clone(), value.clone());
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remember_as_returns_value_unchanged() {
        let context = Context::new();
        let out = remember_as(&context, "ids").apply(vec![1_u32, 2, 3]);

        assert_eq!(out, vec![1, 2, 3]);
        assert_eq!(context.get::<Vec<u32>>("ids"), Some(vec![1, 2, 3]));
    }

    #[test]
    fn last_write_wins() {
        let context = Context::new();
        let step = context.remember_as("name");
        step.apply("first".to_string());
        step.apply("second".to_string());

        assert_eq!(context.len(), 1);
        assert_eq!(context.get::<String>("name").as_deref(), Some("second"));
    }

    #[test]
    fn wrong_type_reads_as_missing() {
        let context = Context::new();
        context.set("count", 3_u64);

        assert!(context.contains("count"));
        assert_eq!(context.get::<u32>("count"), None);
        assert_eq!(context.get::<u64>("count"), Some(3));
        assert!(!context.contains("other"));
    }
}
