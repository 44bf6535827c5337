use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use fakeflow_core::{Error, Fakeable, Result};

use crate::create::{Create, create};

/// Type-erased entity speaking JSON options and output.
pub type DynEntity = dyn Fakeable<Options = Value, Output = Value>;

/// Adapter exposing a typed entity through JSON options and output.
///
/// `null` options fall back to the entity's default options.
pub struct JsonEntity<E> {
    name: String,
    inner: Arc<E>,
}

impl<E> JsonEntity<E> {
    pub fn new(name: impl Into<String>, inner: Arc<E>) -> Self {
        Self {
            name: name.into(),
            inner,
        }
    }
}

#[async_trait]
impl<E> Fakeable for JsonEntity<E>
where
    E: Fakeable,
    E::Options: DeserializeOwned + Default,
    E::Output: Serialize,
{
    type Options = Value;
    type Output = Value;

    fn name(&self) -> &str {
        &self.name
    }

    async fn fake(&self, options: Value) -> Result<Value> {
        let options = if options.is_null() {
            E::Options::default()
        } else {
            serde_json::from_value(options).map_err(|err| Error::Options {
                entity: self.name.clone(),
                message: err.to_string(),
            })?
        };
        let output = self.inner.fake(options).await?;
        Ok(serde_json::to_value(output)?)
    }
}

/// Named entities resolved at runtime.
#[derive(Clone, Default)]
pub struct EntityRegistry {
    entities: BTreeMap<String, Arc<DynEntity>>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a typed entity under `name` behind a [`JsonEntity`] adapter.
    pub fn register<E>(&mut self, name: impl Into<String>, entity: Arc<E>) -> &mut Self
    where
        E: Fakeable + 'static,
        E::Options: DeserializeOwned + Default,
        E::Output: Serialize,
    {
        let name = name.into();
        let adapter = JsonEntity::new(name.clone(), entity);
        self.entities.insert(name, Arc::new(adapter));
        self
    }

    /// Register an entity that already speaks JSON.
    pub fn register_dyn(&mut self, name: impl Into<String>, entity: Arc<DynEntity>) -> &mut Self {
        self.entities.insert(name.into(), entity);
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<DynEntity>> {
        self.entities.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entities.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entities.keys().map(String::as_str)
    }

    /// Build a creation step for the entity registered as `name`.
    ///
    /// Fails immediately with [`Error::InvalidEntity`] when no such entity
    /// exists; nothing asynchronous has started at that point.
    pub fn create<P>(&self, amount: usize, name: &str) -> Result<Create<DynEntity, P>> {
        let entity = self
            .get(name)
            .ok_or_else(|| Error::InvalidEntity(name.to_string()))?;
        Ok(create(amount, entity))
    }
}

impl fmt::Debug for EntityRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityRegistry")
            .field("entities", &self.entities.keys().collect::<Vec<_>>())
            .finish()
    }
}
