use std::fmt;
use std::marker::PhantomData;

use async_trait::async_trait;
use fake::{Dummy, Fake, Faker};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use fakeflow_core::{Fakeable, Result};

/// Options for [`FakerEntity`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FakerOptions {
    /// Seed for a deterministic item. Thread RNG when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl FakerOptions {
    pub fn seeded(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }
}

/// Entity backed by the `fake` crate's `Dummy` implementations.
pub struct FakerEntity<T> {
    name: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> FakerEntity<T> {
    pub fn new() -> Self {
        Self::named(short_type_name(std::any::type_name::<T>()))
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            _marker: PhantomData,
        }
    }
}

/// Last path segment of a type name, or the whole name for generic types.
fn short_type_name(full: &str) -> &str {
    if full.contains('<') {
        return full;
    }
    full.rsplit("::").next().unwrap_or(full)
}

impl<T> Default for FakerEntity<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for FakerEntity<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FakerEntity").field("name", &self.name).finish()
    }
}

#[async_trait]
impl<T> Fakeable for FakerEntity<T>
where
    T: Dummy<Faker> + Send + 'static,
{
    type Options = FakerOptions;
    type Output = T;

    fn name(&self) -> &str {
        &self.name
    }

    async fn fake(&self, options: FakerOptions) -> Result<T> {
        let value = match options.seed {
            Some(seed) => {
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                Faker.fake_with_rng(&mut rng)
            }
            None => Faker.fake(),
        };
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Dummy)]
    struct Profile {
        id: u64,
        handle: String,
    }

    #[tokio::test]
    async fn same_seed_same_item() {
        let entity = FakerEntity::<Profile>::new();
        let first = Fakeable::fake(&entity, FakerOptions::seeded(42)).await.unwrap();
        let second = Fakeable::fake(&entity, FakerOptions::seeded(42)).await.unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn default_name_is_the_short_type_name() {
        assert_eq!(FakerEntity::<Profile>::new().name(), "Profile");
        assert_eq!(FakerEntity::<Profile>::named("member").name(), "member");
    }

    #[test]
    fn generic_types_keep_their_full_name() {
        let name = std::any::type_name::<Vec<Profile>>();
        assert_eq!(FakerEntity::<Vec<Profile>>::new().name(), name);
        assert_eq!(short_type_name("a::b::Profile"), "Profile");
        assert_eq!(short_type_name("alloc::vec::Vec<a::B>"), "alloc::vec::Vec<a::B>");
    }
}
