use async_trait::async_trait;

use crate::error::Result;

/// Capability implemented by entities that can produce fake instances.
///
/// Implementations are owned by the caller and shared with the combinators
/// through `Arc`; the combinators never mutate them.
#[async_trait]
pub trait Fakeable: Send + Sync {
    /// Per-item options handed to [`Fakeable::fake`].
    type Options: Send + 'static;
    /// The faked instance.
    type Output: Send + 'static;

    /// Name used in diagnostics.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Produce one fake instance.
    async fn fake(&self, options: Self::Options) -> Result<Self::Output>;
}
