use thiserror::Error;

/// Boxed error raised by caller-supplied factories.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error type shared across fakeflow crates.
#[derive(Debug, Error)]
pub enum Error {
    /// A dynamically referenced entity has no faking capability.
    #[error("`create` doesn't know how to fake this entity: {0}")]
    InvalidEntity(String),
    /// A single faking invocation failed. The factory's error is kept as the source.
    #[error("factory failed: {0}")]
    Factory(#[source] BoxError),
    /// `for_the_first` was applied to an empty collection.
    #[error("for_the_first applied to an empty parent list")]
    EmptyParent,
    /// A JSON options payload could not be decoded for an entity.
    #[error("invalid options for entity '{entity}': {message}")]
    Options { entity: String, message: String },
    /// The concurrency gate was closed while items were still waiting.
    #[error("scheduler error: {0}")]
    Scheduler(String),
    #[error("config error: {0}")]
    Config(String),
    #[error("logging error: {0}")]
    Logging(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Wrap a factory failure.
    pub fn factory<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        Error::Factory(err.into())
    }

    /// Returns the factory's own error when this is a factory failure.
    pub fn factory_source(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            Error::Factory(source) => Some(source.as_ref()),
            _ => None,
        }
    }
}

/// Convenience alias for results returned by fakeflow crates.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error)]
    #[error("duplicate key")]
    struct DuplicateKey;

    #[test]
    fn factory_error_keeps_source() {
        let err = Error::factory(DuplicateKey);
        assert_eq!(err.to_string(), "factory failed: duplicate key");

        let source = err.factory_source().expect("factory source");
        assert!(source.downcast_ref::<DuplicateKey>().is_some());
    }

    #[test]
    fn invalid_entity_names_the_value() {
        let err = Error::InvalidEntity("Error".to_string());
        assert!(err.to_string().ends_with("fake this entity: Error"));
        assert!(err.factory_source().is_none());
    }
}
