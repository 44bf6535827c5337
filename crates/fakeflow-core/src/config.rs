use std::num::NonZeroUsize;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::options::MapOptions;

/// Environment variable overriding [`Settings::concurrency`].
pub const CONCURRENCY_ENV: &str = "FAKEFLOW_CONCURRENCY";

/// Defaults applied by callers when building creation steps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Default bound on outstanding factory calls per creation step.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<NonZeroUsize>,
}

impl Settings {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load from `path` when it exists, defaults otherwise.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            return Self::load(path);
        }
        Ok(Self::default())
    }

    /// Defaults with environment overrides applied.
    pub fn from_env() -> Result<Self> {
        Self::default().with_env_overrides()
    }

    pub fn with_env_overrides(self) -> Result<Self> {
        let raw = std::env::var(CONCURRENCY_ENV).ok();
        self.with_concurrency_override(raw.as_deref())
    }

    fn with_concurrency_override(mut self, raw: Option<&str>) -> Result<Self> {
        if let Some(raw) = raw {
            let limit: usize = raw.trim().parse().map_err(|_| {
                Error::Config(format!("{CONCURRENCY_ENV} must be a non-negative integer, got '{raw}'"))
            })?;
            self.concurrency = NonZeroUsize::new(limit);
        }
        Ok(self)
    }

    pub fn map_options(&self) -> MapOptions {
        MapOptions {
            concurrency: self.concurrency,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_concurrency_from_toml() {
        let settings = Settings::from_toml_str("concurrency = 4\n").unwrap();
        assert_eq!(settings.map_options(), MapOptions::with_concurrency(4));
    }

    #[test]
    fn empty_toml_is_unbounded() {
        let settings = Settings::from_toml_str("").unwrap();
        assert_eq!(settings, Settings::default());
        assert!(!settings.map_options().is_bounded());
    }

    #[test]
    fn rejects_zero_in_toml() {
        let err = Settings::from_toml_str("concurrency = 0\n").unwrap_err();
        assert!(matches!(err, Error::Toml(_)));
    }

    #[test]
    fn override_replaces_concurrency() {
        let settings = Settings::default()
            .with_concurrency_override(Some(" 8 "))
            .unwrap();
        assert_eq!(settings.map_options(), MapOptions::with_concurrency(8));

        let settings = settings.with_concurrency_override(Some("0")).unwrap();
        assert!(!settings.map_options().is_bounded());

        let settings = settings.with_concurrency_override(None).unwrap();
        assert!(settings.concurrency.is_none());
    }

    #[test]
    fn override_rejects_garbage() {
        let err = Settings::default()
            .with_concurrency_override(Some("many"))
            .unwrap_err();
        assert!(err.to_string().contains(CONCURRENCY_ENV));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join("fakeflow-settings-does-not-exist.toml");
        let settings = Settings::load_or_default(&path).unwrap();
        assert_eq!(settings, Settings::default());
    }
}
