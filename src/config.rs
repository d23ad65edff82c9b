use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::form::FormOptions;

/// Settings read from a `loginkit.toml` file.
///
/// ```toml
/// locale = "pt-BR"
///
/// [form]
/// validate_mode = "on_blur"
/// error_display = "eager"
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoginConfig {
    pub form: FormOptions,
    /// Catalog locale tag, or `"system"`. Unset means the built-in English copy.
    pub locale: Option<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

impl LoginConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), ?config, "loaded login config");
        Ok(config)
    }
}
