use crate::{
    BATCH_GET_LIMIT, MAX_INDEXED_TEXT_LEN,
    error::{ErrorClass, ErrorOrigin, InternalError},
};
use serde::Deserialize;
use thiserror::Error as ThisError;

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {field} must be greater than zero")]
    Zero { field: &'static str },
}

impl From<ConfigError> for InternalError {
    fn from(err: ConfigError) -> Self {
        Self::new(ErrorClass::Unsupported, ErrorOrigin::Config, err.to_string())
    }
}

///
/// DbConfig
///
/// Engine limits. Every field has a default, so an empty TOML document is a
/// valid config.
///
/// ```toml
/// max_indexed_text_len = 1024
/// batch_get_limit = 128
/// ```
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DbConfig {
    /// Longest text value, in UTF-16 code units, accepted into an index key.
    pub max_indexed_text_len: usize,

    /// Most keys requested from the store in one batch-get call.
    pub batch_get_limit: usize,
}

impl DbConfig {
    /// Parse and validate a TOML config.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;

        config.validate()
    }

    /// Reject limits the engine cannot operate with.
    pub const fn validate(self) -> Result<Self, ConfigError> {
        if self.max_indexed_text_len == 0 {
            return Err(ConfigError::Zero {
                field: "max_indexed_text_len",
            });
        }
        if self.batch_get_limit == 0 {
            return Err(ConfigError::Zero {
                field: "batch_get_limit",
            });
        }

        Ok(self)
    }

    #[must_use]
    pub const fn with_batch_get_limit(mut self, limit: usize) -> Self {
        self.batch_get_limit = limit;
        self
    }

    #[must_use]
    pub const fn with_max_indexed_text_len(mut self, len: usize) -> Self {
        self.max_indexed_text_len = len;
        self
    }
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            max_indexed_text_len: MAX_INDEXED_TEXT_LEN,
            batch_get_limit: BATCH_GET_LIMIT,
        }
    }
}
