//! Configuration of a database handle.

use crate::common::{parse_level, Logger};
use crate::errors::{ErrorKind, StoreError, StoreResult};
use crate::{DEFAULT_LOGGER_NAME, DEFAULT_VECTOR_LIMIT};
use log::LevelFilter;

/// Settings shared by both backends.
///
/// Each database handle owns its configuration, so two handles in one
/// process may log at different levels.
#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseConfig {
    log_level: LevelFilter,
    logger_name: String,
    default_vector_limit: usize,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl DatabaseConfig {
    pub fn new() -> Self {
        DatabaseConfig {
            log_level: LevelFilter::Debug,
            logger_name: DEFAULT_LOGGER_NAME.to_string(),
            default_vector_limit: DEFAULT_VECTOR_LIMIT,
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn set_log_level(&mut self, level: LevelFilter) {
        self.log_level = level;
    }

    /// Sets the level from one of `DEBUG`, `INFO`, `WARN`, `ERROR`, `SILENT`.
    pub fn set_log_level_name(&mut self, name: &str) -> StoreResult<()> {
        match parse_level(name) {
            Some(level) => {
                self.log_level = level;
                Ok(())
            }
            None => {
                log::error!("Unknown log level {}", name);
                Err(StoreError::new(
                    &format!("Unknown log level {}", name),
                    ErrorKind::ConfigurationError,
                ))
            }
        }
    }

    pub fn logger_name(&self) -> &str {
        &self.logger_name
    }

    pub fn set_logger_name(&mut self, name: &str) -> StoreResult<()> {
        if name.trim().is_empty() {
            log::error!("Logger name cannot be empty");
            return Err(StoreError::new(
                "Logger name cannot be empty",
                ErrorKind::ConfigurationError,
            ));
        }
        self.logger_name = name.trim().to_string();
        Ok(())
    }

    /// Result count of a vector search that does not set a limit.
    pub fn default_vector_limit(&self) -> usize {
        self.default_vector_limit
    }

    pub fn set_default_vector_limit(&mut self, limit: usize) -> StoreResult<()> {
        if limit == 0 {
            log::error!("Default vector limit must be positive");
            return Err(StoreError::new(
                "Default vector limit must be positive",
                ErrorKind::ConfigurationError,
            ));
        }
        self.default_vector_limit = limit;
        Ok(())
    }

    /// Resolves the limit of a vector request: `None` and `Some(0)` fall back
    /// to the default.
    pub fn vector_limit(&self, requested: Option<usize>) -> usize {
        requested
            .filter(|limit| *limit > 0)
            .unwrap_or(self.default_vector_limit)
    }

    pub fn logger(&self) -> Logger {
        Logger::new(self.logger_name.clone(), self.log_level)
    }
}
