use crate::collection::Document;
use crate::database_config::DatabaseConfig;
use crate::errors::{ErrorKind, StoreError, StoreResult};
use crate::store::memory::MemoryDatabase;
use crate::store::remote::{DocumentDriver, RemoteDatabase};
use log::LevelFilter;

/// Builder for database handles.
///
/// Setters record the first configuration error and the `open_*` methods
/// return it.
///
/// ```rust,ignore
/// let db = DatabaseBuilder::new()
///     .log_level_name("WARN")
///     .default_vector_limit(5)
///     .open_in_memory_json(json!({ "users": { "alice": { "age": 30 } } }))?;
/// ```
#[derive(Default)]
pub struct DatabaseBuilder {
    error: Option<StoreError>,
    config: DatabaseConfig,
}

impl DatabaseBuilder {
    pub fn new() -> Self {
        DatabaseBuilder {
            error: None,
            config: DatabaseConfig::new(),
        }
    }

    pub fn log_level(mut self, level: LevelFilter) -> Self {
        self.config.set_log_level(level);
        self
    }

    pub fn log_level_name(mut self, name: &str) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.set_log_level_name(name) {
                self.error = Some(e);
            }
        }
        self
    }

    pub fn logger_name(mut self, name: &str) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.set_logger_name(name) {
                self.error = Some(e);
            }
        }
        self
    }

    pub fn default_vector_limit(mut self, limit: usize) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.set_default_vector_limit(limit) {
                self.error = Some(e);
            }
        }
        self
    }

    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// Opens an in-memory database over `root`.
    pub fn open_in_memory(self, root: Document) -> StoreResult<MemoryDatabase> {
        if let Some(error) = self.error {
            return Err(error);
        }
        Ok(MemoryDatabase::new(root, self.config))
    }

    /// Opens an in-memory database from a JSON object.
    pub fn open_in_memory_json(self, root: serde_json::Value) -> StoreResult<MemoryDatabase> {
        if let Some(error) = self.error {
            return Err(error);
        }
        match Document::from_json(root) {
            Some(root) => Ok(MemoryDatabase::new(root, self.config)),
            None => {
                log::error!("The root of an in-memory database must be a JSON object");
                Err(StoreError::new(
                    "The root of an in-memory database must be a JSON object",
                    ErrorKind::InvalidDataType,
                ))
            }
        }
    }

    /// Opens a database that forwards every call to `driver`.
    pub fn open_remote<D: DocumentDriver>(self, driver: D) -> StoreResult<RemoteDatabase<D>> {
        if let Some(error) = self.error {
            return Err(error);
        }
        Ok(RemoteDatabase::new(driver, self.config))
    }
}
