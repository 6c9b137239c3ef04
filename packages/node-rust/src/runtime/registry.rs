//! Registry of app modules and the genesis sequencing that runs over them.

use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::RwLock;
use realfin_core::{AppModule, ModuleError};

use super::genesis::GenesisDoc;

/// Registry of [`AppModule`]s.
///
/// Registration order is the genesis order: sections are validated and
/// imported module by module in the order modules were registered, and the
/// exported document is keyed by module name (key-sorted, canonical).
pub struct ModuleRegistry {
    by_name: DashMap<&'static str, Arc<dyn AppModule>>,
    genesis_order: RwLock<Vec<&'static str>>,
}

impl ModuleRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            by_name: DashMap::new(),
            genesis_order: RwLock::new(Vec::new()),
        }
    }

    /// Register a module. Registration order determines genesis sequencing.
    pub fn register(&self, module: Arc<dyn AppModule>) {
        let name = module.name();
        self.by_name.insert(name, module);
        self.genesis_order.write().push(name);
    }

    /// Retrieve a module by name.
    #[must_use]
    pub fn get_by_name(&self, name: &str) -> Option<Arc<dyn AppModule>> {
        self.by_name.get(name).map(|entry| entry.value().clone())
    }

    /// Module names in registration order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.genesis_order.read().clone()
    }

    /// The genesis document an empty chain starts from: every module's
    /// default section.
    ///
    /// # Errors
    ///
    /// Propagates a module's serialization fault.
    pub fn default_document(&self) -> Result<GenesisDoc, ModuleError> {
        let mut doc = GenesisDoc::new();
        for name in self.names() {
            if let Some(module) = self.get_by_name(name) {
                doc.insert(name.to_string(), module.default_genesis()?);
            }
        }
        Ok(doc)
    }

    /// Validate a genesis document without touching any store.
    ///
    /// # Errors
    ///
    /// [`ModuleError::InvalidArgument`] for a section naming no registered
    /// module, or whatever a module's own validation reports. Modules with
    /// no section are validated against their default.
    pub fn validate_document(&self, doc: &GenesisDoc) -> Result<(), ModuleError> {
        for key in doc.keys() {
            if self.get_by_name(key).is_none() {
                return Err(ModuleError::InvalidArgument(format!(
                    "unknown module section {key:?}"
                )));
            }
        }
        for name in self.names() {
            if let Some(module) = self.get_by_name(name) {
                match doc.get(name) {
                    Some(section) => module.validate_genesis(section)?,
                    None => module.validate_genesis(&module.default_genesis()?)?,
                }
            }
        }
        Ok(())
    }

    /// Import a genesis document, module by module in registration order.
    ///
    /// Trusts prior validation and fails fast on the first module error.
    ///
    /// # Errors
    ///
    /// Whatever the failing module's import reports.
    pub async fn init_genesis(&self, doc: &GenesisDoc) -> Result<(), ModuleError> {
        for name in self.names() {
            if let Some(module) = self.get_by_name(name) {
                let section = match doc.get(name) {
                    Some(section) => section.clone(),
                    None => module.default_genesis()?,
                };
                module.init_genesis(section).await?;
                tracing::info!(module = name, "genesis imported");
            }
        }
        Ok(())
    }

    /// Export every module's state as a genesis document.
    ///
    /// # Errors
    ///
    /// Whatever the failing module's export reports.
    pub async fn export_genesis(&self) -> Result<GenesisDoc, ModuleError> {
        let mut doc = GenesisDoc::new();
        for name in self.names() {
            if let Some(module) = self.get_by_name(name) {
                doc.insert(name.to_string(), module.export_genesis().await?);
            }
        }
        Ok(doc)
    }
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}
