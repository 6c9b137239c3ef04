//! App-module contract and the authorization seam.
//!
//! [`AppModule`] is what the runtime registry manages: a named unit of state
//! with genesis import/export over raw JSON sections, so the registry never
//! depends on any module's concrete types. [`OwnershipPolicy`] is the
//! pluggable record-level authorization predicate; the stock policy is
//! [`CreatorOnly`].

use async_trait::async_trait;

use crate::errors::ModuleError;

/// A named application module managed by the runtime.
///
/// Genesis sections travel as raw [`serde_json::Value`]s; each module decodes
/// its own section. Used as `Arc<dyn AppModule>`.
#[async_trait]
pub trait AppModule: Send + Sync + 'static {
    /// Unique module name; also the key of its genesis section.
    fn name(&self) -> &'static str;

    /// The genesis section an empty chain starts from.
    ///
    /// # Errors
    ///
    /// Only when the module's default state fails to serialize, which is an
    /// internal fault.
    fn default_genesis(&self) -> Result<serde_json::Value, ModuleError>;

    /// Validate a genesis section without touching the store.
    ///
    /// # Errors
    ///
    /// [`ModuleError::InvalidArgument`] for an undecodable or internally
    /// inconsistent section (e.g., duplicate record keys).
    fn validate_genesis(&self, raw: &serde_json::Value) -> Result<(), ModuleError>;

    /// Bulk-load the module's state from a validated genesis section.
    ///
    /// Trusts prior validation: record keys are written without re-checking
    /// for collisions. Fails fast on the first storage error.
    async fn init_genesis(&self, raw: serde_json::Value) -> Result<(), ModuleError>;

    /// Dump the module's state as a genesis section, records in ascending
    /// key order.
    async fn export_genesis(&self) -> Result<serde_json::Value, ModuleError>;
}

/// Record-level authorization predicate.
///
/// Decides whether `signer` may mutate a record owned by `owner`. Kept
/// separate from command logic so richer policies (multi-owner, role-based)
/// can be substituted without touching the handlers.
pub trait OwnershipPolicy: Send + Sync {
    /// Whether `signer` may update or delete a record created by `owner`.
    fn authorize(&self, owner: &str, signer: &str) -> bool;
}

/// The stock policy: only the exact creator may mutate a record.
#[derive(Debug, Clone, Copy, Default)]
pub struct CreatorOnly;

impl OwnershipPolicy for CreatorOnly {
    fn authorize(&self, owner: &str, signer: &str) -> bool {
        owner == signer
    }
}
