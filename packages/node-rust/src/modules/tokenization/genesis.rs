//! Genesis import/export for the tokenization module.

use async_trait::async_trait;
use realfin_core::{AppModule, ModuleError};

use super::service::Tokenization;
use super::types::{GenesisState, MODULE_NAME};

/// Bulk-load module state from a validated genesis section. Collisions are
/// not re-checked; the first storage error propagates.
///
/// # Errors
///
/// `Internal` on a storage fault.
pub fn init_genesis(svc: &Tokenization, state: &GenesisState) -> Result<(), ModuleError> {
    for asset in &state.assets {
        svc.assets().set(&asset.symbol, asset)?;
    }
    svc.params_item().set(&state.params)?;
    Ok(())
}

/// Dump module state with assets in ascending `symbol` order.
///
/// # Errors
///
/// `Internal` on a storage fault.
pub fn export_genesis(svc: &Tokenization) -> Result<GenesisState, ModuleError> {
    let params = svc.params_item().get()?.unwrap_or_default();
    let mut assets = Vec::new();
    svc.assets().walk(|_, asset| {
        assets.push(asset);
        false
    })?;
    Ok(GenesisState { params, assets })
}

#[async_trait]
impl AppModule for Tokenization {
    fn name(&self) -> &'static str {
        MODULE_NAME
    }

    fn default_genesis(&self) -> Result<serde_json::Value, ModuleError> {
        serde_json::to_value(GenesisState::default())
            .map_err(|e| ModuleError::Internal(anyhow::Error::new(e)))
    }

    fn validate_genesis(&self, raw: &serde_json::Value) -> Result<(), ModuleError> {
        let state: GenesisState = serde_json::from_value(raw.clone())
            .map_err(|e| ModuleError::InvalidArgument(format!("tokenization genesis: {e}")))?;
        state.validate()
    }

    async fn init_genesis(&self, raw: serde_json::Value) -> Result<(), ModuleError> {
        let state: GenesisState = serde_json::from_value(raw)
            .map_err(|e| ModuleError::InvalidArgument(format!("tokenization genesis: {e}")))?;
        init_genesis(self, &state)
    }

    async fn export_genesis(&self) -> Result<serde_json::Value, ModuleError> {
        let state = export_genesis(self)?;
        serde_json::to_value(state).map_err(|e| ModuleError::Internal(anyhow::Error::new(e)))
    }
}
