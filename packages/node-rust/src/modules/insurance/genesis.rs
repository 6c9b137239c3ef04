//! Genesis import/export for the insurance module.

use async_trait::async_trait;
use realfin_core::{AppModule, ModuleError};

use super::service::Insurance;
use super::types::{GenesisState, MODULE_NAME};

/// Bulk-load module state from a validated genesis section.
///
/// Key collisions are not re-checked here; [`GenesisState::validate`] ran
/// before import. The first storage error propagates immediately.
///
/// # Errors
///
/// `Internal` on a storage fault.
pub fn init_genesis(svc: &Insurance, state: &GenesisState) -> Result<(), ModuleError> {
    for policy in &state.policies {
        svc.policies().set(&policy.policy_id, policy)?;
    }
    svc.params_item().set(&state.params)?;
    Ok(())
}

/// Dump module state with policies in ascending `policy_id` order.
///
/// # Errors
///
/// `Internal` on a storage fault.
pub fn export_genesis(svc: &Insurance) -> Result<GenesisState, ModuleError> {
    let params = svc.params_item().get()?.unwrap_or_default();
    let mut policies = Vec::new();
    svc.policies().walk(|_, policy| {
        policies.push(policy);
        false
    })?;
    Ok(GenesisState { params, policies })
}

#[async_trait]
impl AppModule for Insurance {
    fn name(&self) -> &'static str {
        MODULE_NAME
    }

    fn default_genesis(&self) -> Result<serde_json::Value, ModuleError> {
        serde_json::to_value(GenesisState::default())
            .map_err(|e| ModuleError::Internal(anyhow::Error::new(e)))
    }

    fn validate_genesis(&self, raw: &serde_json::Value) -> Result<(), ModuleError> {
        let state: GenesisState = serde_json::from_value(raw.clone())
            .map_err(|e| ModuleError::InvalidArgument(format!("insurance genesis: {e}")))?;
        state.validate()
    }

    async fn init_genesis(&self, raw: serde_json::Value) -> Result<(), ModuleError> {
        let state: GenesisState = serde_json::from_value(raw)
            .map_err(|e| ModuleError::InvalidArgument(format!("insurance genesis: {e}")))?;
        init_genesis(self, &state)
    }

    async fn export_genesis(&self) -> Result<serde_json::Value, ModuleError> {
        let state = export_genesis(self)?;
        serde_json::to_value(state).map_err(|e| ModuleError::Internal(anyhow::Error::new(e)))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use realfin_core::{AccountCodec, CreatorOnly, MemStore};

    use super::*;
    use crate::modules::insurance::types::{Params, Policy};

    fn service() -> Insurance {
        let codec = AccountCodec::default();
        Insurance::new(
            Arc::new(MemStore::new()),
            Arc::new(codec.clone()),
            Arc::new(CreatorOnly),
            codec.module_account("gov"),
        )
    }

    fn policy(id: &str) -> Policy {
        Policy {
            creator: "rf1creator".to_string(),
            policy_id: id.to_string(),
            asset_symbol: "GOLD".to_string(),
            provider: "acme".to_string(),
            coverage_type: "theft".to_string(),
            coverage_percentage: "80".to_string(),
        }
    }

    #[test]
    fn import_then_export_is_canonical() {
        let svc = service();
        let state = GenesisState {
            params: Params::default(),
            // Deliberately unsorted; export must come back key-sorted.
            policies: vec![policy("b"), policy("a"), policy("c")],
        };

        init_genesis(&svc, &state).unwrap();
        let exported = export_genesis(&svc).unwrap();

        let ids: Vec<&str> = exported
            .policies
            .iter()
            .map(|p| p.policy_id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(exported.params, state.params);
    }

    #[tokio::test]
    async fn raw_section_round_trips_through_app_module() {
        let svc = service();
        let raw = serde_json::to_value(GenesisState {
            params: Params::default(),
            policies: vec![policy("p-0")],
        })
        .unwrap();

        svc.validate_genesis(&raw).unwrap();
        AppModule::init_genesis(&svc, raw.clone()).await.unwrap();

        let exported = AppModule::export_genesis(&svc).await.unwrap();
        assert_eq!(exported, raw);
    }

    #[test]
    fn undecodable_section_is_invalid_argument() {
        let svc = service();
        let raw = serde_json::json!({ "policies": "not-a-list" });
        assert!(matches!(
            svc.validate_genesis(&raw).unwrap_err(),
            ModuleError::InvalidArgument(_)
        ));
    }
}
