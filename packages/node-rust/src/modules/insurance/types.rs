//! Record, parameter, and genesis types for the insurance module.

use realfin_core::ModuleError;
use serde::{Deserialize, Serialize};

/// Module name; also the key of the module's genesis section.
pub const MODULE_NAME: &str = "insurance";

/// Store prefix under which all policies live, keyed by `policy_id`.
pub const POLICY_KEY_PREFIX: &str = "policy/value/";

/// Store key of the module parameters singleton.
pub const PARAMS_KEY: &str = "insurance/params";

/// A coverage policy. Keyed by the caller-supplied `policy_id`.
///
/// `creator` is set from the signer at creation and never changes afterwards;
/// update and delete are gated on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    pub creator: String,
    pub policy_id: String,
    pub asset_symbol: String,
    pub provider: String,
    pub coverage_type: String,
    pub coverage_percentage: String,
}

/// Module parameters. Currently empty; the type anchors the
/// authority-gated update path and the params query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Params {}

impl Params {
    /// Validate parameter values. Nothing to check while the set is empty.
    ///
    /// # Errors
    ///
    /// None today; the signature anchors future parameter constraints.
    pub fn validate(&self) -> Result<(), ModuleError> {
        Ok(())
    }
}

/// Genesis section of the insurance module: parameters plus every policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisState {
    #[serde(default)]
    pub params: Params,
    #[serde(default)]
    pub policies: Vec<Policy>,
}

impl GenesisState {
    /// Validate the section without touching any store.
    ///
    /// # Errors
    ///
    /// [`ModuleError::InvalidArgument`] when two policies share a
    /// `policy_id`; otherwise whatever [`Params::validate`] reports.
    pub fn validate(&self) -> Result<(), ModuleError> {
        let mut seen = std::collections::HashSet::new();
        for policy in &self.policies {
            if !seen.insert(policy.policy_id.as_str()) {
                return Err(ModuleError::InvalidArgument(format!(
                    "duplicated index for policy {:?}",
                    policy.policy_id
                )));
            }
        }
        self.params.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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
    fn default_genesis_validates() {
        GenesisState::default().validate().unwrap();
    }

    #[test]
    fn duplicate_policy_ids_are_rejected() {
        let state = GenesisState {
            params: Params::default(),
            policies: vec![policy("0"), policy("1"), policy("0")],
        };
        let err = state.validate().unwrap_err();
        assert!(matches!(err, ModuleError::InvalidArgument(_)));
    }

    #[test]
    fn distinct_policy_ids_validate() {
        let state = GenesisState {
            params: Params::default(),
            policies: vec![policy("0"), policy("1")],
        };
        state.validate().unwrap();
    }
}
