//! Record, parameter, and genesis types for the tokenization module.

use realfin_core::ModuleError;
use serde::{Deserialize, Serialize};

/// Module name; also the key of the module's genesis section.
pub const MODULE_NAME: &str = "tokenization";

/// Store prefix under which all assets live, keyed by `symbol`.
pub const ASSET_KEY_PREFIX: &str = "asset/value/";

/// Store key of the module parameters singleton.
pub const PARAMS_KEY: &str = "tokenization/params";

/// A tokenized asset, keyed by its caller-supplied `symbol`. The `creator`
/// is fixed at creation and gates update/delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub creator: String,
    pub symbol: String,
    pub name: String,
    pub description: String,
    pub asset_type: String,
    pub metadata: String,
}

/// Module parameters. Currently empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Params {}

impl Params {
    /// Validate parameter values; nothing to check while the set is empty.
    ///
    /// # Errors
    ///
    /// None today.
    pub fn validate(&self) -> Result<(), ModuleError> {
        Ok(())
    }
}

/// Genesis section of the tokenization module.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisState {
    #[serde(default)]
    pub params: Params,
    #[serde(default)]
    pub assets: Vec<Asset>,
}

impl GenesisState {
    /// Reject duplicate symbols, then validate params.
    ///
    /// # Errors
    ///
    /// [`ModuleError::InvalidArgument`] on a duplicated `symbol`.
    pub fn validate(&self) -> Result<(), ModuleError> {
        let mut seen = std::collections::HashSet::new();
        for asset in &self.assets {
            if !seen.insert(asset.symbol.as_str()) {
                return Err(ModuleError::InvalidArgument(format!(
                    "duplicated index for asset {:?}",
                    asset.symbol
                )));
            }
        }
        self.params.validate()
    }
}
