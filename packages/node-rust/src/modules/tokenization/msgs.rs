//! Command and query messages for the tokenization module.

use realfin_core::{PageRequest, PageResponse};
use serde::{Deserialize, Serialize};

use super::types::{Asset, Params};

/// Create a new asset under a fresh `symbol`. Signed by `creator`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgCreateAsset {
    pub creator: String,
    pub symbol: String,
    pub name: String,
    pub description: String,
    pub asset_type: String,
    pub metadata: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgCreateAssetResponse {}

/// Replace every mutable field of an existing asset. Signed by `creator`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgUpdateAsset {
    pub creator: String,
    pub symbol: String,
    pub name: String,
    pub description: String,
    pub asset_type: String,
    pub metadata: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgUpdateAssetResponse {}

/// Remove an existing asset. Signed by `creator`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgDeleteAsset {
    pub creator: String,
    pub symbol: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgDeleteAssetResponse {}

/// Replace the module parameters. Only the configured authority may sign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgUpdateParams {
    pub authority: String,
    pub params: Params,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgUpdateParamsResponse {}

/// Fetch a single asset by symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryGetAssetRequest {
    pub symbol: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryGetAssetResponse {
    pub asset: Asset,
}

/// List assets in ascending `symbol` order, one page at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryAllAssetRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PageRequest>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryAllAssetResponse {
    pub asset: Vec<Asset>,
    pub pagination: PageResponse,
}

/// Fetch the current module parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParamsRequest {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParamsResponse {
    pub params: Params,
}
