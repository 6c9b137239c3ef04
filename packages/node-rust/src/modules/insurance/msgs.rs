//! Command and query messages for the insurance module.
//!
//! Command responses are deliberately empty: success is acknowledged at the
//! operation layer, and failures travel as typed errors.

use realfin_core::{PageRequest, PageResponse};
use serde::{Deserialize, Serialize};

use super::types::{Params, Policy};

/// Create a new policy under a fresh `policy_id`. Signed by `creator`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgCreatePolicy {
    pub creator: String,
    pub policy_id: String,
    pub asset_symbol: String,
    pub provider: String,
    pub coverage_type: String,
    pub coverage_percentage: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgCreatePolicyResponse {}

/// Replace every mutable field of an existing policy. Signed by `creator`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgUpdatePolicy {
    pub creator: String,
    pub policy_id: String,
    pub asset_symbol: String,
    pub provider: String,
    pub coverage_type: String,
    pub coverage_percentage: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgUpdatePolicyResponse {}

/// Remove an existing policy. Signed by `creator`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgDeletePolicy {
    pub creator: String,
    pub policy_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgDeletePolicyResponse {}

/// Replace the module parameters. Only the configured authority may sign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgUpdateParams {
    pub authority: String,
    pub params: Params,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgUpdateParamsResponse {}

/// Fetch a single policy by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryGetPolicyRequest {
    pub policy_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryGetPolicyResponse {
    pub policy: Policy,
}

/// List policies in ascending `policy_id` order, one page at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryAllPolicyRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PageRequest>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryAllPolicyResponse {
    pub policy: Vec<Policy>,
    pub pagination: PageResponse,
}

/// Fetch the current module parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParamsRequest {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParamsResponse {
    pub params: Params,
}
