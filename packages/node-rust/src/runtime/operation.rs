//! Typed operation surface: context, routed variants, responses, and errors.
//!
//! An [`Operation`] is one command or query addressed to a module, as handed
//! over by the transport seam (see [`classify`](super::classify)). The
//! target module is derived from the variant, so a mis-routed operation is
//! detectable at the receiving service.

use realfin_core::{ModuleError, PageResponse};

use crate::modules::insurance::msgs as insurance_msgs;
use crate::modules::insurance::types::Policy;
use crate::modules::tokenization::msgs as tokenization_msgs;
use crate::modules::tokenization::types::Asset;
use crate::modules::{insurance, tokenization};

/// Context carried with every operation through the router.
#[derive(Debug, Clone)]
pub struct OperationContext {
    /// Process-unique id assigned at classification time.
    pub call_id: u64,
}

/// One routed command or query.
#[derive(Debug, Clone)]
pub struct Operation {
    pub ctx: OperationContext,
    pub kind: OperationKind,
}

/// Routed message and query variants, one per externally visible operation.
#[derive(Debug, Clone)]
pub enum OperationKind {
    // ----- insurance -----
    CreatePolicy(insurance_msgs::MsgCreatePolicy),
    UpdatePolicy(insurance_msgs::MsgUpdatePolicy),
    DeletePolicy(insurance_msgs::MsgDeletePolicy),
    GetPolicy(insurance_msgs::QueryGetPolicyRequest),
    ListPolicy(insurance_msgs::QueryAllPolicyRequest),
    InsuranceParams(insurance_msgs::QueryParamsRequest),

    // ----- tokenization -----
    CreateAsset(tokenization_msgs::MsgCreateAsset),
    UpdateAsset(tokenization_msgs::MsgUpdateAsset),
    DeleteAsset(tokenization_msgs::MsgDeleteAsset),
    GetAsset(tokenization_msgs::QueryGetAssetRequest),
    ListAsset(tokenization_msgs::QueryAllAssetRequest),
    TokenizationParams(tokenization_msgs::QueryParamsRequest),
}

impl OperationKind {
    /// Name of the module this operation is addressed to.
    #[must_use]
    pub fn module(&self) -> &'static str {
        match self {
            Self::CreatePolicy(_)
            | Self::UpdatePolicy(_)
            | Self::DeletePolicy(_)
            | Self::GetPolicy(_)
            | Self::ListPolicy(_)
            | Self::InsuranceParams(_) => insurance::types::MODULE_NAME,
            Self::CreateAsset(_)
            | Self::UpdateAsset(_)
            | Self::DeleteAsset(_)
            | Self::GetAsset(_)
            | Self::ListAsset(_)
            | Self::TokenizationParams(_) => tokenization::types::MODULE_NAME,
        }
    }

    /// Whether this operation mutates state. Commands run under the app's
    /// single-writer gate; queries do not.
    #[must_use]
    pub fn is_command(&self) -> bool {
        matches!(
            self,
            Self::CreatePolicy(_)
                | Self::UpdatePolicy(_)
                | Self::DeletePolicy(_)
                | Self::CreateAsset(_)
                | Self::UpdateAsset(_)
                | Self::DeleteAsset(_)
        )
    }

    /// Short stable label for log fields and outcome tallies.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::CreatePolicy(_) => "create_policy",
            Self::UpdatePolicy(_) => "update_policy",
            Self::DeletePolicy(_) => "delete_policy",
            Self::GetPolicy(_) => "get_policy",
            Self::ListPolicy(_) => "list_policy",
            Self::InsuranceParams(_) => "insurance_params",
            Self::CreateAsset(_) => "create_asset",
            Self::UpdateAsset(_) => "update_asset",
            Self::DeleteAsset(_) => "delete_asset",
            Self::GetAsset(_) => "get_asset",
            Self::ListAsset(_) => "list_asset",
            Self::TokenizationParams(_) => "tokenization_params",
        }
    }
}

/// Successful response from a module service.
///
/// Command responses are empty in the message schema, so commands are
/// acknowledged with the call id alone.
#[derive(Debug, Clone)]
pub enum OperationResponse {
    /// A command applied cleanly.
    Ack { call_id: u64 },
    Policy(Box<Policy>),
    Policies {
        items: Vec<Policy>,
        page: PageResponse,
    },
    InsuranceParams(insurance::types::Params),
    Asset(Box<Asset>),
    Assets {
        items: Vec<Asset>,
        page: PageResponse,
    },
    TokenizationParams(tokenization::types::Params),
}

/// Errors surfaced by the operation router and module services.
#[derive(Debug, thiserror::Error)]
pub enum OperationError {
    /// No module is registered under the operation's target name.
    #[error("unknown module: {name}")]
    UnknownModule { name: String },

    /// A module service received an operation addressed to another module.
    #[error("operation routed to wrong module")]
    WrongModule,

    /// The module handler itself failed.
    #[error(transparent)]
    Module(#[from] ModuleError),
}
