//! Command and query handlers for the insurance module.
//!
//! Both handler families sit directly on the policy [`StoreMap`]; neither
//! depends on the other. Commands follow the shared check-then-write shape:
//! signer through the address codec, existence check, ownership predicate,
//! then exactly one `set`/`remove`.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use realfin_core::{
    paginate, AddressCodec, ModuleError, OwnershipPolicy, StoreEngine, StoreItem, StoreMap,
};
use tower::Service;

use super::msgs::{
    MsgCreatePolicy, MsgCreatePolicyResponse, MsgDeletePolicy, MsgDeletePolicyResponse,
    MsgUpdateParams, MsgUpdateParamsResponse, MsgUpdatePolicy, MsgUpdatePolicyResponse,
    QueryAllPolicyRequest, QueryAllPolicyResponse, QueryGetPolicyRequest, QueryGetPolicyResponse,
    QueryParamsRequest, QueryParamsResponse,
};
use super::types::{Params, Policy, PARAMS_KEY, POLICY_KEY_PREFIX};
use crate::runtime::operation::{Operation, OperationError, OperationKind, OperationResponse};

/// Insurance module state machine: policy records plus the params singleton.
pub struct Insurance {
    policies: StoreMap<Policy>,
    params: StoreItem<Params>,
    codec: Arc<dyn AddressCodec>,
    ownership: Arc<dyn OwnershipPolicy>,
    authority: String,
}

impl Insurance {
    /// Wires the module onto the shared engine under its own key prefixes.
    #[must_use]
    pub fn new(
        engine: Arc<dyn StoreEngine>,
        codec: Arc<dyn AddressCodec>,
        ownership: Arc<dyn OwnershipPolicy>,
        authority: String,
    ) -> Self {
        Self {
            policies: StoreMap::new(Arc::clone(&engine), POLICY_KEY_PREFIX),
            params: StoreItem::new(engine, PARAMS_KEY),
            codec,
            ownership,
            authority,
        }
    }

    /// The policy record store, for genesis and simulation plumbing.
    #[must_use]
    pub fn policies(&self) -> &StoreMap<Policy> {
        &self.policies
    }

    pub(crate) fn params_item(&self) -> &StoreItem<Params> {
        &self.params
    }

    fn check_signer(&self, address: &str) -> Result<(), ModuleError> {
        self.codec
            .string_to_bytes(address)
            .map(|_| ())
            .map_err(|e| ModuleError::InvalidAddress(e.to_string()))
    }

    // ----- commands -----

    /// Handle `MsgCreatePolicy`.
    ///
    /// # Errors
    ///
    /// `InvalidAddress` for a malformed signer, `AlreadyExists` when the
    /// `policy_id` is live, `Internal` on a storage fault.
    pub fn create_policy(
        &self,
        msg: &MsgCreatePolicy,
    ) -> Result<MsgCreatePolicyResponse, ModuleError> {
        self.check_signer(&msg.creator)?;

        if self.policies.has(&msg.policy_id)? {
            return Err(ModuleError::AlreadyExists(format!(
                "policy {:?}",
                msg.policy_id
            )));
        }

        let policy = Policy {
            creator: msg.creator.clone(),
            policy_id: msg.policy_id.clone(),
            asset_symbol: msg.asset_symbol.clone(),
            provider: msg.provider.clone(),
            coverage_type: msg.coverage_type.clone(),
            coverage_percentage: msg.coverage_percentage.clone(),
        };
        self.policies.set(&policy.policy_id, &policy)?;

        tracing::debug!(policy_id = %msg.policy_id, creator = %msg.creator, "policy created");
        Ok(MsgCreatePolicyResponse {})
    }

    /// Handle `MsgUpdatePolicy`: a full-record replace of the mutable fields.
    ///
    /// # Errors
    ///
    /// `InvalidAddress`, `NotFound` for an absent id, `Unauthorized` when the
    /// ownership predicate rejects the signer.
    pub fn update_policy(
        &self,
        msg: &MsgUpdatePolicy,
    ) -> Result<MsgUpdatePolicyResponse, ModuleError> {
        self.check_signer(&msg.creator)?;

        let stored = self.policies.get(&msg.policy_id)?;
        if !self.ownership.authorize(&stored.creator, &msg.creator) {
            return Err(ModuleError::Unauthorized("incorrect owner".to_string()));
        }

        // The stored creator survives the replace; it never changes.
        let policy = Policy {
            creator: stored.creator,
            policy_id: msg.policy_id.clone(),
            asset_symbol: msg.asset_symbol.clone(),
            provider: msg.provider.clone(),
            coverage_type: msg.coverage_type.clone(),
            coverage_percentage: msg.coverage_percentage.clone(),
        };
        self.policies.set(&policy.policy_id, &policy)?;

        tracing::debug!(policy_id = %msg.policy_id, "policy updated");
        Ok(MsgUpdatePolicyResponse {})
    }

    /// Handle `MsgDeletePolicy`.
    ///
    /// # Errors
    ///
    /// Same preconditions as update; the record is removed on success.
    pub fn delete_policy(
        &self,
        msg: &MsgDeletePolicy,
    ) -> Result<MsgDeletePolicyResponse, ModuleError> {
        self.check_signer(&msg.creator)?;

        let stored = self.policies.get(&msg.policy_id)?;
        if !self.ownership.authorize(&stored.creator, &msg.creator) {
            return Err(ModuleError::Unauthorized("incorrect owner".to_string()));
        }

        self.policies.remove(&msg.policy_id)?;

        tracing::debug!(policy_id = %msg.policy_id, "policy deleted");
        Ok(MsgDeletePolicyResponse {})
    }

    /// Handle `MsgUpdateParams`. Authority-gated; deliberately not wired
    /// into the routed operation surface.
    ///
    /// # Errors
    ///
    /// `InvalidAddress` for a malformed authority string, `Unauthorized`
    /// unless the signer is the configured authority.
    pub fn update_params(
        &self,
        msg: &MsgUpdateParams,
    ) -> Result<MsgUpdateParamsResponse, ModuleError> {
        self.check_signer(&msg.authority)?;
        if msg.authority != self.authority {
            return Err(ModuleError::Unauthorized(format!(
                "invalid authority; expected {}, got {}",
                self.authority, msg.authority
            )));
        }

        msg.params.validate()?;
        self.params.set(&msg.params)?;
        Ok(MsgUpdateParamsResponse {})
    }

    // ----- queries -----

    /// Fetch a single policy verbatim.
    ///
    /// # Errors
    ///
    /// `NotFound` when the id is absent.
    pub fn get_policy(
        &self,
        req: &QueryGetPolicyRequest,
    ) -> Result<QueryGetPolicyResponse, ModuleError> {
        let policy = self.policies.get(&req.policy_id)?;
        Ok(QueryGetPolicyResponse { policy })
    }

    /// List policies in ascending id order per the paging directive.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for a contradictory or undecodable directive.
    pub fn list_policy(
        &self,
        req: &QueryAllPolicyRequest,
    ) -> Result<QueryAllPolicyResponse, ModuleError> {
        let page_req = req.pagination.clone().unwrap_or_default();
        let (items, pagination) = paginate(&self.policies, &page_req)?;
        Ok(QueryAllPolicyResponse {
            policy: items.into_iter().map(|(_, v)| v).collect(),
            pagination,
        })
    }

    /// Current module parameters; defaults when never set.
    ///
    /// # Errors
    ///
    /// Only on a storage fault.
    pub fn params(&self, _req: &QueryParamsRequest) -> Result<QueryParamsResponse, ModuleError> {
        Ok(QueryParamsResponse {
            params: self.params.get()?.unwrap_or_default(),
        })
    }
}

/// Tower service adapter dispatching routed operations to [`Insurance`].
#[derive(Clone)]
pub struct InsuranceService {
    inner: Arc<Insurance>,
}

impl InsuranceService {
    #[must_use]
    pub fn new(inner: Arc<Insurance>) -> Self {
        Self { inner }
    }
}

impl Service<Operation> for InsuranceService {
    type Response = OperationResponse;
    type Error = OperationError;
    type Future = Pin<Box<dyn Future<Output = Result<OperationResponse, OperationError>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, op: Operation) -> Self::Future {
        let inner = Arc::clone(&self.inner);
        let call_id = op.ctx.call_id;
        Box::pin(async move {
            let resp = match op.kind {
                OperationKind::CreatePolicy(msg) => inner
                    .create_policy(&msg)
                    .map(|_| OperationResponse::Ack { call_id })?,
                OperationKind::UpdatePolicy(msg) => inner
                    .update_policy(&msg)
                    .map(|_| OperationResponse::Ack { call_id })?,
                OperationKind::DeletePolicy(msg) => inner
                    .delete_policy(&msg)
                    .map(|_| OperationResponse::Ack { call_id })?,
                OperationKind::GetPolicy(req) => inner
                    .get_policy(&req)
                    .map(|r| OperationResponse::Policy(Box::new(r.policy)))?,
                OperationKind::ListPolicy(req) => {
                    inner.list_policy(&req).map(|r| OperationResponse::Policies {
                        items: r.policy,
                        page: r.pagination,
                    })?
                }
                OperationKind::InsuranceParams(req) => inner
                    .params(&req)
                    .map(|r| OperationResponse::InsuranceParams(r.params))?,
                _ => return Err(OperationError::WrongModule),
            };
            Ok(resp)
        })
    }
}
