//! Command and query handlers for the tokenization module.
//!
//! Same check-then-write shape as the insurance handlers: address codec,
//! existence check, ownership predicate, then exactly one store mutation.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use realfin_core::{
    paginate, AddressCodec, ModuleError, OwnershipPolicy, StoreEngine, StoreItem, StoreMap,
};
use tower::Service;

use super::msgs::{
    MsgCreateAsset, MsgCreateAssetResponse, MsgDeleteAsset, MsgDeleteAssetResponse,
    MsgUpdateAsset, MsgUpdateAssetResponse, MsgUpdateParams, MsgUpdateParamsResponse,
    QueryAllAssetRequest, QueryAllAssetResponse, QueryGetAssetRequest, QueryGetAssetResponse,
    QueryParamsRequest, QueryParamsResponse,
};
use super::types::{Asset, Params, ASSET_KEY_PREFIX, PARAMS_KEY};
use crate::runtime::operation::{Operation, OperationError, OperationKind, OperationResponse};

/// Tokenization module state machine: asset records plus the params
/// singleton.
pub struct Tokenization {
    assets: StoreMap<Asset>,
    params: StoreItem<Params>,
    codec: Arc<dyn AddressCodec>,
    ownership: Arc<dyn OwnershipPolicy>,
    authority: String,
}

impl Tokenization {
    /// Wires the module onto the shared engine under its own key prefixes.
    #[must_use]
    pub fn new(
        engine: Arc<dyn StoreEngine>,
        codec: Arc<dyn AddressCodec>,
        ownership: Arc<dyn OwnershipPolicy>,
        authority: String,
    ) -> Self {
        Self {
            assets: StoreMap::new(Arc::clone(&engine), ASSET_KEY_PREFIX),
            params: StoreItem::new(engine, PARAMS_KEY),
            codec,
            ownership,
            authority,
        }
    }

    /// The asset record store, for genesis and simulation plumbing.
    #[must_use]
    pub fn assets(&self) -> &StoreMap<Asset> {
        &self.assets
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

    /// Handle `MsgCreateAsset`.
    ///
    /// # Errors
    ///
    /// `InvalidAddress`, `AlreadyExists` on a live symbol, `Internal` on a
    /// storage fault.
    pub fn create_asset(&self, msg: &MsgCreateAsset) -> Result<MsgCreateAssetResponse, ModuleError> {
        self.check_signer(&msg.creator)?;

        if self.assets.has(&msg.symbol)? {
            return Err(ModuleError::AlreadyExists(format!("asset {:?}", msg.symbol)));
        }

        let asset = Asset {
            creator: msg.creator.clone(),
            symbol: msg.symbol.clone(),
            name: msg.name.clone(),
            description: msg.description.clone(),
            asset_type: msg.asset_type.clone(),
            metadata: msg.metadata.clone(),
        };
        self.assets.set(&asset.symbol, &asset)?;

        tracing::debug!(symbol = %msg.symbol, creator = %msg.creator, "asset created");
        Ok(MsgCreateAssetResponse {})
    }

    /// Handle `MsgUpdateAsset`: a full-record replace of the mutable fields.
    ///
    /// # Errors
    ///
    /// `InvalidAddress`, `NotFound`, `Unauthorized`.
    pub fn update_asset(&self, msg: &MsgUpdateAsset) -> Result<MsgUpdateAssetResponse, ModuleError> {
        self.check_signer(&msg.creator)?;

        let stored = self.assets.get(&msg.symbol)?;
        if !self.ownership.authorize(&stored.creator, &msg.creator) {
            return Err(ModuleError::Unauthorized("incorrect owner".to_string()));
        }

        // The stored creator survives the replace; it never changes.
        let asset = Asset {
            creator: stored.creator,
            symbol: msg.symbol.clone(),
            name: msg.name.clone(),
            description: msg.description.clone(),
            asset_type: msg.asset_type.clone(),
            metadata: msg.metadata.clone(),
        };
        self.assets.set(&asset.symbol, &asset)?;

        tracing::debug!(symbol = %msg.symbol, "asset updated");
        Ok(MsgUpdateAssetResponse {})
    }

    /// Handle `MsgDeleteAsset`.
    ///
    /// # Errors
    ///
    /// Same preconditions as update.
    pub fn delete_asset(&self, msg: &MsgDeleteAsset) -> Result<MsgDeleteAssetResponse, ModuleError> {
        self.check_signer(&msg.creator)?;

        let stored = self.assets.get(&msg.symbol)?;
        if !self.ownership.authorize(&stored.creator, &msg.creator) {
            return Err(ModuleError::Unauthorized("incorrect owner".to_string()));
        }

        self.assets.remove(&msg.symbol)?;

        tracing::debug!(symbol = %msg.symbol, "asset deleted");
        Ok(MsgDeleteAssetResponse {})
    }

    /// Handle `MsgUpdateParams`. Authority-gated; not wired into the routed
    /// operation surface.
    ///
    /// # Errors
    ///
    /// `InvalidAddress`, `Unauthorized` unless signed by the authority.
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

    /// Fetch a single asset verbatim.
    ///
    /// # Errors
    ///
    /// `NotFound` when the symbol is absent.
    pub fn get_asset(&self, req: &QueryGetAssetRequest) -> Result<QueryGetAssetResponse, ModuleError> {
        let asset = self.assets.get(&req.symbol)?;
        Ok(QueryGetAssetResponse { asset })
    }

    /// List assets in ascending symbol order per the paging directive.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for a contradictory or undecodable directive.
    pub fn list_asset(&self, req: &QueryAllAssetRequest) -> Result<QueryAllAssetResponse, ModuleError> {
        let page_req = req.pagination.clone().unwrap_or_default();
        let (items, pagination) = paginate(&self.assets, &page_req)?;
        Ok(QueryAllAssetResponse {
            asset: items.into_iter().map(|(_, v)| v).collect(),
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

/// Tower service adapter dispatching routed operations to [`Tokenization`].
#[derive(Clone)]
pub struct TokenizationService {
    inner: Arc<Tokenization>,
}

impl TokenizationService {
    #[must_use]
    pub fn new(inner: Arc<Tokenization>) -> Self {
        Self { inner }
    }
}

impl Service<Operation> for TokenizationService {
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
                OperationKind::CreateAsset(msg) => inner
                    .create_asset(&msg)
                    .map(|_| OperationResponse::Ack { call_id })?,
                OperationKind::UpdateAsset(msg) => inner
                    .update_asset(&msg)
                    .map(|_| OperationResponse::Ack { call_id })?,
                OperationKind::DeleteAsset(msg) => inner
                    .delete_asset(&msg)
                    .map(|_| OperationResponse::Ack { call_id })?,
                OperationKind::GetAsset(req) => inner
                    .get_asset(&req)
                    .map(|r| OperationResponse::Asset(Box::new(r.asset)))?,
                OperationKind::ListAsset(req) => {
                    inner.list_asset(&req).map(|r| OperationResponse::Assets {
                        items: r.asset,
                        page: r.pagination,
                    })?
                }
                OperationKind::TokenizationParams(req) => inner
                    .params(&req)
                    .map(|r| OperationResponse::TokenizationParams(r.params))?,
                _ => return Err(OperationError::WrongModule),
            };
            Ok(resp)
        })
    }
}
