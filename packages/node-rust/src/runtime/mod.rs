//! Module runtime: config, registry, operation surface, router, and the
//! [`App`] wiring it all together.
//!
//! Concurrency model: one writer at a time. Every command dispatch runs to
//! completion under the app's command gate, so two commands never interleave
//! against the store and a check-then-write pair inside a handler is atomic
//! with respect to other commands. Queries skip the gate: they are read-only
//! against the engine's lock-protected state and observe only fully applied
//! commands.

pub mod classify;
pub mod config;
pub mod genesis;
pub mod operation;
pub mod registry;
pub mod router;

use std::sync::Arc;

use realfin_core::{
    AccountCodec, AddressCodec, AppModule, CreatorOnly, MemStore, ModuleError, OwnershipPolicy,
    StoreEngine,
};
use tokio::sync::Mutex;
use tower::{Service, ServiceExt};

pub use classify::OperationService;
pub use config::RuntimeConfig;
pub use genesis::GenesisDoc;
pub use operation::{Operation, OperationError, OperationKind, OperationResponse};
pub use registry::ModuleRegistry;
pub use router::ModuleRouter;

use crate::modules::insurance::{self, Insurance, InsuranceService};
use crate::modules::tokenization::{self, Tokenization, TokenizationService};

/// A fully wired Realfin app: shared store engine, both modules, the module
/// registry, and the operation router.
pub struct App {
    codec: Arc<AccountCodec>,
    authority: String,
    registry: ModuleRegistry,
    ops: OperationService,
    router: Mutex<ModuleRouter>,
    command_gate: Mutex<()>,
    insurance: Arc<Insurance>,
    tokenization: Arc<Tokenization>,
}

impl App {
    /// Build an app on a fresh in-memory engine.
    #[must_use]
    pub fn new(config: &RuntimeConfig) -> Self {
        let codec = Arc::new(AccountCodec::new(config.hrp.clone()));
        let authority = config
            .authority
            .clone()
            .unwrap_or_else(|| codec.module_account("gov"));
        let engine: Arc<dyn StoreEngine> = Arc::new(MemStore::new());
        let ownership: Arc<dyn OwnershipPolicy> = Arc::new(CreatorOnly);

        let insurance = Arc::new(Insurance::new(
            Arc::clone(&engine),
            Arc::clone(&codec) as Arc<dyn AddressCodec>,
            Arc::clone(&ownership),
            authority.clone(),
        ));
        let tokenization = Arc::new(Tokenization::new(
            engine,
            Arc::clone(&codec) as Arc<dyn AddressCodec>,
            ownership,
            authority.clone(),
        ));

        let registry = ModuleRegistry::new();
        registry.register(Arc::clone(&insurance) as Arc<dyn AppModule>);
        registry.register(Arc::clone(&tokenization) as Arc<dyn AppModule>);

        let mut router = ModuleRouter::new();
        router.register(
            insurance::MODULE_NAME,
            InsuranceService::new(Arc::clone(&insurance)),
        );
        router.register(
            tokenization::MODULE_NAME,
            TokenizationService::new(Arc::clone(&tokenization)),
        );

        Self {
            codec,
            authority,
            registry,
            ops: OperationService::new(),
            router: Mutex::new(router),
            command_gate: Mutex::new(()),
            insurance,
            tokenization,
        }
    }

    /// The insurance module handlers.
    #[must_use]
    pub fn insurance(&self) -> &Insurance {
        &self.insurance
    }

    /// The tokenization module handlers.
    #[must_use]
    pub fn tokenization(&self) -> &Tokenization {
        &self.tokenization
    }

    /// The app's address codec.
    #[must_use]
    pub fn codec(&self) -> &AccountCodec {
        &self.codec
    }

    /// The configured params-update authority address.
    #[must_use]
    pub fn authority(&self) -> &str {
        &self.authority
    }

    /// Wrap a typed operation kind with a fresh call id.
    #[must_use]
    pub fn operation(&self, kind: OperationKind) -> Operation {
        self.ops.operation(kind)
    }

    /// Classify a raw transport envelope into a typed operation.
    ///
    /// # Errors
    ///
    /// See [`OperationService::classify`].
    pub fn classify(
        &self,
        envelope: Option<&serde_json::Value>,
    ) -> Result<Operation, ModuleError> {
        self.ops.classify(envelope)
    }

    /// Dispatch one operation to its module service.
    ///
    /// Commands are serialized behind the command gate; queries go straight
    /// through. A failed command changes no state: the first failing check
    /// returns before the single store mutation.
    ///
    /// # Errors
    ///
    /// [`OperationError`] from the router or the handling module.
    pub async fn dispatch(&self, op: Operation) -> Result<OperationResponse, OperationError> {
        let call_id = op.ctx.call_id;
        let label = op.kind.label();

        let _gate = if op.kind.is_command() {
            Some(self.command_gate.lock().await)
        } else {
            None
        };

        let fut = {
            let mut router = self.router.lock().await;
            ServiceExt::ready(&mut *router).await?.call(op)
        };
        let result = fut.await;

        match &result {
            Ok(_) => tracing::debug!(call_id, op = label, "operation ok"),
            Err(err) => tracing::debug!(call_id, op = label, error = %err, "operation failed"),
        }
        result
    }

    /// The genesis document an empty chain starts from.
    ///
    /// # Errors
    ///
    /// Propagates a module's serialization fault.
    pub fn default_genesis(&self) -> Result<GenesisDoc, ModuleError> {
        self.registry.default_document()
    }

    /// Validate a genesis document without touching any store.
    ///
    /// # Errors
    ///
    /// See [`ModuleRegistry::validate_document`].
    pub fn validate_genesis(&self, doc: &GenesisDoc) -> Result<(), ModuleError> {
        self.registry.validate_document(doc)
    }

    /// Import a genesis document. Run once, at app start.
    ///
    /// # Errors
    ///
    /// See [`ModuleRegistry::init_genesis`].
    pub async fn init_genesis(&self, doc: &GenesisDoc) -> Result<(), ModuleError> {
        self.registry.init_genesis(doc).await
    }

    /// Export the current state as a genesis document.
    ///
    /// # Errors
    ///
    /// See [`ModuleRegistry::export_genesis`].
    pub async fn export_genesis(&self) -> Result<GenesisDoc, ModuleError> {
        self.registry.export_genesis().await
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(&RuntimeConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use realfin_core::{PageRequest, ACCOUNT_PAYLOAD_LEN};

    use super::*;
    use crate::modules::insurance::msgs::QueryAllPolicyRequest;
    use crate::modules::insurance::PolicySimulator;
    use crate::modules::tokenization::msgs::QueryAllAssetRequest;
    use crate::modules::tokenization::AssetSimulator;

    fn accounts(app: &App, n: u8) -> Vec<String> {
        (1..=n)
            .map(|i| {
                app.codec()
                    .bytes_to_string(&[i; ACCOUNT_PAYLOAD_LEN])
                    .unwrap()
            })
            .collect()
    }

    #[tokio::test]
    async fn envelope_to_ack_end_to_end() {
        let app = App::default();
        let alice = accounts(&app, 1).remove(0);

        let envelope = serde_json::json!({
            "module": "insurance",
            "type": "create_policy",
            "body": {
                "creator": alice,
                "policy_id": "p-1",
                "asset_symbol": "GOLD",
                "provider": "acme",
                "coverage_type": "theft",
                "coverage_percentage": "80",
            },
        });
        let op = app.classify(Some(&envelope)).unwrap();
        let resp = app.dispatch(op).await.unwrap();
        assert!(matches!(resp, OperationResponse::Ack { .. }));

        let get = serde_json::json!({
            "module": "insurance",
            "type": "get_policy",
            "body": { "policy_id": "p-1" },
        });
        let op = app.classify(Some(&get)).unwrap();
        match app.dispatch(op).await.unwrap() {
            OperationResponse::Policy(policy) => assert_eq!(policy.creator, alice),
            other => panic!("unexpected response: {other:?}"),
        }
    }

    #[tokio::test]
    async fn module_errors_surface_through_dispatch() {
        let app = App::default();
        let alice = accounts(&app, 1).remove(0);

        let create = serde_json::json!({
            "module": "tokenization",
            "type": "create_asset",
            "body": {
                "creator": alice,
                "symbol": "GOLD",
                "name": "Gold bar",
                "description": "1kg",
                "asset_type": "commodity",
                "metadata": "{}",
            },
        });
        let op = app.classify(Some(&create)).unwrap();
        app.dispatch(op).await.unwrap();

        let op = app.classify(Some(&create)).unwrap();
        let err = app.dispatch(op).await.unwrap_err();
        assert!(matches!(
            err,
            OperationError::Module(ModuleError::AlreadyExists(_))
        ));
    }

    #[tokio::test]
    async fn genesis_import_export_round_trips() {
        let app = App::default();
        let alice = accounts(&app, 1).remove(0);

        let mut doc = GenesisDoc::new();
        doc.insert(
            "insurance".to_string(),
            serde_json::json!({
                "params": {},
                "policies": [
                    {
                        "creator": alice,
                        "policy_id": "b",
                        "asset_symbol": "GOLD",
                        "provider": "acme",
                        "coverage_type": "theft",
                        "coverage_percentage": "80",
                    },
                    {
                        "creator": alice,
                        "policy_id": "a",
                        "asset_symbol": "OIL",
                        "provider": "initech",
                        "coverage_type": "fire",
                        "coverage_percentage": "50",
                    },
                ],
            }),
        );

        app.validate_genesis(&doc).unwrap();
        app.init_genesis(&doc).await.unwrap();

        let exported = app.export_genesis().await.unwrap();
        let policies = exported["insurance"]["policies"].as_array().unwrap();
        let ids: Vec<&str> = policies
            .iter()
            .map(|p| p["policy_id"].as_str().unwrap())
            .collect();
        // Export is canonical: ascending key order regardless of import order.
        assert_eq!(ids, vec!["a", "b"]);
        assert!(exported.contains_key("tokenization"));
    }

    #[tokio::test]
    async fn duplicate_genesis_keys_fail_validation() {
        let app = App::default();
        let alice = accounts(&app, 1).remove(0);

        let policy = serde_json::json!({
            "creator": alice,
            "policy_id": "0",
            "asset_symbol": "GOLD",
            "provider": "acme",
            "coverage_type": "theft",
            "coverage_percentage": "80",
        });
        let mut doc = GenesisDoc::new();
        doc.insert(
            "insurance".to_string(),
            serde_json::json!({ "params": {}, "policies": [policy, policy] }),
        );

        assert!(matches!(
            app.validate_genesis(&doc).unwrap_err(),
            ModuleError::InvalidArgument(_)
        ));
    }

    #[tokio::test]
    async fn randomized_storm_preserves_invariants() {
        let app = App::default();
        let pool = accounts(&app, 5);
        let policy_sim = PolicySimulator::new(pool.clone());
        let asset_sim = AssetSimulator::new(pool.clone());
        let mut rng = StdRng::seed_from_u64(0xBEEF);

        let mut failures = 0usize;
        for round in 0..400u32 {
            let kind = if round % 2 == 0 {
                policy_sim.next_op(&mut rng, app.insurance()).unwrap()
            } else {
                asset_sim.next_op(&mut rng, app.tokenization()).unwrap()
            };
            let op = app.operation(kind);
            if app.dispatch(op).await.is_err() {
                failures += 1;
            }
        }
        // The deliberate invalid tail guarantees some failures.
        assert!(failures > 0);

        // Every surviving policy is owned by the pool and the listing agrees
        // with a full walk.
        let mut policy_count = 0u64;
        app.insurance()
            .policies()
            .walk(|_, policy| {
                assert!(pool.contains(&policy.creator));
                policy_count += 1;
                false
            })
            .unwrap();
        let listed = app
            .insurance()
            .list_policy(&QueryAllPolicyRequest {
                pagination: Some(PageRequest {
                    limit: 100_000,
                    count_total: true,
                    ..PageRequest::default()
                }),
            })
            .unwrap();
        assert_eq!(listed.policy.len() as u64, policy_count);
        assert_eq!(listed.pagination.total, Some(policy_count));

        let mut asset_count = 0u64;
        app.tokenization()
            .assets()
            .walk(|_, asset| {
                assert!(pool.contains(&asset.creator));
                asset_count += 1;
                false
            })
            .unwrap();
        let listed = app
            .tokenization()
            .list_asset(&QueryAllAssetRequest {
                pagination: Some(PageRequest {
                    limit: 100_000,
                    count_total: true,
                    ..PageRequest::default()
                }),
            })
            .unwrap();
        assert_eq!(listed.asset.len() as u64, asset_count);
        assert_eq!(listed.pagination.total, Some(asset_count));
    }
}
