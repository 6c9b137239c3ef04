//! Transport seam: turns raw request envelopes into typed operations.
//!
//! The transport (out of scope here) delivers requests as JSON envelopes of
//! the shape `{ "module": ..., "type": ..., "body": { ... } }`. The
//! [`OperationService`] decodes them into [`Operation`] values and assigns
//! each a process-unique call id. Absent or malformed envelopes fail with
//! `InvalidArgument` before any module is touched.

use std::sync::atomic::{AtomicU64, Ordering};

use realfin_core::ModuleError;
use serde::de::DeserializeOwned;

use super::operation::{Operation, OperationContext, OperationKind};
use crate::modules::insurance::msgs as insurance_msgs;
use crate::modules::tokenization::msgs as tokenization_msgs;
use crate::modules::{insurance, tokenization};

/// Classifies request envelopes and mints operation contexts.
pub struct OperationService {
    call_id_counter: AtomicU64,
}

impl OperationService {
    /// Creates a new `OperationService`. Call ids start at 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            call_id_counter: AtomicU64::new(1),
        }
    }

    fn next_call_id(&self) -> u64 {
        self.call_id_counter.fetch_add(1, Ordering::Relaxed)
    }

    /// Wrap an already-typed operation kind with a fresh context.
    #[must_use]
    pub fn operation(&self, kind: OperationKind) -> Operation {
        Operation {
            ctx: OperationContext {
                call_id: self.next_call_id(),
            },
            kind,
        }
    }

    /// Classify a raw envelope into a typed operation.
    ///
    /// # Errors
    ///
    /// [`ModuleError::InvalidArgument`] when the envelope is absent, not an
    /// object, missing its `module`/`type` fields, carries an undecodable
    /// body, or names an operation no module serves.
    pub fn classify(
        &self,
        envelope: Option<&serde_json::Value>,
    ) -> Result<Operation, ModuleError> {
        let envelope =
            envelope.ok_or_else(|| ModuleError::InvalidArgument("empty request".to_string()))?;
        let obj = envelope.as_object().ok_or_else(|| {
            ModuleError::InvalidArgument("request envelope must be an object".to_string())
        })?;

        let module = obj
            .get("module")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| {
                ModuleError::InvalidArgument("request envelope missing module".to_string())
            })?;
        let op_type = obj
            .get("type")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| {
                ModuleError::InvalidArgument("request envelope missing type".to_string())
            })?;
        // Params queries carry no body; default to an empty object.
        let body = obj
            .get("body")
            .cloned()
            .unwrap_or_else(|| serde_json::Value::Object(serde_json::Map::new()));

        let kind = match (module, op_type) {
            (insurance::types::MODULE_NAME, "create_policy") => {
                OperationKind::CreatePolicy(decode::<insurance_msgs::MsgCreatePolicy>(
                    op_type, body,
                )?)
            }
            (insurance::types::MODULE_NAME, "update_policy") => {
                OperationKind::UpdatePolicy(decode::<insurance_msgs::MsgUpdatePolicy>(
                    op_type, body,
                )?)
            }
            (insurance::types::MODULE_NAME, "delete_policy") => {
                OperationKind::DeletePolicy(decode::<insurance_msgs::MsgDeletePolicy>(
                    op_type, body,
                )?)
            }
            (insurance::types::MODULE_NAME, "get_policy") => OperationKind::GetPolicy(decode::<
                insurance_msgs::QueryGetPolicyRequest,
            >(
                op_type, body
            )?),
            (insurance::types::MODULE_NAME, "list_policy") => OperationKind::ListPolicy(
                decode::<insurance_msgs::QueryAllPolicyRequest>(op_type, body)?,
            ),
            (insurance::types::MODULE_NAME, "params") => OperationKind::InsuranceParams(
                decode::<insurance_msgs::QueryParamsRequest>(op_type, body)?,
            ),
            (tokenization::types::MODULE_NAME, "create_asset") => {
                OperationKind::CreateAsset(decode::<tokenization_msgs::MsgCreateAsset>(
                    op_type, body,
                )?)
            }
            (tokenization::types::MODULE_NAME, "update_asset") => {
                OperationKind::UpdateAsset(decode::<tokenization_msgs::MsgUpdateAsset>(
                    op_type, body,
                )?)
            }
            (tokenization::types::MODULE_NAME, "delete_asset") => {
                OperationKind::DeleteAsset(decode::<tokenization_msgs::MsgDeleteAsset>(
                    op_type, body,
                )?)
            }
            (tokenization::types::MODULE_NAME, "get_asset") => OperationKind::GetAsset(decode::<
                tokenization_msgs::QueryGetAssetRequest,
            >(
                op_type, body
            )?),
            (tokenization::types::MODULE_NAME, "list_asset") => OperationKind::ListAsset(
                decode::<tokenization_msgs::QueryAllAssetRequest>(op_type, body)?,
            ),
            (tokenization::types::MODULE_NAME, "params") => OperationKind::TokenizationParams(
                decode::<tokenization_msgs::QueryParamsRequest>(op_type, body)?,
            ),
            _ => {
                return Err(ModuleError::InvalidArgument(format!(
                    "unroutable operation {module}/{op_type}"
                )))
            }
        };

        Ok(self.operation(kind))
    }
}

impl Default for OperationService {
    fn default() -> Self {
        Self::new()
    }
}

fn decode<T: DeserializeOwned>(op_type: &str, body: serde_json::Value) -> Result<T, ModuleError> {
    serde_json::from_value(body)
        .map_err(|e| ModuleError::InvalidArgument(format!("malformed {op_type} body: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn call_ids_are_unique_and_increasing() {
        let ops = OperationService::new();
        let a = ops.operation(OperationKind::InsuranceParams(
            insurance_msgs::QueryParamsRequest {},
        ));
        let b = ops.operation(OperationKind::InsuranceParams(
            insurance_msgs::QueryParamsRequest {},
        ));
        assert!(b.ctx.call_id > a.ctx.call_id);
    }

    #[test]
    fn classifies_a_create_policy_envelope() {
        let ops = OperationService::new();
        let envelope = serde_json::json!({
            "module": "insurance",
            "type": "create_policy",
            "body": {
                "creator": "rf1someone",
                "policy_id": "p-1",
                "asset_symbol": "GOLD",
                "provider": "acme",
                "coverage_type": "theft",
                "coverage_percentage": "80",
            },
        });

        let op = ops.classify(Some(&envelope)).unwrap();
        match op.kind {
            OperationKind::CreatePolicy(msg) => {
                assert_eq!(msg.policy_id, "p-1");
                assert_eq!(msg.creator, "rf1someone");
            }
            other => panic!("unexpected kind: {other:?}"),
        }
    }

    #[test]
    fn params_query_needs_no_body() {
        let ops = OperationService::new();
        let envelope = serde_json::json!({ "module": "tokenization", "type": "params" });

        let op = ops.classify(Some(&envelope)).unwrap();
        assert!(matches!(op.kind, OperationKind::TokenizationParams(_)));
    }

    #[test]
    fn absent_envelope_is_invalid_argument() {
        let ops = OperationService::new();
        assert!(matches!(
            ops.classify(None).unwrap_err(),
            ModuleError::InvalidArgument(_)
        ));
    }

    #[test]
    fn non_object_envelope_is_invalid_argument() {
        let ops = OperationService::new();
        let envelope = serde_json::json!("just a string");
        assert!(matches!(
            ops.classify(Some(&envelope)).unwrap_err(),
            ModuleError::InvalidArgument(_)
        ));
    }

    #[test]
    fn undecodable_body_is_invalid_argument() {
        let ops = OperationService::new();
        let envelope = serde_json::json!({
            "module": "insurance",
            "type": "get_policy",
            "body": { "policy_id": 42 },
        });
        assert!(matches!(
            ops.classify(Some(&envelope)).unwrap_err(),
            ModuleError::InvalidArgument(_)
        ));
    }

    #[test]
    fn unroutable_type_is_invalid_argument() {
        let ops = OperationService::new();
        let envelope = serde_json::json!({
            "module": "insurance",
            "type": "burn_policy",
            "body": {},
        });
        let err = ops.classify(Some(&envelope)).unwrap_err();
        assert!(matches!(err, ModuleError::InvalidArgument(_)));
        assert!(err.to_string().contains("unroutable"));
    }
}
