//! Randomized operation generation for the tokenization module.
//!
//! Same storm shape as the insurance simulator: mostly valid mutations
//! against live state, a deliberate tail of invalid requests, deterministic
//! under a seeded RNG.

use rand::Rng;
use realfin_core::{ModuleError, PageRequest};

use super::msgs::{
    MsgCreateAsset, MsgDeleteAsset, MsgUpdateAsset, QueryAllAssetRequest, QueryGetAssetRequest,
};
use super::service::Tokenization;
use super::types::Asset;
use crate::runtime::operation::OperationKind;

const ASSET_TYPES: &[&str] = &["commodity", "bond", "real-estate", "invoice"];
const NAMES: &[&str] = &["Gold bar", "Grain lot", "Office tower", "Receivable"];

/// Generates randomized tokenization operations from a pool of accounts.
pub struct AssetSimulator {
    accounts: Vec<String>,
}

impl AssetSimulator {
    /// The account pool must be non-empty.
    #[must_use]
    pub fn new(accounts: Vec<String>) -> Self {
        assert!(!accounts.is_empty(), "simulator needs at least one account");
        Self { accounts }
    }

    fn pick_account<R: Rng>(&self, r: &mut R) -> String {
        self.accounts[r.random_range(0..self.accounts.len())].clone()
    }

    fn pick<R: Rng>(r: &mut R, pool: &[&str]) -> String {
        pool[r.random_range(0..pool.len())].to_string()
    }

    fn fresh_create<R: Rng>(&self, r: &mut R, creator: String) -> MsgCreateAsset {
        MsgCreateAsset {
            creator,
            symbol: format!("T{}", r.random_range(0..u32::MAX)),
            name: Self::pick(r, NAMES),
            description: format!("lot {}", r.random_range(0..10_000u32)),
            asset_type: Self::pick(r, ASSET_TYPES),
            metadata: "{}".to_string(),
        }
    }

    fn pick_owned<R: Rng>(
        &self,
        r: &mut R,
        svc: &Tokenization,
    ) -> Result<Option<Asset>, ModuleError> {
        let mut owned = Vec::new();
        svc.assets().walk(|_, asset: Asset| {
            if self.accounts.contains(&asset.creator) {
                owned.push(asset);
            }
            false
        })?;
        if owned.is_empty() {
            return Ok(None);
        }
        let idx = r.random_range(0..owned.len());
        Ok(owned.into_iter().nth(idx))
    }

    /// Draw the next randomized operation against the current module state.
    ///
    /// # Errors
    ///
    /// Only on a storage fault while inspecting live state.
    pub fn next_op<R: Rng>(
        &self,
        r: &mut R,
        svc: &Tokenization,
    ) -> Result<OperationKind, ModuleError> {
        let roll = r.random_range(0..100u32);
        let op = match roll {
            0..=34 => {
                let creator = self.pick_account(r);
                OperationKind::CreateAsset(self.fresh_create(r, creator))
            }
            35..=54 => match self.pick_owned(r, svc)? {
                Some(stored) => OperationKind::UpdateAsset(MsgUpdateAsset {
                    creator: stored.creator,
                    symbol: stored.symbol,
                    name: Self::pick(r, NAMES),
                    description: format!("lot {}", r.random_range(0..10_000u32)),
                    asset_type: Self::pick(r, ASSET_TYPES),
                    metadata: "{}".to_string(),
                }),
                None => {
                    let creator = self.pick_account(r);
                    OperationKind::CreateAsset(self.fresh_create(r, creator))
                }
            },
            55..=69 => match self.pick_owned(r, svc)? {
                Some(stored) => OperationKind::DeleteAsset(MsgDeleteAsset {
                    creator: stored.creator,
                    symbol: stored.symbol,
                }),
                None => {
                    let creator = self.pick_account(r);
                    OperationKind::CreateAsset(self.fresh_create(r, creator))
                }
            },
            70..=79 => {
                let symbol = match self.pick_owned(r, svc)? {
                    Some(stored) if r.random_bool(0.8) => stored.symbol,
                    _ => format!("T{}", r.random_range(0..u32::MAX)),
                };
                OperationKind::GetAsset(QueryGetAssetRequest { symbol })
            }
            80..=89 => OperationKind::ListAsset(QueryAllAssetRequest {
                pagination: Some(PageRequest {
                    limit: r.random_range(1..=5),
                    count_total: r.random_bool(0.5),
                    ..PageRequest::default()
                }),
            }),
            // Malformed signer: must fail InvalidAddress.
            90..=93 => {
                OperationKind::CreateAsset(self.fresh_create(r, "not-an-address".to_string()))
            }
            // Absent key: must fail NotFound.
            94..=96 => OperationKind::DeleteAsset(MsgDeleteAsset {
                creator: self.pick_account(r),
                symbol: format!("ghost-{}", r.random_range(0..u32::MAX)),
            }),
            // Foreign signer or duplicate create: Unauthorized / AlreadyExists.
            _ => match self.pick_owned(r, svc)? {
                Some(stored) if self.accounts.len() > 1 => {
                    let mut signer = self.pick_account(r);
                    while signer == stored.creator {
                        signer = self.pick_account(r);
                    }
                    OperationKind::DeleteAsset(MsgDeleteAsset {
                        creator: signer,
                        symbol: stored.symbol,
                    })
                }
                Some(stored) => {
                    let mut msg = self.fresh_create(r, stored.creator.clone());
                    msg.symbol = stored.symbol;
                    OperationKind::CreateAsset(msg)
                }
                None => {
                    OperationKind::CreateAsset(self.fresh_create(r, "not-an-address".to_string()))
                }
            },
        };
        Ok(op)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use realfin_core::{AccountCodec, AddressCodec, CreatorOnly, MemStore, ACCOUNT_PAYLOAD_LEN};

    use super::*;

    #[test]
    fn generation_is_deterministic_under_a_seed() {
        let codec = AccountCodec::default();
        let accounts: Vec<String> = (1..=3u8)
            .map(|i| codec.bytes_to_string(&[i; ACCOUNT_PAYLOAD_LEN]).unwrap())
            .collect();
        let svc = Tokenization::new(
            Arc::new(MemStore::new()),
            Arc::new(codec.clone()),
            Arc::new(CreatorOnly),
            codec.module_account("gov"),
        );
        let sim = AssetSimulator::new(accounts);

        let draw = |seed: u64| -> Vec<&'static str> {
            let mut r = StdRng::seed_from_u64(seed);
            (0..50)
                .map(|_| sim.next_op(&mut r, &svc).unwrap().label())
                .collect()
        };

        assert_eq!(draw(9), draw(9));
    }
}
