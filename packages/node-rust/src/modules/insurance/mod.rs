//! Insurance module: coverage policies keyed by `policy_id`.
//!
//! Command and query handlers live in [`service`], genesis import/export in
//! [`genesis`], and the fuzz-style request generator in [`simulation`].

pub mod genesis;
pub mod msgs;
pub mod service;
pub mod simulation;
pub mod types;

pub use service::{Insurance, InsuranceService};
pub use simulation::PolicySimulator;
pub use types::{GenesisState, Params, Policy, MODULE_NAME};
