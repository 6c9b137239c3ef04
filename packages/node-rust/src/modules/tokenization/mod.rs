//! Tokenization module: real-world assets keyed by `symbol`.

pub mod genesis;
pub mod msgs;
pub mod service;
pub mod simulation;
pub mod types;

pub use service::{Tokenization, TokenizationService};
pub use simulation::AssetSimulator;
pub use types::{Asset, GenesisState, Params, MODULE_NAME};
