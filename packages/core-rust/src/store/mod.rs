//! Keyed ordered storage for module state.
//!
//! Three layers, outermost first:
//!
//! - [`StoreMap`] / [`StoreItem`]: typed, prefix-scoped views that module
//!   handlers program against
//! - [`StoreEngine`]: the byte-keyed ordered mapping trait
//! - [`MemStore`]: the in-memory `BTreeMap` engine
//!
//! One engine backs a whole app; modules stay disjoint through their key
//! prefixes.

pub mod engine;
pub mod map;
pub mod memory;

pub use engine::{StoreEngine, StoreError};
pub use map::{StoreItem, StoreMap};
pub use memory::MemStore;
