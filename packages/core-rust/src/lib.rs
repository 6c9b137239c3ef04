//! Realfin Core — keyed ordered storage, pagination, address codec, and the
//! app-module framework contract.

pub mod address;
pub mod errors;
pub mod module;
pub mod pagination;
pub mod store;

pub use address::{AccountCodec, AddressCodec, AddressError, ACCOUNT_PAYLOAD_LEN};
pub use errors::ModuleError;
pub use module::{AppModule, CreatorOnly, OwnershipPolicy};
pub use pagination::{paginate, PageRequest, PageResponse, DEFAULT_PAGE_LIMIT};
pub use store::{MemStore, StoreEngine, StoreError, StoreItem, StoreMap};

#[cfg(test)]
mod tests {
    #[test]
    fn crate_loads() {
        // Empty body: if this test runs, the crate compiles and loads.
    }
}
