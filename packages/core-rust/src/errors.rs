//! Module-level error taxonomy shared by all command and query handlers.
//!
//! Every handler failure is one of the typed variants below. Failures are
//! terminal for the triggering call: nothing is retried internally and no
//! error is swallowed. Unexpected storage faults travel through
//! [`ModuleError::Internal`] as an [`anyhow::Error`].

use crate::store::StoreError;

/// Failure of a single command or query against a module.
#[derive(Debug, thiserror::Error)]
pub enum ModuleError {
    /// The signer (or authority) address string failed address-codec validation.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Create was attempted on a key that is already live.
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// The targeted key is absent from the record store.
    #[error("not found: {0}")]
    NotFound(String),

    /// The signer does not pass the ownership predicate for the stored record.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The request envelope or its parameters are malformed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Unexpected storage or codec fault. The enclosing transaction is rolled
    /// back by the caller.
    #[error("internal: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ModuleError {
    /// Short stable label for the variant, for log fields and outcome tallies.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidAddress(_) => "invalid_address",
            Self::AlreadyExists(_) => "already_exists",
            Self::NotFound(_) => "not_found",
            Self::Unauthorized(_) => "unauthorized",
            Self::InvalidArgument(_) => "invalid_argument",
            Self::Internal(_) => "internal",
        }
    }
}

impl From<StoreError> for ModuleError {
    /// A missing key surfaces as [`ModuleError::NotFound`]; every other store
    /// failure is an internal fault.
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(key) => Self::NotFound(key),
            other => Self::Internal(anyhow::Error::new(other)),
        }
    }
}
