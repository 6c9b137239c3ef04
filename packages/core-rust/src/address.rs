//! Account address codec.
//!
//! Addresses are rendered as `<hrp>1<hex(payload || checksum)>` where the
//! payload is a fixed 20 bytes and the checksum is the first 4 bytes of
//! SHA-256 over `hrp || payload`. The codec validates and normalizes the
//! string form; handlers surface any failure as
//! [`ModuleError::InvalidAddress`](crate::errors::ModuleError::InvalidAddress).

use sha2::{Digest, Sha256};

/// Byte length of an account address payload.
pub const ACCOUNT_PAYLOAD_LEN: usize = 20;

/// Byte length of the checksum suffix.
const CHECKSUM_LEN: usize = 4;

/// Failure to parse or render an account address.
#[derive(Debug, thiserror::Error)]
pub enum AddressError {
    #[error("empty address string")]
    Empty,

    #[error("missing '1' separator")]
    MissingSeparator,

    #[error("wrong prefix: expected {expected:?}, got {actual:?}")]
    WrongPrefix { expected: String, actual: String },

    #[error("payload is not lowercase hex: {0}")]
    Encoding(String),

    #[error("wrong payload length: expected {expected} bytes, got {actual}")]
    Length { expected: usize, actual: usize },

    #[error("checksum mismatch")]
    Checksum,
}

/// Validates and normalizes account address strings.
///
/// Boundary collaborator for every command handler: the signer string must
/// round-trip through the codec before any state is read or written.
///
/// Used as `Arc<dyn AddressCodec>`.
pub trait AddressCodec: Send + Sync {
    /// Parse an address string into its raw payload bytes.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError`] for any malformed input: wrong prefix, bad
    /// encoding, wrong length, or checksum mismatch.
    fn string_to_bytes(&self, address: &str) -> Result<Vec<u8>, AddressError>;

    /// Render raw payload bytes as an address string.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::Length`] if the payload is not exactly
    /// [`ACCOUNT_PAYLOAD_LEN`] bytes.
    fn bytes_to_string(&self, bytes: &[u8]) -> Result<String, AddressError>;
}

/// The house [`AddressCodec`]: human-readable prefix, hex payload, SHA-256
/// checksum suffix.
#[derive(Debug, Clone)]
pub struct AccountCodec {
    hrp: String,
}

impl AccountCodec {
    /// Creates a codec for the given human-readable prefix.
    #[must_use]
    pub fn new(hrp: impl Into<String>) -> Self {
        Self { hrp: hrp.into() }
    }

    /// The human-readable prefix this codec accepts.
    #[must_use]
    pub fn hrp(&self) -> &str {
        &self.hrp
    }

    /// Derives the well-known address of a named module account.
    ///
    /// The payload is the first 20 bytes of SHA-256 over the module name, so
    /// the address is deterministic for a given (hrp, name) pair.
    #[must_use]
    pub fn module_account(&self, name: &str) -> String {
        let digest = Sha256::digest(name.as_bytes());
        self.render(&digest[..ACCOUNT_PAYLOAD_LEN])
    }

    fn checksum(&self, payload: &[u8]) -> [u8; CHECKSUM_LEN] {
        let mut hasher = Sha256::new();
        hasher.update(self.hrp.as_bytes());
        hasher.update(payload);
        let digest = hasher.finalize();
        let mut out = [0u8; CHECKSUM_LEN];
        out.copy_from_slice(&digest[..CHECKSUM_LEN]);
        out
    }

    /// Renders a payload known to be [`ACCOUNT_PAYLOAD_LEN`] bytes.
    fn render(&self, payload: &[u8]) -> String {
        let mut body = Vec::with_capacity(ACCOUNT_PAYLOAD_LEN + CHECKSUM_LEN);
        body.extend_from_slice(payload);
        body.extend_from_slice(&self.checksum(payload));
        format!("{}1{}", self.hrp, hex::encode(body))
    }
}

impl Default for AccountCodec {
    /// The chain default prefix, `rf`.
    fn default() -> Self {
        Self::new("rf")
    }
}

impl AddressCodec for AccountCodec {
    fn string_to_bytes(&self, address: &str) -> Result<Vec<u8>, AddressError> {
        if address.is_empty() {
            return Err(AddressError::Empty);
        }
        let (hrp, body) = address
            .split_once('1')
            .ok_or(AddressError::MissingSeparator)?;
        if hrp != self.hrp {
            return Err(AddressError::WrongPrefix {
                expected: self.hrp.clone(),
                actual: hrp.to_string(),
            });
        }
        if body.bytes().any(|b| b.is_ascii_uppercase()) {
            return Err(AddressError::Encoding("uppercase hex digit".to_string()));
        }
        let raw = hex::decode(body).map_err(|e| AddressError::Encoding(e.to_string()))?;
        if raw.len() != ACCOUNT_PAYLOAD_LEN + CHECKSUM_LEN {
            return Err(AddressError::Length {
                expected: ACCOUNT_PAYLOAD_LEN + CHECKSUM_LEN,
                actual: raw.len(),
            });
        }
        let (payload, checksum) = raw.split_at(ACCOUNT_PAYLOAD_LEN);
        if checksum != self.checksum(payload) {
            return Err(AddressError::Checksum);
        }
        Ok(payload.to_vec())
    }

    fn bytes_to_string(&self, bytes: &[u8]) -> Result<String, AddressError> {
        if bytes.len() != ACCOUNT_PAYLOAD_LEN {
            return Err(AddressError::Length {
                expected: ACCOUNT_PAYLOAD_LEN,
                actual: bytes.len(),
            });
        }
        Ok(self.render(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_preserves_payload() {
        let codec = AccountCodec::default();
        let payload = [7u8; ACCOUNT_PAYLOAD_LEN];

        let address = codec.bytes_to_string(&payload).unwrap();
        assert!(address.starts_with("rf1"));

        let decoded = codec.string_to_bytes(&address).unwrap();
        assert_eq!(decoded, payload);
    }

    #[test]
    fn rejects_empty_string() {
        let codec = AccountCodec::default();
        assert!(matches!(
            codec.string_to_bytes(""),
            Err(AddressError::Empty)
        ));
    }

    #[test]
    fn rejects_wrong_prefix() {
        let codec = AccountCodec::default();
        let other = AccountCodec::new("cosmos");
        let address = other.bytes_to_string(&[1u8; ACCOUNT_PAYLOAD_LEN]).unwrap();

        assert!(matches!(
            codec.string_to_bytes(&address),
            Err(AddressError::WrongPrefix { .. })
        ));
    }

    #[test]
    fn rejects_flipped_checksum() {
        let codec = AccountCodec::default();
        let address = codec.bytes_to_string(&[9u8; ACCOUNT_PAYLOAD_LEN]).unwrap();

        // Flip the final hex digit.
        let mut chars: Vec<char> = address.chars().collect();
        let last = chars.len() - 1;
        chars[last] = if chars[last] == '0' { '1' } else { '0' };
        let tampered: String = chars.into_iter().collect();

        assert!(matches!(
            codec.string_to_bytes(&tampered),
            Err(AddressError::Checksum)
        ));
    }

    #[test]
    fn rejects_truncated_payload() {
        let codec = AccountCodec::default();
        let err = codec.string_to_bytes("rf1abcdef").unwrap_err();
        assert!(matches!(err, AddressError::Length { .. }));
    }

    #[test]
    fn rejects_uppercase_hex() {
        let codec = AccountCodec::default();
        let address = codec.bytes_to_string(&[3u8; ACCOUNT_PAYLOAD_LEN]).unwrap();
        let upper = address.to_uppercase();
        assert!(codec.string_to_bytes(&upper).is_err());
    }

    #[test]
    fn bytes_to_string_rejects_wrong_length() {
        let codec = AccountCodec::default();
        assert!(matches!(
            codec.bytes_to_string(&[0u8; 19]),
            Err(AddressError::Length {
                expected: ACCOUNT_PAYLOAD_LEN,
                actual: 19
            })
        ));
    }

    #[test]
    fn module_account_is_deterministic_and_valid() {
        let codec = AccountCodec::default();
        let a = codec.module_account("params");
        let b = codec.module_account("params");
        assert_eq!(a, b);
        assert!(codec.string_to_bytes(&a).is_ok());

        let c = codec.module_account("insurance");
        assert_ne!(a, c);
    }
}
