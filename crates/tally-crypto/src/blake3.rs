//! BLAKE3 hashing for the Tally oracle.
//!
//! Two modes are used:
//!
//! - [`hash`] — Pure hashing: content-addressed feed identifiers are the hash
//!   of the feed descriptor bytes
//! - [`derive_key`] — Key derivation under a registered context string:
//!   deterministic account addresses for the oracle itself and for labelled
//!   principals in local deployments
//!
//! Only the context strings in [`contexts`] may be passed to [`derive_key`].

/// Registered BLAKE3 context strings.
pub mod contexts {
    /// Default token account of an oracle deployment.
    pub const ORACLE_ACCOUNT: &str = "Tally v1 oracle-account";
    /// Addresses derived from human-readable labels.
    pub const PRINCIPAL_LABEL: &str = "Tally v1 principal-label";
}

/// Compute the BLAKE3 hash of the input data.
pub fn hash(data: &[u8]) -> [u8; 32] {
    *::blake3::hash(data).as_bytes()
}

/// Derive 32 bytes using BLAKE3's key derivation mode.
///
/// # Arguments
///
/// * `context` - A registered context string (must start with "Tally v1 ")
/// * `key_material` - The input key material
pub fn derive_key(context: &str, key_material: &[u8]) -> [u8; 32] {
    let mut out = [0u8; 32];
    let mut hasher = ::blake3::Hasher::new_derive_key(context);
    hasher.update(key_material);
    out.copy_from_slice(hasher.finalize().as_bytes());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_prefix() {
        for ctx in [contexts::ORACLE_ACCOUNT, contexts::PRINCIPAL_LABEL] {
            assert!(
                ctx.starts_with("Tally v1 "),
                "Context string '{ctx}' has wrong prefix"
            );
        }
    }

    #[test]
    fn test_hash_empty_vector() {
        assert_eq!(
            hex::encode(hash(b"")),
            "af1349b9f5f9a1a6a0404dea36dcc9499bcb25c9adc112b7cc9a93cae41f3262"
        );
    }

    #[test]
    fn test_hash_different_inputs() {
        assert_ne!(hash(b"This is a test"), hash(b"This is a test."));
    }

    #[test]
    fn test_derive_key_deterministic() {
        let a = derive_key(contexts::PRINCIPAL_LABEL, b"reporter-1");
        let b = derive_key(contexts::PRINCIPAL_LABEL, b"reporter-1");
        assert_eq!(a, b);
    }

    #[test]
    fn test_derive_key_separates_contexts() {
        let a = derive_key(contexts::PRINCIPAL_LABEL, b"oracle");
        let b = derive_key(contexts::ORACLE_ACCOUNT, b"oracle");
        assert_ne!(a, b);
        assert_ne!(a, hash(b"oracle"));
    }
}
