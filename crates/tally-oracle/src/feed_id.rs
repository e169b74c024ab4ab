//! Feed identifier validation.
//!
//! Legacy ids (numeric value `<= 100`) are accepted as-is. A content-addressed
//! id is only accepted together with the descriptor it was derived from:
//!
//! ```text
//! feed_id == BLAKE3(descriptor)
//! ```

use tally_crypto::blake3;
use tally_types::FeedId;

use crate::{OracleError, Result};

/// Derive the content-addressed id of a descriptor.
pub fn descriptor_id(descriptor: &[u8]) -> FeedId {
    FeedId::from_bytes(blake3::hash(descriptor))
}

/// Check that `descriptor` may accompany `feed_id`.
///
/// # Errors
///
/// - [`OracleError::IdentifierMismatch`] if `feed_id` is content-addressed and
///   is not the hash of `descriptor`
pub fn validate(feed_id: &FeedId, descriptor: &[u8]) -> Result<()> {
    if !feed_id.is_content_addressed() {
        return Ok(());
    }
    let descriptor_hash = descriptor_id(descriptor);
    if descriptor_hash != *feed_id {
        return Err(OracleError::IdentifierMismatch {
            feed_id: *feed_id,
            descriptor_hash,
        });
    }
    Ok(())
}
