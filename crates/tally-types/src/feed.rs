//! Feed identifiers.
//!
//! A feed is named by an opaque 32-byte key, read as a big-endian unsigned
//! integer when classifying it:
//!
//! - **Legacy**: value `<= 100`. Small numeric ids from the first generation
//!   of feeds; accepted without further validation.
//! - **Content-addressed**: value `> 100`. Must equal the hash of a descriptor
//!   supplied alongside any call that references it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_with::{hex::Hex, serde_as};

use crate::{TypesError, LEGACY_FEED_ID_MAX};

/// Class of a feed identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeedClass {
    /// Numeric value `<= 100`.
    Legacy,
    /// Hash of a feed descriptor.
    ContentAddressed,
}

/// A 32-byte feed identifier.
#[serde_as]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FeedId(#[serde_as(as = "Hex")] [u8; 32]);

impl FeedId {
    /// Wrap raw identifier bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Encode a numeric id as a big-endian 32-byte key.
    pub fn from_u64(n: u64) -> Self {
        let mut bytes = [0u8; 32];
        bytes[24..].copy_from_slice(&n.to_be_bytes());
        Self(bytes)
    }

    /// Raw identifier bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Numeric value of the id if it fits in a `u64`.
    pub fn as_u64(&self) -> Option<u64> {
        if self.0[..24].iter().any(|b| *b != 0) {
            return None;
        }
        let mut low = [0u8; 8];
        low.copy_from_slice(&self.0[24..]);
        Some(u64::from_be_bytes(low))
    }

    /// Classify the id by its numeric value.
    pub fn class(&self) -> FeedClass {
        match self.as_u64() {
            Some(n) if n <= LEGACY_FEED_ID_MAX => FeedClass::Legacy,
            _ => FeedClass::ContentAddressed,
        }
    }

    /// Whether the id must be accompanied by its descriptor.
    pub fn is_content_addressed(&self) -> bool {
        self.class() == FeedClass::ContentAddressed
    }
}

impl fmt::Display for FeedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for FeedId {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::decode_32(s).map(Self)
    }
}
