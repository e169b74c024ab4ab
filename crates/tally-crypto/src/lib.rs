//! # tally-crypto
//!
//! Hashing primitives for the Tally oracle.
//!
//! ## Modules
//!
//! - [`blake3`] — BLAKE3 content hashing and domain-separated key derivation

pub mod blake3;
