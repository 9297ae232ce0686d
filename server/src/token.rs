//! Challenge token derivation for anti-spoofing verification.
//!
//! Tokens are never stored per client. The generator keeps a single secret
//! for the lifetime of the server instance and recomputes the token for a
//! sender's address whenever one is issued or verified. This keeps memory
//! at O(1) with no cleanup or expiry logic, at the cost of accepting a
//! request from anyone who can both forge a source address and predict the
//! token for it.

use siphasher::sip128::{Hasher128, SipHasher24};
use std::hash::Hasher;

/// Derives per-address challenge tokens from a process-lifetime secret.
pub struct TokenGenerator {
    key0: u64,
    key1: u64,
}

impl TokenGenerator {
    /// Draws a fresh secret. Called exactly once, when the owning server is
    /// constructed; the secret is immutable afterwards and therefore needs
    /// no lock.
    pub fn new() -> Self {
        Self {
            key0: rand::random(),
            key1: rand::random(),
        }
    }

    /// Derives the token for a client address string.
    ///
    /// Deterministic for a given (secret, address) pair: the same address
    /// always yields the same token for the life of the secret, and distinct
    /// addresses disagree except on hash collisions.
    pub fn derive(&self, client_addr: &str) -> i32 {
        let mut hasher = SipHasher24::new_with_keys(self.key0, self.key1);
        hasher.write(client_addr.as_bytes());
        let digest = hasher.finish128();
        (digest.h1 ^ digest.h2) as i32
    }
}

impl Default for TokenGenerator {
    fn default() -> Self {
        Self::new()
    }
}
