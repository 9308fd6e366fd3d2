// Copyright 2023-2025 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use super::errors::Error;
use schnorrkel::{signing_context, ExpansionMode, Keypair, MiniSecretKey, PublicKey, Signature};
use std::fmt;

/// Signing context shared with the ledger's sr25519 verifier
const SIGNING_CONTEXT: &[u8] = b"substrate";

pub const SEED_LEN: usize = 32;
pub const PUBLIC_KEY_LEN: usize = 32;
pub const SIGNATURE_LEN: usize = 64;

/// The relay's sr25519 key pair.  Built once at startup and never modified.
pub struct ServiceKeyPair {
    keypair: Keypair,
}

impl ServiceKeyPair {
    /// Derive the key pair from a 32-byte mini secret key, expanded the same
    /// way Substrate does (Ed25519 mode)
    pub fn from_seed(seed: &[u8; SEED_LEN]) -> Result<Self, Error> {
        let mini = MiniSecretKey::from_bytes(seed).map_err(|e| Error::Key(e.to_string()))?;

        Ok(Self {
            keypair: mini.expand_to_keypair(ExpansionMode::Ed25519),
        })
    }

    /// Same as [`ServiceKeyPair::from_seed`], with the seed given as 64 hex
    /// characters
    pub fn from_hex_seed(seed: &str) -> Result<Self, Error> {
        Self::from_seed(&parse_seed(seed)?)
    }

    pub fn public_key(&self) -> [u8; PUBLIC_KEY_LEN] {
        self.keypair.public.to_bytes()
    }

    pub fn public_hex(&self) -> String {
        hex::encode(self.public_key())
    }

    /// Sign `msg`.  sr25519 signatures are randomised, so signing the same
    /// message twice yields different (equally valid) signatures.
    pub fn sign(&self, msg: &[u8]) -> [u8; SIGNATURE_LEN] {
        self.keypair
            .sign(signing_context(SIGNING_CONTEXT).bytes(msg))
            .to_bytes()
    }
}

impl fmt::Debug for ServiceKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceKeyPair")
            .field("public", &self.public_hex())
            .finish_non_exhaustive()
    }
}

/// Check an sr25519 signature made with the relay's signing context
pub fn verify_signature(public: &[u8; PUBLIC_KEY_LEN], msg: &[u8], sig: &[u8]) -> bool {
    let (Ok(public), Ok(sig)) = (PublicKey::from_bytes(public), Signature::from_bytes(sig)) else {
        return false;
    };

    public
        .verify(signing_context(SIGNING_CONTEXT).bytes(msg), &sig)
        .is_ok()
}

/// Parse a seed given as exactly 64 hex characters
pub fn parse_seed(seed: &str) -> Result<[u8; SEED_LEN], Error> {
    if seed.len() != 2 * SEED_LEN {
        return Err(Error::Key(format!(
            "seed must be {} hex characters, got {}",
            2 * SEED_LEN,
            seed.len()
        )));
    }

    let mut out = [0u8; SEED_LEN];
    hex::decode_to_slice(seed, &mut out).map_err(|e| Error::Key(format!("seed: {e}")))?;

    Ok(out)
}
