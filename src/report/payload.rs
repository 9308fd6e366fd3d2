// Copyright 2023-2025 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use parity_scale_codec::{Encode, Output};

/// Public key of the party vouching for a registration, with the same variant
/// indices as Substrate's `MultiSigner`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode)]
pub enum MultiSigner {
    #[codec(index = 0)]
    Ed25519([u8; 32]),
    #[codec(index = 1)]
    Sr25519([u8; 32]),
    #[codec(index = 2)]
    Ecdsa([u8; 33]),
}

impl MultiSigner {
    /// The key, without the variant index
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            MultiSigner::Ed25519(k) | MultiSigner::Sr25519(k) => k,
            MultiSigner::Ecdsa(k) => k,
        }
    }
}

/// The registration payload expected by the ledger:
///
/// ```text
/// pub struct RegisterPayload<Public, AccountId> {
///     code: Vec<u8>,
///     who: AccountId,
///     pubkey: Vec<u8>,
///     public: Public,
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterPayload {
    /// MRENCLAVE of the attested enclave
    pub code: Vec<u8>,
    /// Raw account identifier
    pub who: Vec<u8>,
    /// Report data of the quote, i.e., the enclave's public key
    pub pubkey: Vec<u8>,
    /// The relay's public key
    pub public: MultiSigner,
}

// `who` is a fixed-size `AccountId` on the ledger side, so it goes out
// without a length prefix
impl Encode for RegisterPayload {
    fn size_hint(&self) -> usize {
        self.code.size_hint() + self.who.len() + self.pubkey.size_hint() + self.public.size_hint()
    }

    fn encode_to<T: Output + ?Sized>(&self, dest: &mut T) {
        self.code.encode_to(dest);
        dest.write(&self.who);
        self.pubkey.encode_to(dest);
        self.public.encode_to(dest);
    }
}

/// A payload together with the relay's signature over its encoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedReport {
    pub payload: RegisterPayload,
    pub signature: [u8; 64],
}
