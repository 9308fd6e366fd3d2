// Copyright 2023-2025 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use super::errors::Error;
use serde::Deserialize;

/// JSON body of `POST /attestation/report`
#[serde_with::serde_as]
#[derive(Deserialize)]
struct RawRequest {
    /// Signature over `SHA-256(quote || account)`, hex encoded
    #[serde_as(as = "serde_with::hex::Hex")]
    sig: Vec<u8>,

    /// SGX ECDSA quote, hex encoded
    #[serde_as(as = "serde_with::hex::Hex")]
    quote: Vec<u8>,

    /// Account identifier, hex encoded
    account: String,
}

/// A decoded attestation bundle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttestationRequest {
    /// The account identifier as submitted, i.e., hex text.  This is what the
    /// enclave signs.
    pub account_id: String,
    /// The decoded account identifier
    pub account: Vec<u8>,
    pub quote: Vec<u8>,
    pub signature: Vec<u8>,
}

impl AttestationRequest {
    pub fn from_json(body: &str) -> Result<Self, Error> {
        let raw: RawRequest =
            serde_json::from_str(body).map_err(|e| Error::Decode(e.to_string()))?;

        let account =
            hex::decode(&raw.account).map_err(|e| Error::Decode(format!("account: {e}")))?;

        Ok(Self {
            account_id: raw.account,
            account,
            quote: raw.quote,
            signature: raw.sig,
        })
    }
}
