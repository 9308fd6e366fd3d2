// Copyright 2023-2025 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

//! Fixtures shared by the unit tests: a fake enclave that produces quotes and
//! identity signatures, and an oracle that replays a scripted verdict.

use crate::quote::layout::{ATT_KEY_TYPE, MIN_QUOTE_LEN, MR_ENCLAVE, REPORT_DATA, VERSION};
use crate::quote::{
    identity_digest, LibraryStatus, OracleVerdict, QuoteVerificationOracle, SUPPLEMENTAL_DATA_SIZE,
};
use openssl::bn::{BigNum, BigNumContext};
use openssl::ec::{EcGroup, EcKey};
use openssl::ecdsa::EcdsaSig;
use openssl::nid::Nid;
use openssl::pkey::Private;
use serde_json::json;
use std::sync::Mutex;

/// Bytes appended after the report body, standing in for the quote's
/// signature data
const QUOTE_TAIL_LEN: usize = 64;

pub struct Enclave {
    key: EcKey<Private>,
}

impl Enclave {
    pub fn new() -> Self {
        let group = EcGroup::from_curve_name(Nid::X9_62_PRIME256V1).unwrap();

        Self {
            key: EcKey::generate(&group).unwrap(),
        }
    }

    /// The enclave key as an `sgx_ec256_public_t`
    pub fn report_data(&self) -> [u8; 64] {
        sgx_public_key(&self.key)
    }

    /// A v3 ECDSA quote over `measurement` carrying the enclave key in its
    /// report data
    pub fn quote(&self, measurement: [u8; 32]) -> Vec<u8> {
        let mut q = vec![0u8; MIN_QUOTE_LEN + QUOTE_TAIL_LEN];

        q[VERSION.offset..VERSION.end()].copy_from_slice(&3u16.to_le_bytes());
        q[ATT_KEY_TYPE.offset..ATT_KEY_TYPE.end()].copy_from_slice(&2u16.to_le_bytes());
        q[MR_ENCLAVE.offset..MR_ENCLAVE.end()].copy_from_slice(&measurement);
        q[REPORT_DATA.offset..REPORT_DATA.end()].copy_from_slice(&self.report_data());

        for (i, b) in q[MIN_QUOTE_LEN..].iter_mut().enumerate() {
            *b = i as u8;
        }

        q
    }

    /// Identity signature in the raw big-endian `r || s` form
    pub fn sign(&self, quote: &[u8], account: &[u8]) -> Vec<u8> {
        let sig = self.ecdsa(quote, account);

        let mut out = sig.r().to_vec_padded(32).unwrap();
        out.extend(sig.s().to_vec_padded(32).unwrap());
        out
    }

    /// Identity signature, DER encoded
    pub fn sign_der(&self, quote: &[u8], account: &[u8]) -> Vec<u8> {
        self.ecdsa(quote, account).to_der().unwrap()
    }

    fn ecdsa(&self, quote: &[u8], account: &[u8]) -> EcdsaSig {
        let digest = identity_digest(quote, account).unwrap();
        EcdsaSig::sign(&digest, &self.key).unwrap()
    }
}

/// Little-endian X then little-endian Y, as the SGX SDK lays out a P-256
/// public key
pub fn sgx_public_key(key: &EcKey<Private>) -> [u8; 64] {
    let mut ctx = BigNumContext::new().unwrap();
    let mut x = BigNum::new().unwrap();
    let mut y = BigNum::new().unwrap();

    key.public_key()
        .affine_coordinates_gfp(key.group(), &mut x, &mut y, &mut ctx)
        .unwrap();

    let mut out = [0u8; 64];
    for (dst, coord) in out.chunks_mut(32).zip([x, y]) {
        let mut le = coord.to_vec_padded(32).unwrap();
        le.reverse();
        dst.copy_from_slice(&le);
    }
    out
}

/// JSON body of an attestation request
pub fn request_body(quote: &[u8], account: &str, sig: &[u8]) -> String {
    json!({
        "sig": hex::encode(sig),
        "quote": hex::encode(quote),
        "account": account,
    })
    .to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleCall {
    pub quote: Vec<u8>,
    pub now: i64,
    pub supplemental_len: usize,
}

/// Oracle that returns a fixed answer and records how it was called
pub struct ScriptedOracle {
    supplemental_size: Result<u32, LibraryStatus>,
    verdict: Result<OracleVerdict, LibraryStatus>,
    calls: Mutex<Vec<OracleCall>>,
}

impl ScriptedOracle {
    fn with_verdict(verdict: Result<OracleVerdict, LibraryStatus>) -> Self {
        Self {
            supplemental_size: Ok(SUPPLEMENTAL_DATA_SIZE),
            verdict,
            calls: Mutex::new(vec![]),
        }
    }

    /// The library call succeeds with `outcome` as the `sgx_ql_qv_result_t`
    pub fn outcome(outcome: u32) -> Self {
        Self::with_verdict(Ok(OracleVerdict {
            outcome,
            collateral_expired: false,
        }))
    }

    /// The library call itself fails
    pub fn failing(status: LibraryStatus) -> Self {
        Self::with_verdict(Err(status))
    }

    pub fn with_supplemental_size(mut self, size: Result<u32, LibraryStatus>) -> Self {
        self.supplemental_size = size;
        self
    }

    pub fn with_collateral_expired(mut self) -> Self {
        if let Ok(v) = &mut self.verdict {
            v.collateral_expired = true;
        }
        self
    }

    pub fn calls(&self) -> Vec<OracleCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl QuoteVerificationOracle for ScriptedOracle {
    fn supplemental_data_size(&self) -> Result<u32, LibraryStatus> {
        self.supplemental_size
    }

    fn verify(
        &self,
        quote: &[u8],
        now: i64,
        supplemental: &mut [u8],
    ) -> Result<OracleVerdict, LibraryStatus> {
        self.calls.lock().unwrap().push(OracleCall {
            quote: quote.to_vec(),
            now,
            supplemental_len: supplemental.len(),
        });

        self.verdict
    }
}
