// Copyright 2023-2025 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use super::errors::Error;
use super::layout::Quote;
use openssl::bn::BigNum;
use openssl::ec::{EcGroup, EcKey};
use openssl::ecdsa::EcdsaSig;
use openssl::error::ErrorStack;
use openssl::hash::{Hasher, MessageDigest};
use openssl::nid::Nid;
use openssl::pkey::Public;

pub(crate) const COORD_LEN: usize = 32;
const RAW_SIG_LEN: usize = 2 * COORD_LEN;

/// Check that the holder of the P-256 key embedded in the quote's report data
/// signed `SHA-256(quote || account)`.
///
/// `account` is the account identifier exactly as the client submitted it
/// (i.e., its hex text), which is what the enclave signs.  `signature` is
/// either the 64-byte big-endian `r || s` form or DER.
pub fn verify_identity(quote: &Quote, account: &[u8], signature: &[u8]) -> Result<(), Error> {
    let digest = identity_digest(quote.as_bytes(), account)?;

    let key = enclave_key(&quote.report_data())?;

    let sig = parse_signature(signature)?;

    let ok = sig
        .verify(&digest, &key)
        .map_err(|e| Error::SignatureInvalid(format!("ECDSA verification: {e}")))?;

    if !ok {
        return Err(Error::SignatureInvalid(
            "signature does not match quote and account".to_string(),
        ));
    }

    Ok(())
}

/// SHA-256 over the concatenation of the raw quote and account bytes
pub fn identity_digest(quote: &[u8], account: &[u8]) -> Result<Vec<u8>, Error> {
    let mut hasher = Hasher::new(MessageDigest::sha256())
        .map_err(|e| Error::SignatureInvalid(format!("creating hasher: {e}")))?;

    for part in [quote, account] {
        hasher
            .update(part)
            .map_err(|e| Error::SignatureInvalid(format!("hashing identity: {e}")))?;
    }

    let sum = hasher
        .finish()
        .map_err(|e| Error::SignatureInvalid(format!("hashing identity: {e}")))?;

    Ok(sum.to_vec())
}

/// Rebuild the enclave public key from an `sgx_ec256_public_t`, whose X and Y
/// coordinates are stored little-endian.
fn enclave_key(report_data: &[u8; 64]) -> Result<EcKey<Public>, Error> {
    p256_from_le_coordinates(report_data).map_err(|e| {
        Error::SignatureInvalid(format!("report data is not a P-256 public key: {e}"))
    })
}

fn p256_from_le_coordinates(raw: &[u8; 64]) -> Result<EcKey<Public>, ErrorStack> {
    let group = EcGroup::from_curve_name(Nid::X9_62_PRIME256V1)?;
    let x = bn_from_le(&raw[..COORD_LEN])?;
    let y = bn_from_le(&raw[COORD_LEN..])?;

    let key = EcKey::from_public_key_affine_coordinates(&group, &x, &y)?;
    key.check_key()?;

    Ok(key)
}

fn bn_from_le(le: &[u8]) -> Result<BigNum, ErrorStack> {
    let mut be = le.to_vec();
    be.reverse();
    BigNum::from_slice(&be)
}

fn parse_signature(signature: &[u8]) -> Result<EcdsaSig, Error> {
    let sig = if signature.len() == RAW_SIG_LEN {
        raw_signature(signature)
    } else {
        EcdsaSig::from_der(signature)
    };

    sig.map_err(|e| Error::SignatureInvalid(format!("malformed signature: {e}")))
}

fn raw_signature(rs: &[u8]) -> Result<EcdsaSig, ErrorStack> {
    let r = BigNum::from_slice(&rs[..COORD_LEN])?;
    let s = BigNum::from_slice(&rs[COORD_LEN..])?;
    EcdsaSig::from_private_components(r, s)
}
