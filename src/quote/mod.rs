// Copyright 2023-2025 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

//! The quote module deals with the SGX ECDSA quote submitted by a client: a
//! fixed-offset view over its binary layout ([`Quote`]), the check that the
//! enclave key embedded in the report data has bound the quote to an account
//! ([`verify_identity`]), and the delegation of the quote itself to a DCAP
//! verification library ([`verify_quote`]), whose result is classified by
//! [`QvResult::decision`].

pub use self::errors::Error;
pub use self::identity::{identity_digest, verify_identity};
pub use self::layout::{Field, Quote, MIN_QUOTE_LEN, QUOTE_LAYOUT};
pub use self::outcome::{Decision, LibraryStatus, QvResult, SGX_QL_SUCCESS};
pub use self::verifier::{
    verify_quote, verify_quote_at, OracleVerdict, QuoteVerificationOracle, SupplementalData,
    SUPPLEMENTAL_DATA_SIZE,
};

#[cfg(feature = "dcap")]
pub use self::dcap::DcapQuoteVerifier;

#[cfg(feature = "dcap")]
mod dcap;
mod errors;
mod identity;
pub mod layout;
mod outcome;
mod verifier;
