// Copyright 2023-2025 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use super::errors::Error;
use super::layout::Quote;
use super::outcome::{Decision, LibraryStatus, QvResult};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Layout of `sgx_ql_qv_supplemental_t`, the supplemental data the library
/// writes alongside its verdict
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupplementalData {
    pub version: u32,
    pub earliest_issue_date: i64,
    pub latest_issue_date: i64,
    pub earliest_expiration_date: i64,
    pub tcb_level_date_tag: i64,
    pub pck_crl_num: u32,
    pub root_ca_crl_num: u32,
    pub tcb_eval_ref_num: u32,
    pub root_key_id: [u8; 48],
    pub pck_ppid: [u8; 16],
    pub tcb_cpusvn: [u8; 16],
    pub tcb_pce_isvsvn: u16,
    pub pce_id: u16,
}

/// The only supplemental data size the relay accepts from the library.  Any
/// other size means a library built against a different layout.
pub const SUPPLEMENTAL_DATA_SIZE: u32 = std::mem::size_of::<SupplementalData>() as u32;

/// What the oracle says about a quote once the call itself succeeded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OracleVerdict {
    /// Raw `sgx_ql_qv_result_t` value
    pub outcome: u32,
    /// Some of the collateral used for verification has expired
    pub collateral_expired: bool,
}

/// Interface to the quote verification library.  Calls may block on local
/// computation or on fetching collateral over the network.
pub trait QuoteVerificationOracle: Send + Sync {
    /// Size of the supplemental data buffer `verify` can fill in
    fn supplemental_data_size(&self) -> Result<u32, LibraryStatus>;

    /// Verify `quote` against collateral valid at `now` (seconds since the
    /// Unix epoch).  `supplemental` is either empty or sized according to
    /// [`QuoteVerificationOracle::supplemental_data_size`].
    fn verify(
        &self,
        quote: &[u8],
        now: i64,
        supplemental: &mut [u8],
    ) -> Result<OracleVerdict, LibraryStatus>;
}

impl<T: QuoteVerificationOracle + ?Sized> QuoteVerificationOracle for Arc<T> {
    fn supplemental_data_size(&self) -> Result<u32, LibraryStatus> {
        (**self).supplemental_data_size()
    }

    fn verify(
        &self,
        quote: &[u8],
        now: i64,
        supplemental: &mut [u8],
    ) -> Result<OracleVerdict, LibraryStatus> {
        (**self).verify(quote, now, supplemental)
    }
}

/// Verify `quote` with the oracle, using the current time
pub fn verify_quote(
    oracle: &dyn QuoteVerificationOracle,
    quote: &Quote,
) -> Result<QvResult, Error> {
    verify_quote_at(oracle, quote, unix_now())
}

/// Verify `quote` with the oracle and classify the result.  On success, the
/// returned result is in the accept set, possibly with an advisory condition.
pub fn verify_quote_at(
    oracle: &dyn QuoteVerificationOracle,
    quote: &Quote,
    now: i64,
) -> Result<QvResult, Error> {
    let mut supplemental = vec![0u8; supplemental_size(oracle)];

    let verdict = oracle
        .verify(quote.as_bytes(), now, &mut supplemental)
        .map_err(|status| {
            tracing::error!(%status, "quote verification library call failed");
            Error::QuoteLibrary(status.to_string())
        })?;

    tracing::info!(outcome = verdict.outcome, "quote verification library returned");

    if verdict.collateral_expired {
        tracing::warn!("quote verified against expired collateral");
    }

    let result = QvResult::from_code(verdict.outcome);

    match result.decision() {
        Decision::Accept if result.is_advisory() => {
            tracing::warn!(%result, "quote accepted with a non-terminal result");
        }
        Decision::Accept => {
            tracing::info!(%result, "quote verification completed successfully");
        }
        Decision::Reject => {
            tracing::error!(%result, "quote verification completed with a terminal result");
            return Err(Error::QuoteRejected(result.to_string()));
        }
    }

    Ok(result)
}

// supplemental data is advisory: any problem getting its size just means we
// go without it
fn supplemental_size(oracle: &dyn QuoteVerificationOracle) -> usize {
    match oracle.supplemental_data_size() {
        Ok(size) if size == SUPPLEMENTAL_DATA_SIZE => size as usize,
        Ok(size) => {
            tracing::warn!(
                size,
                expected = SUPPLEMENTAL_DATA_SIZE,
                "unexpected supplemental data size, skipping"
            );
            0
        }
        Err(status) => {
            tracing::warn!(%status, "supplemental data size query failed, skipping");
            0
        }
    }
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}
