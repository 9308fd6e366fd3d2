// Copyright 2023-2025 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

//! Binding to Intel's untrusted quote verification library
//! (`libsgx_dcap_quoteverify`).  Collateral is fetched by the library itself
//! through the platform's quote provider (PCCS) configuration.

use super::outcome::{LibraryStatus, SGX_QL_SUCCESS};
use super::verifier::{OracleVerdict, QuoteVerificationOracle};
use std::os::raw::c_void;
use std::ptr;

// QV result value the library leaves untouched on early failures
const SGX_QL_QV_RESULT_UNSPECIFIED: u32 = 0xA006;

#[link(name = "sgx_dcap_quoteverify")]
extern "C" {
    fn sgx_qv_get_quote_supplemental_data_size(p_data_size: *mut u32) -> u32;

    fn sgx_qv_verify_quote(
        p_quote: *const u8,
        quote_size: u32,
        p_quote_collateral: *const c_void,
        expiration_check_date: i64,
        p_collateral_expiration_status: *mut u32,
        p_quote_verification_result: *mut u32,
        p_qve_report_info: *mut c_void,
        supplemental_data_size: u32,
        p_supplemental_data: *mut u8,
    ) -> u32;
}

/// Untrusted (QvE-less) DCAP quote verification
#[derive(Debug, Default)]
pub struct DcapQuoteVerifier;

impl DcapQuoteVerifier {
    pub fn new() -> Self {
        Self
    }
}

impl QuoteVerificationOracle for DcapQuoteVerifier {
    fn supplemental_data_size(&self) -> Result<u32, LibraryStatus> {
        let mut size = 0u32;

        // SAFETY: the library writes a single u32 through a valid pointer
        let status = LibraryStatus(unsafe { sgx_qv_get_quote_supplemental_data_size(&mut size) });

        if status != SGX_QL_SUCCESS {
            return Err(status);
        }

        Ok(size)
    }

    fn verify(
        &self,
        quote: &[u8],
        now: i64,
        supplemental: &mut [u8],
    ) -> Result<OracleVerdict, LibraryStatus> {
        let quote_size = u32::try_from(quote.len()).map_err(|_| LibraryStatus(0xE002))?;
        let supplemental_size =
            u32::try_from(supplemental.len()).map_err(|_| LibraryStatus(0xE002))?;
        let supplemental_ptr = if supplemental.is_empty() {
            ptr::null_mut()
        } else {
            supplemental.as_mut_ptr()
        };

        let mut collateral_expiration_status = 1u32;
        let mut outcome = SGX_QL_QV_RESULT_UNSPECIFIED;

        // SAFETY: all buffers outlive the call and their sizes are passed
        // alongside; null collateral and QvE report info select untrusted
        // verification with library-fetched collateral
        let status = LibraryStatus(unsafe {
            sgx_qv_verify_quote(
                quote.as_ptr(),
                quote_size,
                ptr::null(),
                now,
                &mut collateral_expiration_status,
                &mut outcome,
                ptr::null_mut(),
                supplemental_size,
                supplemental_ptr,
            )
        });

        if status != SGX_QL_SUCCESS {
            return Err(status);
        }

        Ok(OracleVerdict {
            outcome,
            collateral_expired: collateral_expiration_status != 0,
        })
    }
}
