// Copyright 2023-2025 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

/// Whether a quote verification outcome lets the request through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Accept,
    Reject,
}

/// Quote verification result as reported by the DCAP library
/// (`sgx_ql_qv_result_t`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QvResult {
    Ok,
    ConfigNeeded,
    OutOfDate,
    OutOfDateConfigNeeded,
    InvalidSignature,
    Revoked,
    Unspecified,
    SwHardeningNeeded,
    ConfigAndSwHardeningNeeded,
    Unrecognized(u32),
}

// code, result, decision, description
type Entry = (u32, QvResult, Decision, &'static str);

#[rustfmt::skip]
const OUTCOMES: [Entry; 9] = [
    (0x0000, QvResult::Ok, Decision::Accept, "verification completed successfully"),
    (0xA001, QvResult::ConfigNeeded, Decision::Accept, "configuration needed"),
    (0xA002, QvResult::OutOfDate, Decision::Accept, "TCB out of date"),
    (0xA003, QvResult::OutOfDateConfigNeeded, Decision::Accept, "TCB out of date, configuration needed"),
    (0xA004, QvResult::InvalidSignature, Decision::Reject, "invalid quote signature"),
    (0xA005, QvResult::Revoked, Decision::Reject, "revoked"),
    (0xA006, QvResult::Unspecified, Decision::Reject, "unspecified failure"),
    (0xA007, QvResult::SwHardeningNeeded, Decision::Accept, "software hardening needed"),
    (0xA008, QvResult::ConfigAndSwHardeningNeeded, Decision::Accept, "configuration and software hardening needed"),
];

impl QvResult {
    pub fn from_code(code: u32) -> Self {
        OUTCOMES
            .iter()
            .find(|e| e.0 == code)
            .map(|e| e.1)
            .unwrap_or(QvResult::Unrecognized(code))
    }

    pub fn code(&self) -> u32 {
        match self {
            QvResult::Unrecognized(c) => *c,
            known => lookup(known).map(|e| e.0).unwrap_or_default(),
        }
    }

    pub fn decision(&self) -> Decision {
        lookup(self).map(|e| e.2).unwrap_or(Decision::Reject)
    }

    pub fn description(&self) -> &'static str {
        lookup(self)
            .map(|e| e.3)
            .unwrap_or("unrecognized verification result")
    }

    /// Accepted, but with a condition the operator should know about
    pub fn is_advisory(&self) -> bool {
        self.decision() == Decision::Accept && *self != QvResult::Ok
    }
}

fn lookup(r: &QvResult) -> Option<&'static Entry> {
    OUTCOMES.iter().find(|e| e.1 == *r)
}

impl fmt::Display for QvResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06x} ({})", self.code(), self.description())
    }
}

/// Status code returned by a DCAP library call (`quote3_error_t`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LibraryStatus(pub u32);

pub const SGX_QL_SUCCESS: LibraryStatus = LibraryStatus(0x0000);

const LIBRARY_STATUSES: [(u32, &str); 24] = [
    (0xE001, "an unexpected internal error occurred"),
    (0xE00E, "the platform quote provider library or one of its APIs could not be located"),
    (0xE014, "enclave lost after power transition or used in a forked child process"),
    (0xE015, "report MAC check failed on application report"),
    (0xE016, "unable to load the enclaves required to initialize the attestation key"),
    (0xE019, "network error when retrieving PCK certs"),
    (0xE01B, "the quote library could not retrieve the collateral data"),
    (0xE01C, "the certification data in the quote is not supported"),
    (0xE01D, "the quote format is not supported or the quote is malformed"),
    (0xE01E, "the QvE was unable to generate its own report targeting the application enclave"),
    (0xE01F, "the signature over the QE report is invalid"),
    (0xE020, "the format of the application report in the quote is not supported"),
    (0xE021, "the format of the PCK cert is unsupported"),
    (0xE022, "error verifying the PCK cert signature chain, including revocation"),
    (0xE023, "the format of the TCBInfo structure is unsupported"),
    (0xE024, "PCK cert FMSPC does not match the TCBInfo FMSPC"),
    (0xE025, "the format of the QEIdentity structure is unsupported"),
    (0xE026, "the quote's QE does not match the expected QEIdentity"),
    (0xE039, "error verifying the QEIdentity signature chain, including revocation"),
    (0xE03A, "error verifying the TCBInfo signature chain, including revocation"),
    (0xE03B, "the QVL and QvE versions do not match the installed DCAP version"),
    (0xE044, "unexpected response from the attestation infrastructure"),
    (0xE046, "message parsing error from the attestation infrastructure"),
    (0xE047, "unrecognized SGX platform"),
];

impl LibraryStatus {
    pub fn is_success(&self) -> bool {
        *self == SGX_QL_SUCCESS
    }

    pub fn description(&self) -> &'static str {
        if self.is_success() {
            return "success";
        }

        LIBRARY_STATUSES
            .iter()
            .find(|(c, _)| *c == self.0)
            .map(|(_, d)| *d)
            .unwrap_or("undefined error")
    }
}

impl fmt::Display for LibraryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06x} ({})", self.0, self.description())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACCEPTED: [u32; 6] = [0x0000, 0xA001, 0xA002, 0xA003, 0xA007, 0xA008];
    const REJECTED: [u32; 3] = [0xA004, 0xA005, 0xA006];

    #[test]
    fn classification_is_total() {
        for code in ACCEPTED {
            assert_eq!(
                QvResult::from_code(code).decision(),
                Decision::Accept,
                "{code:#x}"
            );
        }

        for code in REJECTED {
            assert_eq!(
                QvResult::from_code(code).decision(),
                Decision::Reject,
                "{code:#x}"
            );
        }

        // every table entry lands in exactly one of the two sets
        assert_eq!(OUTCOMES.len(), ACCEPTED.len() + REJECTED.len());
    }

    #[test]
    fn unknown_codes_are_rejected() {
        for code in [0x0001, 0xA000, 0xA009, 0xE001, u32::MAX] {
            let r = QvResult::from_code(code);

            assert_eq!(r, QvResult::Unrecognized(code));
            assert_eq!(r.decision(), Decision::Reject);
            assert_eq!(r.code(), code);
            assert!(!r.is_advisory());
        }
    }

    #[test]
    fn codes_round_trip() {
        for (code, result, _, _) in OUTCOMES.iter() {
            assert_eq!(QvResult::from_code(*code), *result);
            assert_eq!(result.code(), *code);
        }
    }

    #[test]
    fn advisory_outcomes() {
        assert!(!QvResult::Ok.is_advisory());
        assert!(QvResult::OutOfDate.is_advisory());
        assert!(QvResult::ConfigAndSwHardeningNeeded.is_advisory());
        assert!(!QvResult::Revoked.is_advisory());
    }

    #[test]
    fn display_includes_code() {
        assert_eq!(QvResult::Revoked.to_string(), "0xa005 (revoked)");
        assert_eq!(
            LibraryStatus(0xE019).to_string(),
            "0xe019 (network error when retrieving PCK certs)"
        );
        assert_eq!(LibraryStatus(0xBEEF).description(), "undefined error");
        assert!(SGX_QL_SUCCESS.is_success());
    }
}
