// Copyright 2023-2025 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use super::errors::Error;
use crate::quote::QvResult;
use crate::report::SignedReport;
use serde::Serialize;

/// Render bytes the way the ledger tooling expects them: lowercase hex with a
/// `0x` prefix
pub fn to_prefixed_hex(bytes: impl AsRef<[u8]>) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Result of a request that made it through the whole pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attested {
    /// Account identifier as submitted
    pub account_id: String,
    pub report: SignedReport,
    pub result: QvResult,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sr25519 {
    pub sr25519: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PayloadBody {
    pub code: String,
    pub who: String,
    pub pubkey: String,
    pub public: Sr25519,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportBody {
    pub payload: PayloadBody,
    pub signature: Sr25519,
}

impl From<&Attested> for ReportBody {
    fn from(a: &Attested) -> Self {
        let p = &a.report.payload;

        Self {
            payload: PayloadBody {
                code: to_prefixed_hex(&p.code),
                // echoed exactly as submitted, which is also what the enclave
                // signed
                who: format!("0x{}", a.account_id),
                pubkey: to_prefixed_hex(&p.pubkey),
                public: Sr25519 {
                    sr25519: to_prefixed_hex(p.public.as_bytes()),
                },
            },
            signature: Sr25519 {
                sr25519: to_prefixed_hex(a.report.signature),
            },
        }
    }
}

/// JSON body returned by `POST /attestation/report`.  `report_body` is only
/// present on success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttestationResponse {
    pub status_code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_body: Option<Vec<ReportBody>>,
}

impl AttestationResponse {
    /// Build the response from the outcome of the pipeline
    pub fn build(outcome: &Result<Attested, Error>) -> Self {
        match outcome {
            Ok(a) => {
                let message = if a.result.is_advisory() {
                    "Verify quote successfully in condition!"
                } else {
                    "Verify quote successfully!"
                };

                Self {
                    status_code: 200,
                    message: message.to_string(),
                    report_body: Some(vec![ReportBody::from(a)]),
                }
            }
            Err(e) => Self::failure(e),
        }
    }

    pub fn failure(e: &Error) -> Self {
        Self {
            status_code: e.status_code(),
            message: e.message().to_string(),
            report_body: None,
        }
    }

    pub fn to_json(&self) -> String {
        // a tree of strings and integers always serialises
        serde_json::to_string(self).unwrap_or_default()
    }
}
