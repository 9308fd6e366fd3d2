// Copyright 2023-2025 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use super::errors::Error;
use super::request::AttestationRequest;
use super::response::{Attested, AttestationResponse};
use crate::quote::{verify_identity, verify_quote, Quote, QuoteVerificationOracle};
use crate::report::{MultiSigner, RegisterPayload, ServiceKeyPair, SignedReport};
use parity_scale_codec::Encode;

/// Everything a request handler needs.  Built once at startup and shared
/// read-only between handlers.
pub struct Relay {
    keypair: ServiceKeyPair,
    oracle: Box<dyn QuoteVerificationOracle>,
}

impl Relay {
    pub fn new(keypair: ServiceKeyPair, oracle: impl QuoteVerificationOracle + 'static) -> Self {
        Self {
            keypair,
            oracle: Box::new(oracle),
        }
    }

    pub fn public_key(&self) -> [u8; 32] {
        self.keypair.public_key()
    }

    /// Handle one attestation request body and produce the response to send
    /// back.  May block on the quote verification library.
    pub fn attest(&self, body: &str) -> AttestationResponse {
        tracing::info!(%body, "dealing with new attestation request");

        let outcome = self.process(body);

        if let Err(e) = &outcome {
            tracing::error!(error = %e, "attestation request failed");
        }

        let response = AttestationResponse::build(&outcome);

        tracing::info!(body = %response.to_json(), "attestation response");

        response
    }

    /// Run the pipeline: decode, check the identity binding, verify the quote,
    /// then encode and sign the registration payload.  Stops at the first
    /// failure.
    pub fn process(&self, body: &str) -> Result<Attested, Error> {
        let request = AttestationRequest::from_json(body)?;

        let quote = Quote::parse(&request.quote)?;

        verify_identity(&quote, request.account_id.as_bytes(), &request.signature)?;

        tracing::debug!(
            mr_enclave = %hex::encode(quote.measurement()),
            mr_signer = %hex::encode(quote.mr_signer()),
            isv_prod_id = quote.isv_prod_id(),
            isv_svn = quote.isv_svn(),
            "identity signature verified"
        );

        let result = verify_quote(self.oracle.as_ref(), &quote)?;

        let payload = RegisterPayload {
            code: quote.measurement().to_vec(),
            who: request.account,
            pubkey: quote.report_data().to_vec(),
            public: MultiSigner::Sr25519(self.keypair.public_key()),
        };

        let signature = self.keypair.sign(&payload.encode());

        Ok(Attested {
            account_id: request.account_id,
            report: SignedReport { payload, signature },
            result,
        })
    }
}
