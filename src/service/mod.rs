// Copyright 2023-2025 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

//! The service module exposes the attestation pipeline over HTTP.
//!
//! A [`Relay`] holds the relay's sr25519 key pair and the quote verification
//! oracle.  For each `POST /attestation/report` body it decodes the request,
//! checks the identity signature, has the quote verified, and, when both
//! succeed, returns a signed registration payload.  Each request produces a
//! single [`AttestationResponse`].

pub use self::errors::Error;
pub use self::relay::Relay;
pub use self::request::AttestationRequest;
pub use self::response::{
    to_prefixed_hex, AttestationResponse, Attested, PayloadBody, ReportBody, Sr25519,
};
pub use self::server::{router, run, serve, ServerConfig};

mod errors;
mod relay;
mod request;
mod response;
mod server;
