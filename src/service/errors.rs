// Copyright 2023-2025 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use crate::quote;

/// Terminal failure of an attestation request.  The payload carries the
/// diagnostic detail, which is logged but never sent back to the client.
#[derive(thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error("Decode error: {0}")]
    Decode(String),
    #[error("Invalid identity signature: {0}")]
    SignatureInvalid(String),
    #[error("Quote library error: {0}")]
    QuoteLibrary(String),
    #[error("Quote rejected: {0}")]
    QuoteRejected(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn status_code(&self) -> u16 {
        match self {
            Error::Decode(_) => 400,
            _ => 500,
        }
    }

    /// The coarse message sent to the client
    pub fn message(&self) -> &'static str {
        match self {
            Error::Decode(_) => "Load ecdsa_identity failed!",
            Error::SignatureInvalid(_) => "Verify identity signature failed!",
            Error::QuoteLibrary(_) | Error::QuoteRejected(_) => "Verify quote failed!",
            Error::Internal(_) => "Unexpected error",
        }
    }
}

impl From<quote::Error> for Error {
    fn from(e: quote::Error) -> Self {
        match e {
            quote::Error::Syntax(s) => Error::Decode(s),
            quote::Error::SignatureInvalid(s) => Error::SignatureInvalid(s),
            quote::Error::QuoteLibrary(s) => Error::QuoteLibrary(s),
            quote::Error::QuoteRejected(s) => Error::QuoteRejected(s),
        }
    }
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Decode(e)
            | Error::SignatureInvalid(e)
            | Error::QuoteLibrary(e)
            | Error::QuoteRejected(e)
            | Error::Internal(e) => {
                write!(f, "{}", e)
            }
        }
    }
}
