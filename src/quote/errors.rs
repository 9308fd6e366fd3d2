// Copyright 2023-2025 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

#[derive(thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error("Syntax error: {0}")]
    Syntax(String),
    #[error("Invalid identity signature: {0}")]
    SignatureInvalid(String),
    #[error("Quote library error: {0}")]
    QuoteLibrary(String),
    #[error("Quote rejected: {0}")]
    QuoteRejected(String),
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Syntax(e)
            | Error::SignatureInvalid(e)
            | Error::QuoteLibrary(e)
            | Error::QuoteRejected(e) => {
                write!(f, "{}", e)
            }
        }
    }
}
