// Copyright 2023-2025 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

//! SGX DCAP attestation relay.
//!
//! A client submits an SGX ECDSA quote together with an account identifier
//! and a signature made with a P-256 key that the enclave placed in its report
//! data.  The relay checks that signature, has the quote verified by Intel's
//! DCAP quote verification library, and vouches for the result by signing a
//! SCALE-encoded registration payload with its own sr25519 key.
//!
//! The crate is organised as:
//! * [`quote`]: quote layout, identity signature, quote verification
//! * [`report`]: payload encoding and sr25519 signing
//! * [`service`]: request pipeline and HTTP server

pub mod quote;
pub mod report;
pub mod service;

#[cfg(test)]
mod testutil;
